// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! Logging front end: the `log` facade plus console, syslog and kmsg targets.
pub mod logger;

/// reexport the log macros
pub use log::Level;
pub use log::{debug, error, info, trace, warn};

pub use logger::init_log;

/// Initialize console logger.
pub fn init_log_to_console(name: &str, level: crate::Level) {
    init_log(name, level, &["console"]);
}
