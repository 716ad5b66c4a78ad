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

//! rngminder keeps the kernel entropy pool across reboots.
//!
//! On shutdown `store` copies bytes from the kernel random device into a
//! seed file; on boot `load` feeds them back and tells the kernel how much
//! entropy to credit for them.
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod poolsize;
pub mod seed;

pub use error::{Error, ErrorKind, Result};
