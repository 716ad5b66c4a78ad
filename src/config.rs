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

//! parse the configuration of rngminder
//!
use crate::error::*;
use confique::Config;
use log::Level;
use snafu::{ensure, ResultExt};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// default configuration path
pub const DEFAULT_CONFIG: &str = "/etc/rngminder/rngminder.toml";
/// default name of the file to load from / store to
pub const DEFAULT_SEED_FILE: &str = "/var/lib/urandom/random-seed";
/// kernel random device
pub const DEFAULT_RANDOM_DEVICE: &str = "/dev/urandom";
/// kernel parameter holding the entropy pool size in bits
pub const DEFAULT_POOLSIZE_PATH: &str = "/proc/sys/kernel/random/poolsize";

/// Upper limit of poolsize in bits.
///
/// Anything larger than 64 kbit is most likely a bug or a bad argument; the
/// kernel default is 4096.
pub const MAX_SANE_POOLSIZE: i64 = 1 << 16;

/// configuration of rngminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngminderConfig {
    /// seed file used when `--file` is not given
    pub seed_file: PathBuf,
    /// device that is read on store and fed on load
    pub random_device: PathBuf,
    /// where the pool size is probed
    pub poolsize_path: PathBuf,
    /// sanity ceiling for the number of bits, inclusive
    pub max_sane_poolsize: i64,
    /// log level
    pub log_level: Level,
    /// log targets
    pub log_targets: Vec<String>,
}

#[derive(Debug, Config, Default)]
pub(crate) struct RngminderConfigData {
    pub(crate) seed_file: Option<String>,
    pub(crate) random_device: Option<String>,
    pub(crate) poolsize_path: Option<String>,
    pub(crate) max_sane_poolsize: Option<i64>,
    pub(crate) log_level: Option<String>,
    pub(crate) log_targets: Option<Vec<String>>,
}

impl Default for RngminderConfig {
    fn default() -> Self {
        RngminderConfig {
            seed_file: PathBuf::from(DEFAULT_SEED_FILE),
            random_device: PathBuf::from(DEFAULT_RANDOM_DEVICE),
            poolsize_path: PathBuf::from(DEFAULT_POOLSIZE_PATH),
            max_sane_poolsize: MAX_SANE_POOLSIZE,
            log_level: Level::Info,
            log_targets: vec!["console".to_string()],
        }
    }
}

impl RngminderConfig {
    /// Load the configuration file at `path` on top of the defaults.
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return ConfigSnafu {
                    what: format!("Configuration file '{}' does not exist", path.display()),
                }
                .fail();
            }
            return Ok(Self::default());
        }

        let data = RngminderConfigData::builder()
            .file(path)
            .load()
            .context(ConfigFileSnafu { path })?;
        Self::from_data(data)
    }

    fn from_data(data: RngminderConfigData) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = data.seed_file {
            config.seed_file = PathBuf::from(v);
        }
        if let Some(v) = data.random_device {
            config.random_device = PathBuf::from(v);
        }
        if let Some(v) = data.poolsize_path {
            config.poolsize_path = PathBuf::from(v);
        }
        if let Some(v) = data.max_sane_poolsize {
            ensure!(
                v > 0,
                ConfigSnafu {
                    what: format!("max_sane_poolsize must be positive, got {}", v),
                }
            );
            config.max_sane_poolsize = v;
        }
        if let Some(v) = data.log_level {
            config.log_level = Level::from_str(&v).map_err(|_| Error::Config {
                what: format!("Invalid log_level '{}'", v),
            })?;
        }
        if let Some(v) = data.log_targets {
            config.log_targets = v;
        }

        Ok(config)
    }
}
