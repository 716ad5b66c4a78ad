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

//! Turn the command line into a transfer plan and run it.
use crate::config::RngminderConfig;
use crate::error::*;
use crate::poolsize::{probe, validate_bits};
use crate::seed::{load, store};
use snafu::prelude::*;
use std::path::PathBuf;

/// The command given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Command {
    /// load the pool from the seed file
    Load,
    /// store the pool to the seed file
    Store,
}

/// What one invocation will do, after all option checks passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// feed the seed file into the kernel
    pub load: bool,
    /// write a fresh seed file, after loading if both are set
    pub store: bool,
    /// the seed file
    pub file: PathBuf,
    /// explicit number of bits, probed from the kernel when absent
    pub bits: Option<i64>,
}

/// Parse a `--bits` value. Anything but a positive integer is rejected.
pub fn parse_bits(value: &str) -> Result<i64> {
    match value.trim().parse::<i64>() {
        Ok(bits) if bits > 0 => Ok(bits),
        _ => ConfigSnafu {
            what: format!("Not a valid number of bits: \"{}\"", value),
        }
        .fail(),
    }
}

impl Request {
    /// Validate the options and build the request.
    ///
    /// Loading consumes the seed, so unless `keep` is set the file is
    /// refreshed by a store right after it was loaded. `keep` is only
    /// accepted together with `load`.
    pub fn resolve(
        command: Command,
        bits: Option<&str>,
        file: Option<PathBuf>,
        keep: bool,
        config: &RngminderConfig,
    ) -> Result<Request> {
        let bits = bits.map(parse_bits).transpose()?;

        let (load, store) = match (command, keep) {
            (Command::Load, true) => (true, false),
            (Command::Load, false) => (true, true),
            (Command::Store, false) => (false, true),
            (Command::Store, true) => {
                return ConfigSnafu {
                    what: "The --keep flag can only be used with the load command",
                }
                .fail()
            }
        };

        Ok(Request {
            load,
            store,
            file: file.unwrap_or_else(|| config.seed_file.clone()),
            bits,
        })
    }
}

/// Run the request: size checks first, then load, then store.
pub fn run(request: &Request, config: &RngminderConfig) -> Result<()> {
    let bits = match (request.store, request.bits) {
        (true, None) => Some(probe(&config.poolsize_path)?),
        (_, bits) => bits,
    };

    if let Some(bits) = bits {
        validate_bits(bits, config.max_sane_poolsize)?;
    }

    if request.load {
        let credit = load(config, &request.file)?;
        log::info!(
            "Loaded {} bytes of seed from {}",
            credit.byte_count(),
            request.file.display()
        );
    }

    if let (true, Some(bits)) = (request.store, bits) {
        store(config, &request.file, bits)?;
        log::info!("Stored {} bits of seed to {}", bits, request.file.display());
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn test_config(dir: &Path) -> RngminderConfig {
        let poolsize_path = dir.join("poolsize");
        fs::write(&poolsize_path, "4096\n").unwrap();
        RngminderConfig {
            seed_file: dir.join("random-seed"),
            poolsize_path,
            ..Default::default()
        }
    }

    #[test]
    fn resolve_test() {
        let config = RngminderConfig::default();

        let r = Request::resolve(Command::Load, None, None, false, &config).unwrap();
        assert!(r.load && r.store);
        assert_eq!(r.file, config.seed_file);

        let r = Request::resolve(Command::Load, Some("256"), None, true, &config).unwrap();
        assert!(r.load && !r.store);
        assert_eq!(r.bits, Some(256));

        let file = PathBuf::from("/tmp/seed");
        let r = Request::resolve(Command::Store, None, Some(file.clone()), false, &config).unwrap();
        assert!(!r.load && r.store);
        assert_eq!(r.file, file);
    }

    #[test]
    fn resolve_errors_test() {
        let config = RngminderConfig::default();

        let e = Request::resolve(Command::Store, None, None, true, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);

        for bits in ["0", "-4096", "abc", "12x", ""] {
            let e = Request::resolve(Command::Store, Some(bits), None, false, &config).unwrap_err();
            assert_eq!(e.kind(), ErrorKind::Config);
            assert_eq!(
                e.to_string(),
                format!("Not a valid number of bits: \"{}\"", bits)
            );
        }
    }

    #[test]
    fn parse_bits_test() {
        assert_eq!(parse_bits("4096").unwrap(), 4096);
        assert_eq!(parse_bits(" 12 ").unwrap(), 12);
        assert_eq!(parse_bits("abc").unwrap_err().kind(), ErrorKind::Config);
        assert_eq!(parse_bits("0").unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn run_store_probe_test() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let r = Request::resolve(Command::Store, None, None, false, &config).unwrap();
        run(&r, &config).unwrap();
        assert_eq!(fs::metadata(&config.seed_file).unwrap().len(), 512);

        let r = Request::resolve(Command::Store, Some("12"), None, false, &config).unwrap();
        run(&r, &config).unwrap();
        assert_eq!(fs::metadata(&config.seed_file).unwrap().len(), 2);
    }

    #[test]
    fn run_probe_failure_test() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(&config.poolsize_path, "lots\n").unwrap();

        let r = Request::resolve(Command::Store, None, None, false, &config).unwrap();
        let e = run(&r, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Probe);
        assert!(!config.seed_file.exists());
    }

    #[test]
    fn run_ceiling_test() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        fs::write(&config.poolsize_path, "131072\n").unwrap();
        fs::write(&config.seed_file, b"old seed").unwrap();
        config.random_device = dir.path().join("no-such-device");

        /* probed size over the ceiling: nothing is touched, not even the load */
        let r = Request::resolve(Command::Load, None, None, false, &config).unwrap();
        let e = run(&r, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);
        assert_eq!(fs::read(&config.seed_file).unwrap(), b"old seed");

        let r = Request::resolve(Command::Load, Some("65537"), None, true, &config).unwrap();
        let e = run(&r, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);
    }

    #[test]
    fn run_load_keep_does_not_probe_test() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.poolsize_path = dir.path().join("missing");
        config.random_device = dir.path().join("no-such-device");
        fs::write(&config.seed_file, b"old seed").unwrap();

        /* fails on opening the device, not on probing */
        let r = Request::resolve(Command::Load, None, None, true, &config).unwrap();
        let e = run(&r, &config).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Io);
        assert_eq!(fs::read(&config.seed_file).unwrap(), b"old seed");
    }
}
