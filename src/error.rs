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

//! error definitions
use snafu::prelude::*;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

/// The class of a failure, independent of the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// invalid options or configuration, detected before any transfer
    Config,
    /// the kernel pool size could not be determined
    Probe,
    /// open, read, write, ioctl or close failure on the seed file or device
    Io,
}

#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("{}", what))]
    Config { what: String },

    #[snafu(display("Failed to load configuration '{}': {}", path.display(), source))]
    ConfigFile {
        path: PathBuf,
        source: confique::Error,
    },

    #[snafu(display("Opening file to read poolsize failed: {}", source))]
    ProbeOpen { source: io::Error },

    #[snafu(display("Failed to read poolsize: {}", source))]
    ProbeRead { source: io::Error },

    #[snafu(display("Closing file after reading poolsize failed: {}", source))]
    ProbeClose { source: io::Error },

    #[snafu(display("Failed to read poolsize: \"{}\" is not a number: {}", value, source))]
    ProbeParse {
        value: String,
        source: ParseIntError,
    },

    #[snafu(display("{}: {}", step, source))]
    Io {
        step: &'static str,
        source: io::Error,
    },
}

impl Error {
    /// Which class of the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::ConfigFile { .. } => ErrorKind::Config,
            Error::ProbeOpen { .. }
            | Error::ProbeRead { .. }
            | Error::ProbeClose { .. }
            | Error::ProbeParse { .. } => ErrorKind::Probe,
            Error::Io { .. } => ErrorKind::Io,
        }
    }
}

///
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_display_test() {
        let e = Error::Io {
            step: "Reading from file failed",
            source: io::Error::from_raw_os_error(nix::libc::EIO),
        };
        assert!(e.to_string().starts_with("Reading from file failed: "));
        assert_eq!(e.kind(), ErrorKind::Io);

        let e = Error::Config {
            what: "Need one of the commands <load | store>".to_string(),
        };
        assert_eq!(e.to_string(), "Need one of the commands <load | store>");
        assert_eq!(e.kind(), ErrorKind::Config);

        let e = "x4096".parse::<i64>().context(ProbeParseSnafu { value: "x4096" });
        let e = e.unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Probe);
        assert!(e.to_string().contains("\"x4096\" is not a number"));
    }
}
