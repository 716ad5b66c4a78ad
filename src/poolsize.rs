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

//! Pool size discovery and the sanity guard on bit counts.
use crate::error::*;
use basic::fd_util::close_file;
use basic::file_util::read_first_line;
use snafu::prelude::*;
use std::fs::File;
use std::path::Path;

/// Read the size of the kernel entropy pool, in bits, from `path`.
pub fn probe(path: &Path) -> Result<i64> {
    let file = File::open(path).context(ProbeOpenSnafu)?;

    let line = match read_first_line(&file) {
        Ok(line) => line,
        Err(source) => {
            let _ = close_file(file);
            return Err(Error::ProbeRead { source });
        }
    };

    close_file(file).context(ProbeCloseSnafu)?;

    let bits = parse_poolsize(&line)?;
    log::debug!("Kernel entropy pool holds {} bits", bits);
    Ok(bits)
}

/// Parse the leading integer of a poolsize value such as `"4096\n"`.
pub fn parse_poolsize(content: &str) -> Result<i64> {
    let value = content.split_whitespace().next().unwrap_or_default();
    value.parse::<i64>().context(ProbeParseSnafu { value })
}

/// Reject bit counts that are not positive or exceed `max_sane`.
pub fn validate_bits(bits: i64, max_sane: i64) -> Result<()> {
    ensure!(
        bits > 0,
        ConfigSnafu {
            what: format!("Not a valid number of bits: \"{}\"", bits),
        }
    );
    ensure!(
        bits <= max_sane,
        ConfigSnafu {
            what: format!(
                "poolsize seems a bit large ({} > {}): refusing to do this",
                bits, max_sane
            ),
        }
    );
    Ok(())
}

/// Number of whole bytes needed to hold `bits`, zero for non-positive input.
pub fn bytes_for_bits(bits: i64) -> usize {
    match usize::try_from(bits) {
        Ok(bits) => (bits + 7) / 8,
        Err(_) => 0,
    }
}
