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

//! Transfer engine: store the pool into the seed file, load it back.
use crate::config::RngminderConfig;
use crate::device::{Close, EntropyCredit, EntropySink, RandomDevice, ENTROPY_BUFFER_SIZE};
use crate::error::*;
use crate::poolsize::{bytes_for_bits, validate_bits};
use basic::fd_util::close_file;
use basic::io::{loop_read, loop_read_exact, loop_write};
use snafu::ResultExt;
use std::fs::{DirBuilder, File, OpenOptions, Permissions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

const SEED_FILE_MODE: u32 = 0o600;
const SEED_DIR_MODE: u32 = 0o755;

/// The seed file opened for writing. Flushing synchronises the file and the
/// directory entry pointing at it.
#[derive(Debug)]
pub struct SeedFile {
    file: File,
    dir: Option<PathBuf>,
}

impl SeedFile {
    /// Create or truncate the seed file, creating its directory if needed.
    ///
    /// An existing file keeps its inode, so its mode is forced back to 0600.
    pub fn create(path: &Path) -> io::Result<Self> {
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        if let Some(dir) = &dir {
            if !dir.exists() {
                DirBuilder::new()
                    .recursive(true)
                    .mode(SEED_DIR_MODE)
                    .create(dir)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(SEED_FILE_MODE)
            .open(path)?;
        file.set_permissions(Permissions::from_mode(SEED_FILE_MODE))?;
        Ok(SeedFile { file, dir })
    }
}

impl Write for SeedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.sync_all()?;
        if let Some(dir) = &self.dir {
            File::open(dir)?.sync_all()?;
        }
        Ok(())
    }
}

impl Close for SeedFile {
    fn close(self) -> io::Result<()> {
        close_file(self.file)
    }
}

/// Store `bits` of the pool from the configured random device into `path`.
///
/// The bit count is checked against the sanity ceiling before anything is
/// opened, so a rejected count leaves `path` untouched.
pub fn store(config: &RngminderConfig, path: &Path, bits: i64) -> Result<()> {
    validate_bits(bits, config.max_sane_poolsize)?;
    let total_bytes = bytes_for_bits(bits);

    let dst = SeedFile::create(path).context(IoSnafu {
        step: "Opening file for writing failed",
    })?;
    let src = RandomDevice::open_read(&config.random_device).context(IoSnafu {
        step: "Opening RNG device for reading failed",
    })?;

    log::debug!(
        "Storing {} bits ({} bytes) from {} to {}",
        bits,
        total_bytes,
        config.random_device.display(),
        path.display()
    );
    store_to(src, dst, total_bytes)
}

/// Copy exactly `total_bytes` from `src` to `dst`, chunk by chunk.
///
/// Any short read or write fails the whole transfer. Both handles are closed
/// explicitly at the end, source first, and a failing close is reported even
/// though all data was moved.
pub fn store_to<R, W>(mut src: R, mut dst: W, total_bytes: usize) -> Result<()>
where
    R: Read + Close,
    W: Write + Close,
{
    let mut buf = [0u8; ENTROPY_BUFFER_SIZE];
    let mut left = total_bytes;

    while left > 0 {
        let needed = left.min(ENTROPY_BUFFER_SIZE);
        loop_read_exact(&mut src, &mut buf[..needed]).context(IoSnafu {
            step: "Reading from RNG device failed",
        })?;
        loop_write(&mut dst, &buf[..needed]).context(IoSnafu {
            step: "Writing to file failed",
        })?;
        left -= needed;
    }

    dst.flush().context(IoSnafu {
        step: "Synchronizing file failed",
    })?;

    let src_closed = src.close();
    let dst_closed = dst.close();
    src_closed.context(IoSnafu {
        step: "Closing RNG device after reading failed",
    })?;
    dst_closed.context(IoSnafu {
        step: "Closing file after writing failed",
    })?;

    Ok(())
}

/// Feed every byte of `path` into the configured random device, crediting
/// 8 bits of entropy per byte. Returns the total credit submitted.
pub fn load(config: &RngminderConfig, path: &Path) -> Result<EntropyCredit> {
    let src = File::open(path).context(IoSnafu {
        step: "Opening file for reading failed",
    })?;
    let dst = RandomDevice::open_write(&config.random_device).context(IoSnafu {
        step: "Opening RNG device for writing failed",
    })?;

    let total = load_from(src, dst)?;
    log::debug!(
        "Loaded {} bytes from {}, credited {} bits",
        total.byte_count(),
        path.display(),
        total.entropy_bits()
    );
    Ok(total)
}

/// Submit `src` to `dst` in chunks of at most [`ENTROPY_BUFFER_SIZE`] bytes.
///
/// A chunk shorter than the buffer marks end of file; an empty chunk is never
/// submitted. Both handles are closed explicitly, device first.
pub fn load_from<R, D>(mut src: R, mut dst: D) -> Result<EntropyCredit>
where
    R: Read + Close,
    D: EntropySink + Close,
{
    let mut buf = [0u8; ENTROPY_BUFFER_SIZE];
    let mut total = EntropyCredit::default();

    loop {
        let size = loop_read(&mut src, &mut buf).context(IoSnafu {
            step: "Reading from file failed",
        })?;

        if size > 0 {
            let chunk = &buf[..size];
            let credit = EntropyCredit::for_chunk(chunk);
            dst.add_entropy(chunk, credit).context(IoSnafu {
                step: "Writing to RNG device failed",
            })?;
            total = total.merge(credit);
        }

        if size < ENTROPY_BUFFER_SIZE {
            break;
        }
    }

    let dst_closed = dst.close();
    let src_closed = src.close();
    dst_closed.context(IoSnafu {
        step: "Closing RNG device after writing failed",
    })?;
    src_closed.context(IoSnafu {
        step: "Closing file after reading failed",
    })?;

    Ok(total)
}
