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

//! The kernel random device and the entropy crediting request.
use basic::fd_util::close_file;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read};
use std::os::unix::prelude::AsRawFd;
use std::path::Path;

/// Capacity of the transfer buffer, and the largest chunk credited at once.
pub const ENTROPY_BUFFER_SIZE: usize = 1024;

/// A handle whose close result must be observed.
pub trait Close {
    /// Release the handle, reporting a failing close.
    fn close(self) -> io::Result<()>;
}

impl Close for File {
    fn close(self) -> io::Result<()> {
        close_file(self)
    }
}

/// The entropy attributed to one chunk handed to the kernel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EntropyCredit {
    byte_count: usize,
    entropy_bits: usize,
}

impl EntropyCredit {
    /// Credit a full 8 bits for each byte of `chunk`.
    pub fn for_chunk(chunk: &[u8]) -> Self {
        EntropyCredit {
            byte_count: chunk.len(),
            entropy_bits: 8 * chunk.len(),
        }
    }

    /// bytes covered by this credit
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// bits of entropy claimed
    pub fn entropy_bits(&self) -> usize {
        self.entropy_bits
    }

    /// Sum of two credits, used to account for a whole transfer.
    pub fn merge(self, other: EntropyCredit) -> EntropyCredit {
        EntropyCredit {
            byte_count: self.byte_count + other.byte_count,
            entropy_bits: self.entropy_bits + other.entropy_bits,
        }
    }
}

/// Accepts bytes together with the entropy credited for them.
pub trait EntropySink {
    /// Submit `chunk` and `credit` as one request; never a plain write.
    fn add_entropy(&mut self, chunk: &[u8], credit: EntropyCredit) -> io::Result<()>;
}

mod sys {
    use super::ENTROPY_BUFFER_SIZE;
    use nix::{ioctl_write_ptr_bad, libc, request_code_write};

    const ENTROPY_IOCTL_BASE: u8 = b'R';
    const ENTROPY_ADD: u8 = 0x03;

    /// Layout of `struct rand_pool_info` followed by the payload.
    #[repr(C)]
    pub struct RandPoolInfo {
        pub entropy_count: libc::c_int,
        pub buf_size: libc::c_int,
        pub buf: [u8; ENTROPY_BUFFER_SIZE],
    }

    /* RNDADDENTROPY is _IOW('R', 0x03, int[2]): the size only covers the header. */
    ioctl_write_ptr_bad!(
        rndaddentropy,
        request_code_write!(
            ENTROPY_IOCTL_BASE,
            ENTROPY_ADD,
            std::mem::size_of::<[libc::c_int; 2]>()
        ),
        RandPoolInfo
    );
}

/// The kernel random device, opened for one direction of transfer.
#[derive(Debug)]
pub struct RandomDevice {
    file: File,
}

impl RandomDevice {
    /// open the device for reading seed bytes
    pub fn open_read(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(RandomDevice { file })
    }

    /// open the device for feeding seed bytes back
    pub fn open_write(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).open(path)?;
        Ok(RandomDevice { file })
    }
}

impl Read for RandomDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl EntropySink for RandomDevice {
    fn add_entropy(&mut self, chunk: &[u8], credit: EntropyCredit) -> io::Result<()> {
        if chunk.len() > ENTROPY_BUFFER_SIZE || credit.byte_count() != chunk.len() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "credit for {} bytes does not match a chunk of {} bytes",
                    credit.byte_count(),
                    chunk.len()
                ),
            ));
        }

        let mut info = sys::RandPoolInfo {
            entropy_count: credit.entropy_bits() as nix::libc::c_int,
            buf_size: chunk.len() as nix::libc::c_int,
            buf: [0; ENTROPY_BUFFER_SIZE],
        };
        info.buf[..chunk.len()].copy_from_slice(chunk);

        unsafe { sys::rndaddentropy(self.file.as_raw_fd(), &info) }
            .map(|_| ())
            .map_err(io::Error::from)
    }
}

impl Close for RandomDevice {
    fn close(self) -> io::Result<()> {
        close_file(self.file)
    }
}
