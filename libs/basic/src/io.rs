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

//! io functions
use std::io::{self, ErrorKind, Read, Write};

/// Read data from reader to buf, and return the number of bytes read.
///
/// Keeps reading until buf is full or the reader reports end of file, so a
/// return value smaller than `buf.len()` always means end of file.
pub fn loop_read<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let size = buf.len();
    let mut pos = 0;
    while pos < size {
        let read_size = match reader.read(&mut buf[pos..]) {
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if read_size == 0 {
            return Ok(pos);
        }
        pos += read_size;
    }
    Ok(pos)
}

/// Read data from reader to buf. If buf is full, succeeds, otherwise fails.
pub fn loop_read_exact<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<()> {
    let n = loop_read(reader, buf)?;

    if n != buf.len() {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("short read: got {} of {} bytes", n, buf.len()),
        ));
    }

    Ok(())
}

/// Write the whole buf to writer. A writer accepting zero bytes is an error.
pub fn loop_write<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> io::Result<()> {
    let mut write_size = 0;

    while write_size < buf.len() {
        write_size += match writer.write(&buf[write_size..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("short write: wrote {} of {} bytes", write_size, buf.len()),
                ))
            }
            Ok(size) => size,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
    }
    Ok(())
}
