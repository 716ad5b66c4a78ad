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

//! the utils of the file operation
//!
use std::io::{self, BufRead, BufReader, Read};

/// read first line from a reader, the trailing newline is kept
pub fn read_first_line<R: Read>(reader: R) -> io::Result<String> {
    let mut buffer = BufReader::new(reader);
    let mut first_line = String::with_capacity(64);
    buffer.read_line(&mut first_line)?;
    Ok(first_line)
}

#[cfg(test)]
mod test {
    use super::read_first_line;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_first_line() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"4096\nsecond line\n").unwrap();
        file.rewind().unwrap();
        assert_eq!(read_first_line(file.as_file()).unwrap(), "4096\n");
    }

    #[test]
    fn test_read_first_line_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(read_first_line(file.as_file()).unwrap(), "");
    }

    #[test]
    fn test_read_first_line_not_utf8() {
        let input: &[u8] = &[0xff, 0xfe, b'\n'];
        assert!(read_first_line(input).is_err());
    }
}
