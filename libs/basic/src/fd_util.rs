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

//! file descriptor helpers
use std::io;
use std::os::unix::io::IntoRawFd;

/// Close the descriptor owned by `handle` and report the result.
///
/// Dropping a `File` silently discards close errors, which may hide an
/// incomplete write. The descriptor is released even when an error is
/// returned.
pub fn close_file<F: IntoRawFd>(handle: F) -> io::Result<()> {
    nix::unistd::close(handle.into_raw_fd()).map_err(io::Error::from)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::os::unix::io::RawFd;

    struct Stale;

    impl IntoRawFd for Stale {
        fn into_raw_fd(self) -> RawFd {
            -1
        }
    }

    #[test]
    fn close_file_test() {
        let file = tempfile::tempfile().unwrap();
        let dup = file.try_clone().unwrap();
        close_file(file).unwrap();
        close_file(dup).unwrap();
    }

    #[test]
    fn close_file_bad_fd_test() {
        let err = close_file(Stale).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(nix::libc::EBADF));
    }
}
