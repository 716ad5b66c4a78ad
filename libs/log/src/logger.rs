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

//!
use log::{Level, Log};
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::Write,
    os::unix::net::UnixDatagram,
    sync::Mutex,
};

/* syslog facility LOG_DAEMON */
const LOG_DAEMON: u8 = 3 << 3;

/// Map a log level to its syslog severity.
pub fn syslog_severity(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

fn format_line(name: &str, args: &fmt::Arguments) -> String {
    format!("{}: {}", name, args)
}

fn format_prefixed(name: &str, level: Level, args: &fmt::Arguments) -> String {
    format!(
        "<{}>{}",
        LOG_DAEMON | syslog_severity(level),
        format_line(name, args)
    )
}

/// One line per record on stderr, so diagnostics never mix with output.
struct ConsoleLogger {
    name: String,
}

impl Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format_line(&self.name, record.args());
        let mut stderr = std::io::stderr().lock();
        /* Nowhere left to report a failing stderr. */
        let _ = writeln!(stderr, "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

struct SysLogger {
    name: String,
    dgram: Mutex<UnixDatagram>,
}

impl SysLogger {
    fn new(name: &str) -> Result<Self, std::io::Error> {
        let sock = UnixDatagram::unbound()?;
        sock.connect("/dev/log")?;
        Ok(Self {
            name: name.to_string(),
            dgram: Mutex::new(sock),
        })
    }
}

/* This is an extremely simple implementation, and only
 * supports the very basic log function. */
impl Log for SysLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg = format_prefixed(&self.name, record.level(), record.args());
        let dgram = match self.dgram.lock() {
            Ok(v) => v,
            Err(_) => return,
        };
        if let Err(e) = dgram.send(msg.as_bytes()) {
            eprintln!("Failed to send message to syslogger: {}", e);
        }
    }

    fn flush(&self) {}
}

/// Writes to the kernel log buffer, available before syslog is up.
struct KmsgLogger {
    name: String,
    file: Mutex<File>,
}

impl KmsgLogger {
    fn new(name: &str) -> Result<Self, std::io::Error> {
        let file = OpenOptions::new().write(true).open("/dev/kmsg")?;
        Ok(Self {
            name: name.to_string(),
            file: Mutex::new(file),
        })
    }
}

impl Log for KmsgLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let msg = format_prefixed(&self.name, record.level(), record.args()) + "\n";
        let mut file = match self.file.lock() {
            Ok(v) => v,
            Err(_) => return,
        };
        if let Err(e) = file.write_all(msg.as_bytes()) {
            eprintln!("Failed to write message to kmsg: {}", e);
        }
    }

    fn flush(&self) {}
}

/// Collect different kinds of loggers together.
///
/// Include: ConsoleLogger, SysLogger, KmsgLogger
struct CombinedLogger {
    loggers: Vec<Box<dyn Log>>,
}

impl Log for CombinedLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        for logger in &self.loggers {
            logger.log(record);
        }
    }

    fn flush(&self) {
        for logger in &self.loggers {
            logger.flush();
        }
    }
}

fn build_logger(name: &str, targets: &[&str]) -> CombinedLogger {
    let mut loggers: Vec<Box<dyn Log>> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for target in targets {
        if seen.contains(target) {
            continue;
        }
        seen.push(target);

        let logger = match *target {
            "console" => Box::new(ConsoleLogger {
                name: name.to_string(),
            }) as Box<dyn Log>,
            "syslog" => match SysLogger::new(name) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to create syslogger: {}", name, e);
                    continue;
                }
            },
            "kmsg" => match KmsgLogger::new(name) {
                Ok(logger) => Box::new(logger) as Box<dyn Log>,
                Err(e) => {
                    eprintln!("{} failed to open /dev/kmsg: {}", name, e);
                    continue;
                }
            },
            _ => {
                eprintln!("{}: log target '{}' is strange, ignoring.", name, target);
                continue;
            }
        };

        loggers.push(logger);
    }

    CombinedLogger { loggers }
}

/// Initialize the global logger instance.
/// Available log `targets` include `console`, `syslog`, `kmsg`.
///
/// Repeated targets take effect only once. Targets that cannot be opened are
/// reported on stderr and skipped.
///
/// # Arguments
///
/// * `name` - The application name, prefixed to every message.
/// * `level` - Log message level.
/// * `targets` - A set of log targets.
pub fn init_log(name: &str, level: Level, targets: &[&str]) {
    let combined = build_logger(name, targets);
    if combined.loggers.is_empty() {
        eprintln!("{}: no available log targets.", name);
    }

    log::set_max_level(level.to_level_filter());
    if let Err(e) = log::set_boxed_logger(Box::new(combined)) {
        eprintln!("{}: failed to set global logger: {}", name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_severity() {
        assert_eq!(syslog_severity(Level::Error), 3);
        assert_eq!(syslog_severity(Level::Warn), 4);
        assert_eq!(syslog_severity(Level::Info), 6);
        assert_eq!(syslog_severity(Level::Debug), 7);
        assert_eq!(syslog_severity(Level::Trace), 7);
    }

    #[test]
    fn test_format() {
        assert_eq!(
            format_line("rngminder", &format_args!("read {} bytes", 512)),
            "rngminder: read 512 bytes"
        );
        assert_eq!(
            format_prefixed("rngminder", Level::Error, &format_args!("boom")),
            "<27>rngminder: boom"
        );
    }

    #[test]
    fn test_build_logger() {
        let logger = build_logger("test", &["console", "console", "nonsense"]);
        assert_eq!(logger.loggers.len(), 1);
    }

    #[test]
    fn test_init_log_to_console() {
        init_log("test", Level::Debug, &["console"]);
        log::error!("hello, error!");
        log::set_max_level(Level::Info.to_level_filter());
        log::debug!("hello debug!"); /* Won't print */
        log::info!("hello, info!");
    }
}
