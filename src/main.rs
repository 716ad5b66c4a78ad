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

//! # rngminder
//!
//! Stores the entropy pool on system shutdown and restores it on next boot.

use clap::Parser;
use rngminder::command::{run, Command, Request};
use rngminder::config::{RngminderConfig, DEFAULT_CONFIG};
use std::path::{Path, PathBuf};
use std::process;

/// Store the kernel entropy pool on shutdown and restore it on boot.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Args {
    /// load the pool from the seed file, or store it there
    #[clap(value_enum)]
    command: Command,

    /// number of bits to load/store, defaults to full pool size
    #[clap(short, long, value_parser, allow_hyphen_values = true)]
    bits: Option<String>,

    /// name of the file to load from or store to
    #[clap(short, long, value_parser)]
    file: Option<PathBuf>,

    /// keep the old file after loading from it
    #[clap(short, long, value_parser)]
    keep: bool,

    /// configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RngminderConfig::load(path, true),
        None => RngminderConfig::load(Path::new(DEFAULT_CONFIG), false),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            log::init_log_to_console("rngminder", log::Level::Info);
            log::error!("{}", e);
            process::exit(1);
        }
    };

    let targets: Vec<&str> = config.log_targets.iter().map(String::as_str).collect();
    log::init_log("rngminder", config.log_level, &targets);

    unsafe {
        libc::umask(0o022);
    }

    let result = Request::resolve(args.command, args.bits.as_deref(), args.file, args.keep, &config)
        .and_then(|request| run(&request, &config));
    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(1);
    }

    process::exit(0);
}
