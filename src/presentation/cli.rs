// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::harvest::DEFAULT_OUTPUT_FILE;
use clap::Parser;
use std::path::PathBuf;

/// 工具版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER: &str = r"
  _____   _          _____  _
 |  __ \ | |        / ____|| |
 | |__) || |__     | (___  | |__
 |  ___/ | '_ \     \___ \ | '_ \
 | |     | | | | _  ____) || | | |
 |_|     |_| |_|(_)|_____/ |_| |_|
";

/// 命令行参数
#[derive(Debug, Clone, Parser)]
#[command(
    name = "phsh-url",
    about = "Collects historical URLs for a list of domains from several intelligence sources",
    disable_version_flag = true
)]
pub struct Cli {
    /// Path to the output file.
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Path to file with domains. If empty, reads from stdin.
    #[arg(short = 'd', long = "domains")]
    pub domains: Option<PathBuf>,

    /// Run in silent mode, only outputting URLs to stdout.
    #[arg(long)]
    pub silent: bool,

    /// Comma-separated list of sources to exclude (vt, otx, wayback, hr).
    #[arg(short = 'e', long = "exclude", default_value = "")]
    pub exclude: String,

    /// Path to the configuration file (defaults to ~/.config/Ph.Sh_url/config.yaml).
    #[arg(short = 'c', long = "config", env = "PHSH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the version of the tool.
    #[arg(long)]
    pub version: bool,
}

pub fn version_line() -> String {
    format!("Ph.Sh_url version: {}", VERSION)
}

pub fn banner() -> &'static str {
    BANNER
}
