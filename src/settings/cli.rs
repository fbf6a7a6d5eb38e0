// SPDX-License-Identifier: GPL-3.0-or-later
use structopt::StructOpt;

use std::path::PathBuf;

/// Show a live thermal camera image on a small display.
#[derive(Debug, StructOpt)]
#[structopt()]
pub(crate) struct Args {
    /// Path to a configuration file.
    #[structopt(short, long, parse(from_os_str), default_value = "config.toml")]
    pub(crate) config_path: PathBuf,
}
