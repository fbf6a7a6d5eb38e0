// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use futures::future::FutureExt;
use structopt::StructOpt;
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod camera;
mod display;
mod error;
mod image_buffer;
mod pipeline;
mod render;
mod settings;
mod temperature;
mod util;

use crate::pipeline::{Command, ConfiguredPipeline};
use crate::settings::{Args, Settings};
use crate::util::flatten_join_result;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::from_args();
    let config = Settings::from_file(&args.config_path)?;
    debug!(?config, "loaded configuration");
    let pipeline = ConfiguredPipeline::from_settings(&config).context("Invalid configuration")?;
    let commands = pipeline.command_channel();
    let mut acquisition = spawn_blocking(move || pipeline.run()).map(flatten_join_result);
    tokio::select! {
        result = &mut acquisition => return result,
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!(error = ?err, "unable to listen for Ctrl-C, stopping");
            } else {
                info!("received Ctrl-C, stopping");
            }
        }
    }
    // The loop only exits on its own if it failed, in which case the receiver is gone and the
    // real error comes from awaiting it.
    if commands.send(Command::Shutdown).is_err() {
        debug!("acquisition loop already stopped");
    }
    acquisition.await
}
