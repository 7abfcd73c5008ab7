//! BCI launcher (bci)
//!
//! Runs Linux kernels on the boards of a LAVA lab:
//!
//! - **List**: show the boards of the catalog
//! - **Ci**: find the latest kernel builds on the build farm (or KernelCI),
//!   craft a job for every board, test and build configuration and send it
//! - **Custom**: craft jobs from your own kernel, device tree, modules or
//!   rootfs, uploading local files to the staging server first
//!
//! Jobs are either submitted to the LAVA scheduler or, with `--no-send`,
//! saved as YAML files.

mod cli;
mod commands;
mod error;
mod launcher;
mod prelude;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    commands::{Context, handle_ci, handle_custom, handle_list},
    prelude::*,
};

/// Main entry point for the BCI launcher.
///
/// # Examples
///
/// ```bash
/// # Send the catalog tests of two boards
/// bci ci -b armada-370-db beaglebone
///
/// # Save a job for your own kernel instead of sending it
/// bci custom -b beaglebone -t boot --kernel arch/arm/boot/zImage \
///     --dtb-folder arch/arm/boot/dts --no-send
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "bci={level},bci_config={level},bci_crawler={level},bci_io={level},\
                 bci_job={level},bci_dispatcher_sdk={level},bci_requests={level}"
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = run(cli).await;
    if let Err(ref err) = result {
        error!("Error: {err}");
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let context = Context::load(
        cli.config,
        &cli.boards_catalog,
        cli.tests_catalog.as_deref(),
    )?;
    match cli.command {
        Commands::List => handle_list(&context),
        Commands::Ci(args) => handle_ci(context, args).await,
        Commands::Custom(args) => handle_custom(context, args).await,
    }
}
