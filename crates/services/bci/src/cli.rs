//! Command-line interface for the BCI launcher.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command-line interface for the BCI launcher.
#[derive(Parser)]
#[command(name = "bci")]
#[command(about = "BCI - Find kernel builds, craft LAVA jobs for boards and send them")]
pub struct Cli {
    /// Settings file (defaults to ~/.bcirc.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Board catalog
    #[arg(long = "boards-catalog", global = true, default_value = "boards.toml")]
    pub boards_catalog: PathBuf,

    /// Test catalog, giving templates and timeouts of the tests
    #[arg(long, global = true)]
    pub tests_catalog: Option<PathBuf>,

    /// Debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Delivery options shared by every launching command.
#[derive(Args, Debug, Clone, Default)]
pub struct Delivery {
    /// Don't send the jobs, save them in the output directory instead
    #[arg(long)]
    pub no_send: bool,

    /// Directory where jobs are saved when not sent
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Poll until the results of the jobs are available
    #[arg(long)]
    pub poll: bool,

    /// Give up polling after this many minutes
    #[arg(long, requires = "poll")]
    pub poll_timeout: Option<u64>,

    /// LAVA server to send the jobs to
    #[arg(long)]
    pub server: Option<String>,

    /// LAVA username
    #[arg(long)]
    pub username: Option<String>,

    /// LAVA token (can also be set via BCI_SCHEDULER_TOKEN environment variable)
    #[arg(long, env = "BCI_SCHEDULER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the boards of the catalog
    List,
    /// Run the catalog tests on the latest kernel builds
    Ci(CiArgs),
    /// Run tests on your own kernel, device tree, modules or rootfs
    Custom(CustomArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CiArgs {
    /// Boards to run the tests on (defaults to every board of the catalog)
    #[arg(short, long, num_args = 1..)]
    pub boards: Vec<String>,

    /// Tests to run (defaults to the tests each board declares)
    #[arg(short, long, num_args = 1..)]
    pub tests: Vec<String>,

    /// Build configurations, as tree/branch/defconfig
    #[arg(long, num_args = 1..)]
    pub configs: Vec<String>,

    /// KernelCI API token (can also be set via BCI_KERNELCI_TOKEN environment variable)
    #[arg(long, env = "BCI_KERNELCI_TOKEN", hide_env_values = true)]
    pub kernelci_token: Option<String>,

    #[command(flatten)]
    pub delivery: Delivery,
}

#[derive(Args, Debug, Clone)]
pub struct CustomArgs {
    /// Boards to run the tests on
    #[arg(short, long, num_args = 1.., required = true)]
    pub boards: Vec<String>,

    /// Tests to run on the boards (defaults to the tests each board declares)
    #[arg(short, long, num_args = 1..)]
    pub tests: Vec<String>,

    /// Path or URL of your kernel image
    #[arg(long)]
    pub kernel: Option<String>,

    /// Path or URL of your device tree blob
    #[arg(long, conflicts_with = "dtb_folder")]
    pub dtb: Option<String>,

    /// Folder holding the device tree blobs, named after the boards dt
    #[arg(long)]
    pub dtb_folder: Option<String>,

    /// Path or URL of your modules archive
    #[arg(long)]
    pub modules: Option<String>,

    /// Path or URL of your rootfs image (defaults to the board rootfs)
    #[arg(long)]
    pub rootfs: Option<String>,

    /// Job name, replacing the generated one
    #[arg(long)]
    pub job_name: Option<String>,

    /// Job timeout in minutes
    #[arg(long)]
    pub timeout: Option<u32>,

    /// Notify the board recipients instead of the configured ones
    #[arg(long)]
    pub default_notify: bool,

    /// SSH server where local files are uploaded
    #[arg(long)]
    pub ssh_server: Option<String>,

    /// SSH username
    #[arg(long)]
    pub ssh_username: Option<String>,

    #[command(flatten)]
    pub delivery: Delivery,
}
