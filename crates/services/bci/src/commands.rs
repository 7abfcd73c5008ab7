//! Command handlers for the BCI launcher.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use bci_config::{BoardCatalog, BuildConfig, Settings, TestCatalog};
use bci_crawler::{Locator, rootfs::RootfsChooser};
use bci_dispatcher_sdk::{FileWriter, LavaClient, LavaWriter, PollOptions, Scheduler, Writer};
use bci_io::stager::{Stager, is_remote};
use bci_job::{JobAssembler, NotifyPolicy, Overrides, TemplateDir};
use tracing::{info, warn};

use crate::{
    cli::{CiArgs, CustomArgs, Delivery},
    launcher::Launcher,
    prelude::*,
};

/// Settings file looked for in the home directory.
pub const SETTINGS_FILE: &str = ".bcirc.toml";

/// Catalogs and settings, loaded once before anything runs.
pub struct Context {
    pub settings: Settings,
    pub boards: BoardCatalog,
    pub tests: TestCatalog,
}

impl Context {
    /// Load the settings and catalogs.
    ///
    /// A missing settings file is only tolerated at its default location.
    pub fn load(
        config: Option<PathBuf>,
        boards_catalog: &Path,
        tests_catalog: Option<&Path>,
    ) -> Result<Self> {
        let settings = match config {
            Some(path) => Settings::from_file(&path)?,
            None => {
                let path = dirs::home_dir()
                    .map(|home| home.join(SETTINGS_FILE))
                    .ok_or(Error::NoHomeDirectory(SETTINGS_FILE))?;
                if path.exists() {
                    Settings::from_file(&path)?
                } else {
                    warn!("No settings file at {}, using defaults", path.display());
                    Settings::default()
                }
            }
        };
        let tests = match tests_catalog {
            Some(path) => TestCatalog::from_file(path)?,
            None => TestCatalog::default(),
        };
        Ok(Self {
            settings,
            boards: BoardCatalog::from_file(boards_catalog)?,
            tests,
        })
    }
}

/// Print the boards of the catalog.
pub fn handle_list(context: &Context) -> Result<()> {
    println!("Available boards:");
    for board in context.boards.iter() {
        println!(
            "  {} ({}, {}, {})",
            board.id, board.device_type, board.arch, board.test_plan
        );
        for config in &board.configs {
            println!("    {config}");
        }
    }
    Ok(())
}

/// Run a CI batch on the latest builds of the repositories.
pub async fn handle_ci(context: Context, args: CiArgs) -> Result<()> {
    let Context {
        mut settings,
        boards,
        tests,
    } = context;
    apply_delivery(&mut settings, &args.delivery);
    if let Some(token) = args.kernelci_token {
        settings.kernelci.api_token = Some(token);
    }
    settings.validate_ci(!args.delivery.no_send)?;

    let configs = args
        .configs
        .iter()
        .map(|config| config.parse::<BuildConfig>())
        .collect::<core::result::Result<Vec<_>, _>>()?;
    let selected = if args.boards.is_empty() {
        boards.iter().collect()
    } else {
        boards.select(&args.boards)?
    };

    let locator = Locator::from_settings(&settings)?;
    let notify = NotifyPolicy {
        board_defaults: true,
        ..NotifyPolicy::default()
    };
    let launcher = launcher(&settings, tests, notify, &args.delivery).await?;
    let report = launcher
        .run_ci(&locator, &selected, &args.tests, &configs)
        .await;
    report.log_summary();
    Ok(())
}

/// Run tests with user supplied artifacts.
pub async fn handle_custom(context: Context, args: CustomArgs) -> Result<()> {
    let Context {
        mut settings,
        boards,
        tests,
    } = context;
    apply_delivery(&mut settings, &args.delivery);
    if args.ssh_server.is_some() {
        settings.ssh.server = args.ssh_server;
    }
    if args.ssh_username.is_some() {
        settings.ssh.username = args.ssh_username;
    }

    let overrides = Overrides {
        kernel: args.kernel,
        dtb: args.dtb,
        dtb_folder: args.dtb_folder,
        modules: args.modules,
        rootfs: args.rootfs,
        job_name: args.job_name,
        timeout: args.timeout,
    };
    let stage = [
        &overrides.kernel,
        &overrides.dtb,
        &overrides.dtb_folder,
        &overrides.modules,
        &overrides.rootfs,
    ]
    .into_iter()
    .flatten()
    .any(|reference| !is_remote(reference));
    settings.validate_custom(!args.delivery.no_send, stage)?;

    let selected = boards.select(&args.boards)?;
    let rootfs = RootfsChooser::from_url(&settings.rootfs.url)?;
    let notify = NotifyPolicy {
        board_defaults: args.default_notify,
        recipients: settings.notify.recipients.clone(),
        on_incomplete: settings.notify.on_incomplete.clone(),
    };
    let launcher = launcher(&settings, tests, notify, &args.delivery).await?;
    let report = launcher
        .run_custom(&rootfs, &selected, &args.tests, &overrides)
        .await;
    report.log_summary();
    Ok(())
}

/// Command line values win over the settings file.
fn apply_delivery(settings: &mut Settings, delivery: &Delivery) {
    if let Some(server) = &delivery.server {
        settings.scheduler.server = Some(server.clone());
    }
    if let Some(username) = &delivery.username {
        settings.scheduler.username = Some(username.clone());
    }
    if let Some(token) = &delivery.token {
        settings.scheduler.token = Some(token.clone());
    }
    if let Some(output_dir) = &delivery.output_dir {
        settings.jobs.output_dir = output_dir.clone();
    }
}

async fn launcher(
    settings: &Settings,
    tests: TestCatalog,
    notify: NotifyPolicy,
    delivery: &Delivery,
) -> Result<Launcher> {
    let assembler = JobAssembler::new(
        Box::new(TemplateDir::new(&settings.jobs.templates_dir)),
        Stager::from_settings(&settings.ssh),
        tests,
    )
    .with_connection(
        settings.scheduler.server.clone(),
        settings.scheduler.stream.clone(),
    )
    .with_notify(notify);

    if delivery.no_send {
        if delivery.poll {
            warn!("Jobs aren't sent, nothing to poll");
        }
        info!("Jobs will be saved in {}", settings.jobs.output_dir.display());
        let writer: Box<dyn Writer> = Box::new(FileWriter::new(&settings.jobs.output_dir));
        return Ok(Launcher::new(assembler, writer));
    }

    let (server, username, token) = settings.scheduler_credentials()?;
    let scheduler: Arc<dyn Scheduler> = Arc::new(LavaClient::connect(server, username, token).await?);
    let web_ui_address = settings.web_ui_address().unwrap_or(server);
    let launcher = Launcher::new(
        assembler,
        Box::new(LavaWriter::new(scheduler.clone(), web_ui_address)),
    );
    if !delivery.poll {
        return Ok(launcher);
    }
    Ok(launcher.with_polling(scheduler, poll_options(delivery)))
}

fn poll_options(delivery: &Delivery) -> PollOptions {
    PollOptions {
        deadline: delivery
            .poll_timeout
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60))),
        ..PollOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_wins() {
        let mut settings = Settings::from_toml(
            r#"
            [scheduler]
            server = "https://lava.example.com"
            username = "ci"
            "#,
        )
        .unwrap();
        let delivery = Delivery {
            username: Some(String::from("me")),
            token: Some(String::from("secret")),
            output_dir: Some(PathBuf::from("out")),
            ..Delivery::default()
        };

        apply_delivery(&mut settings, &delivery);

        assert_eq!(
            settings.scheduler_credentials().unwrap(),
            ("https://lava.example.com", "me", "secret")
        );
        assert_eq!(settings.jobs.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn poll_timeout_is_in_minutes() {
        let mut delivery = Delivery {
            poll: true,
            ..Delivery::default()
        };
        assert_eq!(poll_options(&delivery).deadline, None);

        delivery.poll_timeout = Some(90);
        assert_eq!(
            poll_options(&delivery).deadline,
            Some(Duration::from_secs(90 * 60))
        );

        delivery.poll_timeout = Some(u64::MAX);
        assert_eq!(
            poll_options(&delivery).deadline,
            Some(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn explicit_settings_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let boards = dir.path().join("boards.toml");
        std::fs::write(&boards, "[boards]\n").unwrap();

        let missing = Context::load(Some(dir.path().join("missing.toml")), &boards, None);
        assert!(matches!(missing, Err(Error::Config(_))));

        let settings = dir.path().join("bcirc.toml");
        std::fs::write(&settings, "freshness_hours = 48\n").unwrap();
        let context = Context::load(Some(settings), &boards, None).unwrap();
        assert_eq!(context.settings.freshness(), Duration::from_secs(48 * 60 * 60));
        assert!(context.boards.is_empty());
        assert!(context.tests.is_empty());
    }
}
