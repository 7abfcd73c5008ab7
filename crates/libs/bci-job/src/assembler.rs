//! Job assembler.
//!
//! Merges board defaults, resolved artifacts and per-invocation overrides
//! into a [`JobDescriptor`], then renders it. Overrides always win over
//! resolved artifacts, which win over board defaults.

use bci_config::{Board, BuildConfig, TestBinding, TestCatalog};
use bci_crawler::ArtifactSet;
use bci_io::stager::Stager;
use tracing::{debug, info};

use crate::{
    builder::JobBuilder,
    descriptor::JobDescriptor,
    prelude::*,
    render::Render,
    selection::{job_name, recipients, template_for, timeout_for},
};

/// Values given for one invocation, applied to every job it assembles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub kernel: Option<String>,
    pub dtb: Option<String>,
    /// Directory holding `{dt}.dtb` files, used when no `dtb` is given.
    pub dtb_folder: Option<String>,
    pub modules: Option<String>,
    pub rootfs: Option<String>,
    pub job_name: Option<String>,
    /// Timeout in minutes.
    pub timeout: Option<u32>,
}

/// Artifact references known before overrides are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub kernel: Option<String>,
    pub dtb: Option<String>,
    pub modules: Option<String>,
    pub rootfs: Option<String>,
}

impl From<ArtifactSet> for Candidates {
    fn from(value: ArtifactSet) -> Self {
        Self {
            kernel: Some(value.kernel),
            dtb: Some(value.dtb),
            modules: value.modules,
            rootfs: Some(value.rootfs),
        }
    }
}

/// Who gets notified of job results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyPolicy {
    /// Use the board recipients instead of the ones below.
    pub board_defaults: bool,
    pub recipients: Vec<String>,
    pub on_incomplete: Vec<String>,
}

/// One job to assemble.
pub struct JobRequest<'a> {
    pub board: &'a Board,
    pub test: &'a TestBinding,
    /// Build configuration the artifacts come from, `None` for user supplied kernels.
    pub config: Option<&'a BuildConfig>,
    pub artifacts: Candidates,
    pub overrides: &'a Overrides,
}

/// An assembled job, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedJob {
    pub name: String,
    pub template: String,
    pub descriptor: JobDescriptor,
    pub text: String,
}

pub struct JobAssembler {
    lava_server: Option<String>,
    lava_stream: Option<String>,
    notify: NotifyPolicy,
    tests: TestCatalog,
    stager: Stager,
    renderer: Box<dyn Render>,
}

impl JobAssembler {
    pub fn new(renderer: Box<dyn Render>, stager: Stager, tests: TestCatalog) -> Self {
        Self {
            lava_server: None,
            lava_stream: None,
            notify: NotifyPolicy::default(),
            tests,
            stager,
            renderer,
        }
    }

    /// Scheduler server and stream written in the jobs.
    pub fn with_connection(mut self, server: Option<String>, stream: Option<String>) -> Self {
        self.lava_server = server;
        self.lava_stream = stream;
        self
    }

    pub fn with_notify(mut self, notify: NotifyPolicy) -> Self {
        self.notify = notify;
        self
    }

    pub fn tests(&self) -> &TestCatalog {
        &self.tests
    }

    /// Apply overrides on top of `candidates` and stage local files.
    ///
    /// Fields with no value at all are left empty.
    pub async fn merge_artifacts(
        &self,
        board: &Board,
        candidates: Candidates,
        overrides: &Overrides,
    ) -> Result<ArtifactSet> {
        let dtb = overrides
            .dtb
            .clone()
            .or_else(|| {
                overrides
                    .dtb_folder
                    .as_ref()
                    .map(|folder| format!("{}/{}.dtb", folder.trim_end_matches('/'), board.dt))
            })
            .or(candidates.dtb);

        let rootfs = self
            .stage(overrides.rootfs.clone().or(candidates.rootfs))
            .await?;
        info!("    Root filesystem path: {rootfs}");
        let kernel = self
            .stage(overrides.kernel.clone().or(candidates.kernel))
            .await?;
        info!("    Kernel path: {kernel}");
        let dtb = self.stage(dtb).await?;
        info!("    Device tree path: {dtb}");
        let modules = match overrides.modules.clone().or(candidates.modules) {
            Some(modules) => {
                let modules = self.stage(Some(modules)).await?;
                info!("    Modules archive path: {modules}");
                Some(modules)
            }
            None => None,
        };

        Ok(ArtifactSet {
            kernel,
            dtb,
            modules,
            rootfs,
        })
    }

    async fn stage(&self, reference: Option<String>) -> Result<String> {
        match reference {
            Some(reference) if !reference.is_empty() => Ok(self.stager.stage(&reference).await?),
            _ => Ok(String::new()),
        }
    }

    /// Assemble and render one job.
    pub async fn assemble(&self, request: JobRequest<'_>) -> Result<RenderedJob> {
        let JobRequest {
            board,
            test,
            config,
            artifacts,
            overrides,
        } = request;

        let (notify, on_incomplete) = recipients(
            board,
            self.notify.board_defaults,
            &self.notify.recipients,
            &self.notify.on_incomplete,
        );
        info!("    Notifications recipients: {}", notify.join(", "));

        let builder = JobBuilder::new(self.lava_server.as_deref(), self.lava_stream.as_deref())
            .board(board)?
            .notify(notify, on_incomplete);
        let artifacts = self.merge_artifacts(board, artifacts, overrides).await?;
        let name = job_name(
            &board.device_type,
            config,
            &test.name,
            overrides.job_name.as_deref(),
        );
        let descriptor = builder
            .artifacts(artifacts)
            .test(
                test.name.as_str(),
                timeout_for(&test.name, overrides.timeout, &self.tests),
            )
            .name(name.as_str())?;
        debug!("    Job name: {name}");

        let template = template_for(test, &self.tests);
        let text = self.renderer.render(&template, &descriptor)?;
        Ok(RenderedJob {
            name,
            template,
            descriptor,
            text,
        })
    }
}
