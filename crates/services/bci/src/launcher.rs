//! Batch launcher.
//!
//! Walks every (board, test, build configuration) combination, one job at a
//! time and in catalog order. A combination that fails is logged with enough
//! context to reproduce it by hand, recorded in the [`Report`] and skipped;
//! the batch always goes on with the next one.
//!
//! Some failures concern the board itself rather than one job (invalid test
//! plan, unknown architecture, missing rootfs). The remaining jobs of that
//! board are skipped and the batch goes on with the next board.

use std::{ops::ControlFlow, sync::Arc};

use bci_config::{Board, BuildConfig};
use bci_crawler::{Locator, rootfs::RootfsChooser};
use bci_dispatcher_sdk::{JobStatus, PollOptions, Scheduler, Writer, poll_job};
use bci_job::{
    Candidates, JobAssembler, JobRequest, Overrides,
    selection::{configs_for, select_tests},
};
use tracing::{debug, info, warn};

/// A delivered job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub board: String,
    pub job: String,
    /// File paths or scheduler job ids.
    pub outputs: Vec<String>,
    /// Final status of each polled job id.
    pub results: Vec<(String, JobStatus)>,
}

/// A skipped combination and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub board: String,
    pub test: Option<String>,
    pub config: Option<BuildConfig>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub delivered: Vec<Delivered>,
    pub skipped: Vec<Skipped>,
}

impl Report {
    fn skip(&mut self, board: &Board, test: Option<&str>, config: Option<&BuildConfig>, reason: String) {
        let (tree, branch, defconfig) = match config {
            Some(config) => (
                config.tree.as_str(),
                config.branch.as_str(),
                config.defconfig.as_str(),
            ),
            None => ("-", "-", "-"),
        };
        warn!(
            "Skipping board {}, tree {tree}, branch {branch}, defconfig {defconfig}, test {}: {reason}",
            board.id,
            test.unwrap_or("-"),
        );
        self.skipped.push(Skipped {
            board: board.id.clone(),
            test: test.map(str::to_string),
            config: config.cloned(),
            reason,
        });
    }

    pub fn log_summary(&self) {
        info!(
            "{} job(s) delivered, {} skipped",
            self.delivered.len(),
            self.skipped.len()
        );
        for result in self.delivered.iter().flat_map(|job| &job.results) {
            info!("  Job {}: {}", result.0, result.1);
        }
    }
}

pub struct Launcher {
    assembler: JobAssembler,
    writer: Box<dyn Writer>,
    poller: Option<(Arc<dyn Scheduler>, PollOptions)>,
}

impl Launcher {
    pub fn new(assembler: JobAssembler, writer: Box<dyn Writer>) -> Self {
        Self {
            assembler,
            writer,
            poller: None,
        }
    }

    /// Wait for every submitted job to end.
    pub fn with_polling(mut self, scheduler: Arc<dyn Scheduler>, options: PollOptions) -> Self {
        self.poller = Some((scheduler, options));
        self
    }

    /// Run `tests` on the latest builds found for each board.
    ///
    /// Without `tests`, each board runs its own tests; without `configs`, each
    /// test runs on its own or its board build configurations.
    pub async fn run_ci(
        &self,
        locator: &Locator,
        boards: &[&Board],
        tests: &[String],
        configs: &[BuildConfig],
    ) -> Report {
        let mut report = Report::default();
        for &board in boards {
            info!("{}", board.id);
            let selected = select_tests(board, tests, self.assembler.tests());
            if selected.is_empty() {
                info!("  No test set");
            }

            'board: for test in &selected {
                debug!("  Building job(s) for {}", test.name);
                for config in configs_for(board, test, configs) {
                    debug!("  Fetching artifacts for {config}");
                    let located = match locator.resolve(board, &config).await {
                        Ok(located) => located,
                        Err(err) => {
                            let board_wide = matches!(
                                err,
                                bci_crawler::error::Error::UnknownArchitecture(_)
                                    | bci_crawler::error::Error::RootfsUnavailable(_)
                            );
                            report.skip(board, Some(&test.name), Some(&config), err.to_string());
                            if board_wide {
                                break 'board;
                            }
                            continue;
                        }
                    };

                    info!(
                        "  Making {} job on {} -> {} -> {}",
                        test.name, config.tree, config.branch, config.defconfig
                    );
                    let request = JobRequest {
                        board,
                        test,
                        config: Some(&config),
                        artifacts: located.artifacts.into(),
                        overrides: &Overrides::default(),
                    };
                    if self.deliver(&mut report, request).await.is_break() {
                        break 'board;
                    }
                }
            }
        }
        report
    }

    /// Run `tests` with user supplied artifacts.
    ///
    /// Boards use their catalog rootfs unless one is given in `overrides`.
    pub async fn run_custom(
        &self,
        rootfs: &RootfsChooser,
        boards: &[&Board],
        tests: &[String],
        overrides: &Overrides,
    ) -> Report {
        let mut report = Report::default();
        for &board in boards {
            info!("{}", board.id);
            let board_rootfs = match overrides.rootfs {
                Some(_) => None,
                None => match rootfs.choose(board).await {
                    Ok(rootfs) => Some(rootfs),
                    Err(err) => {
                        report.skip(board, None, None, err.to_string());
                        continue;
                    }
                },
            };

            for test in select_tests(board, tests, self.assembler.tests()) {
                info!("  Making {} job", test.name);
                let request = JobRequest {
                    board,
                    test: &test,
                    config: None,
                    artifacts: Candidates {
                        rootfs: board_rootfs.clone(),
                        ..Candidates::default()
                    },
                    overrides,
                };
                if self.deliver(&mut report, request).await.is_break() {
                    break;
                }
            }
        }
        report
    }

    /// Assemble, write and optionally poll one job.
    ///
    /// Breaks when the remaining jobs of the board can't be assembled either.
    async fn deliver(&self, report: &mut Report, request: JobRequest<'_>) -> ControlFlow<()> {
        let board = request.board;
        let test = request.test.name.clone();
        let config = request.config.cloned();

        let job = match self.assembler.assemble(request).await {
            Ok(job) => job,
            Err(err) => {
                let board_wide = matches!(err, bci_job::error::Error::InvalidTestPlan { .. });
                report.skip(board, Some(&test), config.as_ref(), err.to_string());
                return if board_wide {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                };
            }
        };

        match self.writer.write(board, &job.name, &job.text).await {
            Ok(outputs) => {
                let results = self.poll(&outputs).await;
                report.delivered.push(Delivered {
                    board: board.id.clone(),
                    job: job.name,
                    outputs,
                    results,
                });
            }
            Err(err) => report.skip(board, Some(&test), config.as_ref(), err.to_string()),
        }
        ControlFlow::Continue(())
    }

    async fn poll(&self, ids: &[String]) -> Vec<(String, JobStatus)> {
        let Some((scheduler, options)) = &self.poller else {
            return Vec::new();
        };
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            match poll_job(scheduler.as_ref(), id, *options).await {
                Ok(status) => results.push((id.clone(), status)),
                Err(err) => warn!("Couldn't get the result of job {id}: {err}"),
            }
        }
        results
    }
}
