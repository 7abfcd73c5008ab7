//! Test, configuration and template selection.

use bci_config::{Board, BuildConfig, TestBinding, TestCatalog};
use tracing::{debug, warn};

/// Template used when neither the binding nor the catalog names one.
pub const DEFAULT_TEMPLATE: &str = "generic_simple_job.jinja";

/// Job name delimiter.
pub const DELIMITER: &str = "--";

/// Tests to run on `board`.
///
/// Without requested names, the board bindings run (or the default `boot`
/// test for boards binding none). Requested names are matched against the
/// board bindings; a name the board doesn't bind still runs as a bare
/// binding if the test catalog is empty or knows it, and is skipped with a
/// warning otherwise.
pub fn select_tests(board: &Board, requested: &[String], catalog: &TestCatalog) -> Vec<TestBinding> {
    if requested.is_empty() {
        return board.default_tests();
    }
    requested
        .iter()
        .filter_map(|name| match board.binding(name) {
            Some(binding) => Some(binding.clone()),
            None if catalog.is_empty() || catalog.contains(name) => {
                debug!("{} doesn't bind {name}, running it bare", board.id);
                Some(TestBinding::bare(name.as_str()))
            }
            None => {
                warn!("Unknown test {name} for {}, skipping", board.id);
                None
            }
        })
        .collect()
}

/// Build configurations for one test: user supplied, then the binding ones,
/// then the board defaults.
pub fn configs_for(board: &Board, binding: &TestBinding, user: &[BuildConfig]) -> Vec<BuildConfig> {
    if !user.is_empty() {
        user.to_vec()
    } else if !binding.configs.is_empty() {
        binding.configs.clone()
    } else {
        board.configs.clone()
    }
}

/// Template for one test: binding override, catalog template, then the default.
pub fn template_for(binding: &TestBinding, catalog: &TestCatalog) -> String {
    binding
        .template
        .clone()
        .or_else(|| catalog.get(&binding.name).and_then(|test| test.template.clone()))
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
}

/// Timeout in minutes: override, then the catalog one.
pub fn timeout_for(test: &str, timeout: Option<u32>, catalog: &TestCatalog) -> Option<u32> {
    timeout.or_else(|| catalog.get(test).and_then(|test| test.timeout))
}

/// Job name.
///
/// An explicit name wins. Otherwise `{device_type}--{tree}--{defconfig}--{test}`
/// for builds found on repositories and `{device_type}--custom_kernel--{test}`
/// for user supplied kernels.
///
/// # Examples
///
/// ```rust
/// use bci_config::BuildConfig;
/// use bci_job::selection::job_name;
///
/// let config = BuildConfig::new("mainline", "master", "multi_v7_defconfig");
/// assert_eq!(
///     job_name("armada-370-db", Some(&config), "boot", None),
///     "armada-370-db--mainline--multi_v7_defconfig--boot"
/// );
/// assert_eq!(
///     job_name("armada-370-db", None, "boot", None),
///     "armada-370-db--custom_kernel--boot"
/// );
/// assert_eq!(job_name("armada-370-db", None, "boot", Some("myjob")), "myjob");
/// ```
pub fn job_name(
    device_type: &str,
    config: Option<&BuildConfig>,
    test: &str,
    explicit: Option<&str>,
) -> String {
    if let Some(name) = explicit {
        return name.to_string();
    }
    match config {
        Some(config) => [
            device_type,
            config.tree.as_str(),
            config.defconfig.as_str(),
            test,
        ]
        .join(DELIMITER),
        None => [device_type, "custom_kernel", test].join(DELIMITER),
    }
}

/// Notification recipients, either the board ones or the caller ones.
pub fn recipients(
    board: &Board,
    board_defaults: bool,
    notify: &[String],
    on_incomplete: &[String],
) -> (Vec<String>, Vec<String>) {
    if board_defaults {
        (board.notify.clone(), board.notify_on_incomplete.clone())
    } else {
        (notify.to_vec(), on_incomplete.to_vec())
    }
}
