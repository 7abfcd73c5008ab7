//! Error types for the BCI launcher.
//!
//! Only errors that abort the whole run end up here: catalogs and settings
//! that can't be loaded, scheduler authentication failures. Errors of a
//! single job are logged and reported by the launcher instead.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] bci_config::error::Error),

    #[error(transparent)]
    Crawler(#[from] bci_crawler::error::Error),

    #[error(transparent)]
    Dispatch(#[from] bci_dispatcher_sdk::error::Error),

    #[error("No home directory to look for {0} in, use --config")]
    NoHomeDirectory(&'static str),
}
