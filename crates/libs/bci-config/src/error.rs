//! Configuration error types.

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// A build configuration wasn't written as `tree/branch/defconfig`.
    #[error("Invalid build configuration '{0}', expected tree/branch/defconfig")]
    InvalidBuildConfig(String),

    /// The requested board isn't part of the catalog.
    #[error("Unknown board '{0}'")]
    UnknownBoard(String),

    /// A setting required by the current mode is absent or empty.
    #[error("Missing mandatory setting '{0}'")]
    MissingSetting(&'static str),
}
