//! Common types and utilities.

/// Launcher error type.
pub use crate::error::Error;

/// Launcher result type.
pub type Result<T> = core::result::Result<T, Error>;
