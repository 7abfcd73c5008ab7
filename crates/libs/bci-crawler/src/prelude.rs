//! Common types and utilities.

/// Crawler error type.
pub use crate::error::Error;

/// Crawler result type.
pub type Result<T> = core::result::Result<T, Error>;
