//! Common types and utilities.

/// Job assembly error type.
pub use crate::error::Error;

/// Job assembly result type.
pub type Result<T> = core::result::Result<T, Error>;
