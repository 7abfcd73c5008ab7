//! Common types and utilities.

/// Delivery error type.
pub use crate::error::Error;

/// Delivery result type.
pub type Result<T> = core::result::Result<T, Error>;
