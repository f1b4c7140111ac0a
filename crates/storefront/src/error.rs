//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything a storefront operation
//! can surface to its host. Component-level failures that the page absorbs
//! (blocked contact submissions, unparsable product cards) are reported to
//! the user and never reach this type.

use thiserror::Error;

use jardin_core::ProductError;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing the cart slot failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A product record was rejected.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// A page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
