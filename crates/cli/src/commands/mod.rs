//! CLI subcommands.

use jardin_storefront::{AppError, FileStore, Page, StorageError, Storefront, StorefrontConfig};
use thiserror::Error;

pub mod cart;
pub mod contact;
pub mod session;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Storefront operation failed.
    #[error("{0}")]
    App(#[from] AppError),

    /// Writing output or reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The contact form rejected the submission.
    #[error("Contact form rejected: {0}")]
    ContactRejected(String),
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        Self::App(err.into())
    }
}

/// Open a storefront on the standard page over the file-backed store.
pub fn open_storefront(config: StorefrontConfig) -> Result<Storefront<FileStore>, CommandError> {
    let store = FileStore::open(config.storage_path.clone())?;
    tracing::debug!(path = %store.path().display(), "Using storage file");
    Ok(Storefront::new(config, store, Page::standard()))
}

/// Load configuration from the environment and `.env`.
pub fn load_config() -> Result<StorefrontConfig, CommandError> {
    StorefrontConfig::from_env()
        .map_err(AppError::from)
        .map_err(CommandError::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_config_surfaces_as_app_error() {
        let err = StorefrontConfig::from_lookup(|key| {
            (key == "JARDIN_TOAST_DISMISS_MS").then(|| "soon".to_string())
        })
        .map_err(AppError::from)
        .map_err(CommandError::from)
        .unwrap_err();

        assert!(matches!(err, CommandError::App(AppError::Config(_))));
        assert!(err.to_string().starts_with("Config error: "));
    }
}
