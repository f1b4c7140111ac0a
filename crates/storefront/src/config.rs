//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `JARDIN_CART_STORAGE_KEY` - Durable slot holding the cart (default: jardinfleur-cart)
//! - `JARDIN_STORAGE_PATH` - File backing the durable store (default: .jardin/storage.json)
//! - `JARDIN_TOAST_DISMISS_MS` - Toast auto-dismiss delay (default: 3000)
//! - `JARDIN_TOAST_EXIT_MS` - Toast exit transition before removal (default: 300)
//! - `JARDIN_TOAST_MAX_VISIBLE` - Concurrent toast bound, 0 for unbounded (default: 5)
//! - `JARDIN_FOCUS_DELAY_MS` - Delay before the overlay focuses its close control (default: 100)
//! - `JARDIN_BADGE_CAP` - Largest count shown verbatim on the cart badge (default: 99)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_CART_STORAGE_KEY: &str = "jardinfleur-cart";
const DEFAULT_STORAGE_PATH: &str = ".jardin/storage.json";
const DEFAULT_TOAST_DISMISS_MS: u64 = 3000;
const DEFAULT_TOAST_EXIT_MS: u64 = 300;
const DEFAULT_TOAST_MAX_VISIBLE: usize = 5;
const DEFAULT_FOCUS_DELAY_MS: u64 = 100;
const DEFAULT_BADGE_CAP: u64 = 99;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Key of the durable slot holding the serialized cart
    pub cart_storage_key: String,
    /// Path of the JSON file used by the file-backed store
    pub storage_path: PathBuf,
    /// Notification timings and bounds
    pub toast: ToastConfig,
    /// Delay before the product overlay moves focus to its close control
    pub focus_delay: Duration,
    /// Counts above this render as `"<cap>+"` on the cart badge
    pub badge_cap: u64,
}

/// Toast notification configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    /// Time a toast stays up before dismissing itself
    pub dismiss_after: Duration,
    /// Exit transition length; removal is deferred by this much
    pub exit_after: Duration,
    /// Maximum concurrently visible toasts, `None` for unbounded
    pub max_visible: Option<usize>,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            dismiss_after: Duration::from_millis(DEFAULT_TOAST_DISMISS_MS),
            exit_after: Duration::from_millis(DEFAULT_TOAST_EXIT_MS),
            max_visible: Some(DEFAULT_TOAST_MAX_VISIBLE),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_storage_key: DEFAULT_CART_STORAGE_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            toast: ToastConfig::default(),
            focus_delay: Duration::from_millis(DEFAULT_FOCUS_DELAY_MS),
            badge_cap: DEFAULT_BADGE_CAP,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cart_storage_key = lookup("JARDIN_CART_STORAGE_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CART_STORAGE_KEY.to_string());
        let storage_path = lookup("JARDIN_STORAGE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from);

        let dismiss_ms = parse_or_default(&lookup, "JARDIN_TOAST_DISMISS_MS", DEFAULT_TOAST_DISMISS_MS)?;
        let exit_ms = parse_or_default(&lookup, "JARDIN_TOAST_EXIT_MS", DEFAULT_TOAST_EXIT_MS)?;
        let max_visible =
            parse_or_default(&lookup, "JARDIN_TOAST_MAX_VISIBLE", DEFAULT_TOAST_MAX_VISIBLE)?;
        let focus_ms = parse_or_default(&lookup, "JARDIN_FOCUS_DELAY_MS", DEFAULT_FOCUS_DELAY_MS)?;
        let badge_cap = parse_or_default(&lookup, "JARDIN_BADGE_CAP", DEFAULT_BADGE_CAP)?;

        Ok(Self {
            cart_storage_key,
            storage_path,
            toast: ToastConfig {
                dismiss_after: Duration::from_millis(dismiss_ms),
                exit_after: Duration::from_millis(exit_ms),
                max_visible: (max_visible > 0).then_some(max_visible),
            },
            focus_delay: Duration::from_millis(focus_ms),
            badge_cap,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to a default when it is unset.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
