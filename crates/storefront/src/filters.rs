//! Custom Askama template filters.

use std::fmt::Display;

/// Formats an integer amount as a price.
///
/// Usage in templates: `{{ item.price|dollars }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn dollars(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("${amount}"))
}
