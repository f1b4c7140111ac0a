//! Contact form command.
//!
//! Runs the submission through the same validation the page applies and
//! prints either the accepted message or one line per field error.

use std::io::Write;

use jardin_storefront::StorefrontConfig;
use jardin_storefront::contact::ContactSubmission;

use super::{CommandError, open_storefront};

/// Submit a contact message.
pub fn submit(
    config: StorefrontConfig,
    name: String,
    email: String,
    message: String,
) -> Result<(), CommandError> {
    let mut storefront = open_storefront(config)?;
    let submission = ContactSubmission {
        name,
        email,
        message,
    };

    let mut out = std::io::stdout().lock();
    match storefront.submit_contact(&submission)? {
        Some(Ok(accepted)) => {
            writeln!(out, "Message from {} <{}> sent", accepted.name, accepted.email)?;
            Ok(())
        }
        Some(Err(errors)) => {
            for error in &errors {
                writeln!(out, "{:?}: {}", error.field, error.message)?;
            }
            Err(CommandError::ContactRejected(format!(
                "{} invalid field(s)",
                errors.len()
            )))
        }
        None => Ok(()),
    }
}
