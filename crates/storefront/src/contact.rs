//! Contact form validation with inline field errors.

use serde::{Deserialize, Serialize};

use jardin_core::{Email, EmailError};

use crate::dom::{MountPoint, Page};

/// A contact form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    /// All fields in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    /// The field's input element.
    #[must_use]
    pub const fn input(&self) -> MountPoint {
        match self {
            Self::Name => MountPoint::ContactName,
            Self::Email => MountPoint::ContactEmail,
            Self::Message => MountPoint::ContactMessage,
        }
    }

    /// The element showing the field's error text.
    #[must_use]
    pub const fn error_slot(&self) -> MountPoint {
        match self {
            Self::Name => MountPoint::NameError,
            Self::Email => MountPoint::EmailError,
            Self::Message => MountPoint::MessageError,
        }
    }
}

/// An inline validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: &'static str,
}

/// Raw values submitted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub message: String,
}

/// Validate a submission.
///
/// Every field is checked so all errors can be shown at once.
///
/// # Errors
///
/// Returns one [`FieldError`] per failing field, in form order.
pub fn validate(submission: &ContactSubmission) -> Result<ContactMessage, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = submission.name.trim();
    if name.is_empty() {
        errors.push(FieldError {
            field: ContactField::Name,
            message: "Please enter your name",
        });
    }

    let email = match Email::parse(&submission.email) {
        Ok(email) => Some(email),
        Err(EmailError::Empty) => {
            errors.push(FieldError {
                field: ContactField::Email,
                message: "Please enter your email",
            });
            None
        }
        Err(_) => {
            errors.push(FieldError {
                field: ContactField::Email,
                message: "Please enter a valid email",
            });
            None
        }
    };

    let message = submission.message.trim();
    if message.is_empty() {
        errors.push(FieldError {
            field: ContactField::Message,
            message: "Please enter your message",
        });
    }

    match email {
        Some(email) if errors.is_empty() => Ok(ContactMessage {
            name: name.to_string(),
            email,
            message: message.to_string(),
        }),
        _ => Err(errors),
    }
}

/// Contact form controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactForm;

impl ContactForm {
    /// Mounts the form needs to be usable.
    pub const REQUIRED_MOUNTS: [MountPoint; 1] = [MountPoint::ContactForm];

    /// Attach to `page`, or `None` if the form is not mounted.
    #[must_use]
    pub fn attach(page: &Page) -> Option<Self> {
        page.has_all(&Self::REQUIRED_MOUNTS).then_some(Self)
    }

    /// Handle a submission: clear old errors, validate, then either show
    /// the new errors inline or reset the form.
    ///
    /// # Errors
    ///
    /// Returns the field errors when the submission is blocked.
    pub fn submit(
        self,
        submission: &ContactSubmission,
        page: &mut Page,
    ) -> Result<ContactMessage, Vec<FieldError>> {
        Self::clear_errors(page);

        match validate(submission) {
            Ok(message) => {
                Self::reset(page);
                tracing::info!(email = %message.email, "Contact message accepted");
                Ok(message)
            }
            Err(errors) => {
                for error in &errors {
                    page.with(error.field.input(), |input| input.set_class("error", true));
                    page.with(error.field.error_slot(), |slot| {
                        slot.text = error.message.to_string();
                    });
                }
                tracing::debug!(errors = errors.len(), "Contact submission blocked");
                Err(errors)
            }
        }
    }

    fn clear_errors(page: &mut Page) {
        for field in ContactField::ALL {
            page.with(field.input(), |input| input.set_class("error", false));
            page.with(field.error_slot(), |slot| slot.text.clear());
        }
    }

    fn reset(page: &mut Page) {
        for field in ContactField::ALL {
            page.with(field.input(), |input| input.set_attribute("value", ""));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let accepted = validate(&submission(" Ana ", "ana@example.com", " Hello ")).unwrap();
        assert_eq!(accepted.name, "Ana");
        assert_eq!(accepted.email.as_str(), "ana@example.com");
        assert_eq!(accepted.message, "Hello");
    }

    #[test]
    fn test_long_address_is_accepted() {
        let email = format!("{}@jardin.example", "r".repeat(250));
        let accepted = validate(&submission("Ana", &email, "Hello")).unwrap();
        assert_eq!(accepted.email.as_str(), email);
    }

    #[test]
    fn test_all_fields_invalid() {
        let errors = validate(&submission("", "a@b", "")).unwrap_err();
        let fields: Vec<ContactField> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            [ContactField::Name, ContactField::Email, ContactField::Message]
        );
        assert_eq!(errors[1].message, "Please enter a valid email");
    }

    #[test]
    fn test_blank_email_message() {
        let errors = validate(&submission("Ana", "   ", "Hi")).unwrap_err();
        assert_eq!(
            errors,
            [FieldError {
                field: ContactField::Email,
                message: "Please enter your email",
            }]
        );
    }

    #[test]
    fn test_submit_shows_inline_errors_then_clears() {
        let mut page = Page::standard();
        let form = ContactForm::attach(&page).unwrap();

        assert!(form.submit(&submission("", "a@b", ""), &mut page).is_err());
        assert!(page.get(MountPoint::ContactName).unwrap().has_class("error"));
        assert_eq!(
            page.get(MountPoint::EmailError).unwrap().text,
            "Please enter a valid email"
        );
        assert_eq!(
            page.get(MountPoint::MessageError).unwrap().text,
            "Please enter your message"
        );

        assert!(
            form.submit(&submission("Ana", "ana@example.com", "Hi"), &mut page)
                .is_ok()
        );
        assert!(!page.get(MountPoint::ContactName).unwrap().has_class("error"));
        assert_eq!(page.get(MountPoint::EmailError).unwrap().text, "");
        assert_eq!(
            page.get(MountPoint::ContactEmail).unwrap().attribute("value"),
            Some("")
        );
    }

    #[test]
    fn test_attach_requires_form() {
        assert!(ContactForm::attach(&Page::without(&[MountPoint::ContactForm])).is_none());
    }
}
