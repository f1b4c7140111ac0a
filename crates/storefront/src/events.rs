//! User input events dispatched into the storefront.
//!
//! Events are serde-tagged so a host can feed them as JSON, one per line:
//!
//! ```json
//! {"type":"product_card","activation":"pointer","attributes":{"id":"rose-1","price":"25"}}
//! {"type":"click","control":"add_to_cart"}
//! {"type":"click","control":{"remove_item":"rose-1"}}
//! {"type":"key_down","key":"Escape"}
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use jardin_core::{ProductAttributes, ProductId, ToastId};

use crate::contact::ContactSubmission;

/// A keyboard key, named as in `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        match key.as_str() {
            "Enter" => Self::Enter,
            " " | "Space" | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other(key),
        }
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self::from(key.to_string())
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        match key {
            Key::Enter => "Enter".to_string(),
            Key::Space => " ".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Other(other) => other,
        }
    }
}

/// How a product card was activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Pointer,
    Key(Key),
}

impl Activation {
    /// Pointer clicks, `Enter` and `Space` all open the card.
    #[must_use]
    pub const fn activates(&self) -> bool {
        matches!(self, Self::Pointer | Self::Key(Key::Enter | Key::Space))
    }
}

/// A clickable control on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    CartIcon,
    CartClose,
    CartBackdrop,
    CartShopLink,
    ModalClose,
    ModalCloseFooter,
    ModalBackdrop,
    AddToCart,
    RemoveItem(ProductId),
    ToastClose(ToastId),
}

/// One input event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A product card was clicked or received a key press.
    ProductCard {
        activation: Activation,
        attributes: ProductAttributes,
    },
    /// A control was clicked.
    Click { control: Control },
    /// A key was pressed with no more specific target.
    KeyDown { key: Key },
    /// The contact form was submitted.
    SubmitContact { submission: ContactSubmission },
}

impl Event {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProductCard { .. } => "product_card",
            Self::Click { .. } => "click",
            Self::KeyDown { .. } => "key_down",
            Self::SubmitContact { .. } => "submit_contact",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
