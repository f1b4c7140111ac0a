//! Integration tests for `JardinFleur`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jardin-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart mutations, persistence and projection
//! - `page_flow` - Panel, overlay, toasts and contact form driven by events
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use jardin_core::{Product, ProductAttributes, ProductId};
use jardin_storefront::{
    Activation, Control, Event, FileStore, MemoryStore, Page, Storefront, StorefrontConfig,
};

/// Card attributes for a complete product.
#[must_use]
pub fn card(id: &str, name: &str, price: &str) -> ProductAttributes {
    ProductAttributes {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        category: Some("Bouquets".to_string()),
        price: Some(price.to_string()),
        image: Some(format!("images/{id}.jpg")),
        description: Some(format!("{name}, freshly cut.")),
    }
}

/// The product described by [`card`].
///
/// # Panics
///
/// Panics if the attributes do not form a valid product.
#[must_use]
pub fn product(id: &str, name: &str, price: &str) -> Product {
    Product::parse(&card(id, name, price)).expect("fixture product should parse")
}

/// Pointer activation of a product card.
#[must_use]
pub fn open_card(attributes: ProductAttributes) -> Event {
    Event::ProductCard {
        activation: Activation::Pointer,
        attributes,
    }
}

/// Click on a control.
#[must_use]
pub const fn click(control: Control) -> Event {
    Event::Click { control }
}

/// Click on the remove button of a cart row.
#[must_use]
pub fn remove(id: &str) -> Event {
    click(Control::RemoveItem(ProductId::new(id)))
}

/// Parse an event from its JSON form.
///
/// # Panics
///
/// Panics on malformed JSON.
#[must_use]
pub fn event(json: &str) -> Event {
    serde_json::from_str(json).expect("fixture event should parse")
}

/// A storefront on the standard page with in-memory storage.
#[must_use]
pub fn memory_storefront() -> Storefront<MemoryStore> {
    Storefront::new(StorefrontConfig::default(), MemoryStore::new(), Page::standard())
}

/// A storefront on the standard page persisting to `path`.
///
/// # Panics
///
/// Panics if the storage file exists but cannot be read.
#[must_use]
pub fn file_storefront(path: &Path) -> Storefront<FileStore> {
    let store = FileStore::open(path).expect("storage file should open");
    Storefront::new(StorefrontConfig::default(), store, Page::standard())
}
