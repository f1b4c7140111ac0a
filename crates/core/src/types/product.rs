//! Product descriptor parsed from page markup.
//!
//! Product cards expose their attributes as `data-product-*` attributes.
//! [`ProductAttributes`] carries the raw strings; [`Product`] is the strict,
//! validated shape that the overlay and cart work with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Errors that can occur when parsing a [`Product`] from card attributes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    /// A required attribute is absent.
    #[error("product card is missing the `{0}` attribute")]
    MissingField(&'static str),
    /// The product id attribute is present but blank.
    #[error("product id cannot be empty")]
    EmptyId,
    /// The price attribute is not a non-negative integer.
    #[error("invalid product price {value:?}")]
    InvalidPrice {
        /// The raw attribute value.
        value: String,
    },
}

/// Raw product attributes as read from a product card.
///
/// Field names follow the card's data attributes with the `data-product-`
/// prefix removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributes {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl ProductAttributes {
    /// Collect attributes from an element's `data-*` map.
    ///
    /// Keys are expected in their markup form, e.g. `data-product-price`.
    /// Unrelated attributes are ignored.
    #[must_use]
    pub fn from_data_attributes(attrs: &BTreeMap<String, String>) -> Self {
        let get = |field: &str| attrs.get(&format!("data-product-{field}")).cloned();
        Self {
            id: get("id"),
            name: get("name"),
            category: get("category"),
            price: get("price"),
            image: get("image"),
            description: get("description"),
        }
    }
}

/// A product that can be shown in the overlay and added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub image: String,
    pub description: String,
}

impl Product {
    /// Parse a product from raw card attributes.
    ///
    /// Every attribute is required. The price must be an integer amount;
    /// anything else is reported instead of being carried as a non-number.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::MissingField`] for an absent attribute,
    /// [`ProductError::EmptyId`] for a blank id and
    /// [`ProductError::InvalidPrice`] for a price that is not a
    /// non-negative integer.
    pub fn parse(attrs: &ProductAttributes) -> Result<Self, ProductError> {
        fn required(value: Option<&String>, field: &'static str) -> Result<String, ProductError> {
            value.cloned().ok_or(ProductError::MissingField(field))
        }

        let id = required(attrs.id.as_ref(), "id")?;
        if id.trim().is_empty() {
            return Err(ProductError::EmptyId);
        }

        let raw_price = required(attrs.price.as_ref(), "price")?;
        let price = raw_price
            .parse::<Price>()
            .map_err(|_| ProductError::InvalidPrice { value: raw_price })?;

        Ok(Self {
            id: ProductId::new(id),
            name: required(attrs.name.as_ref(), "name")?,
            category: required(attrs.category.as_ref(), "category")?,
            price,
            image: required(attrs.image.as_ref(), "image")?,
            description: required(attrs.description.as_ref(), "description")?,
        })
    }
}

impl TryFrom<&ProductAttributes> for Product {
    type Error = ProductError;

    fn try_from(attrs: &ProductAttributes) -> Result<Self, Self::Error> {
        Self::parse(attrs)
    }
}
