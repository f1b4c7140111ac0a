//! Core types for JardinFleur.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart::{Cart, CartError, CartLineItem};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Product, ProductAttributes, ProductError};
pub use status::*;
