//! JardinFleur Core - Shared types library.
//!
//! This crate provides the domain types used across the JardinFleur components:
//! - `storefront` - Headless storefront interaction layer (cart, overlay, toasts)
//! - `cli` - Command-line driver for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage
//! access, no page wiring. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, products and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
