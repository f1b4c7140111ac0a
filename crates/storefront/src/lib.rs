//! `JardinFleur` storefront interaction layer.
//!
//! A headless model of the storefront page: a persistent cart with live
//! page projection, the cart panel, the product overlay, toast
//! notifications and the contact form. Input arrives as [`Event`]s and
//! deferred work runs on a virtual clock, so a whole session can be driven
//! and inspected without a browser.
//!
//! # Modules
//!
//! - [`cart`] - Cart store, projection renderer and cart panel
//! - [`overlay`] - Product detail overlay
//! - [`toast`] - Transient notifications
//! - [`contact`] - Contact form validation
//! - [`state`] - The [`Storefront`] session tying them together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod contact;
pub mod dom;
pub mod error;
pub mod events;
pub mod filters;
pub mod overlay;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod toast;

pub use config::{ConfigError, StorefrontConfig, ToastConfig};
pub use dom::{MountPoint, Page};
pub use error::{AppError, Result};
pub use events::{Activation, Control, Event, Key};
pub use state::{Storefront, Task};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
