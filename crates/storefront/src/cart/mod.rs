//! Cart state, its page projection and the cart panel.
//!
//! - [`store`] - Persistent cart store with change subscriptions
//! - [`render`] - Pure projection of cart state and the row renderer
//! - [`panel`] - Slide-in cart panel controller

pub mod panel;
pub mod render;
pub mod store;

pub use panel::{CartPanel, PanelState};
pub use render::{BadgeView, CartProjection, CartRenderer, CartRowView};
pub use store::{CartListener, CartStore, SubscriptionId};
