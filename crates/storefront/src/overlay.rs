//! Product selection overlay.
//!
//! Shows the details of one product card and holds that product until the
//! overlay closes. Adding to the cart is driven by the storefront, which
//! reads [`ProductOverlay::selected`] and then closes the overlay.

use serde::Serialize;

use jardin_core::Product;

use crate::dom::{MountPoint, Page};

/// State of the product overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "product", rename_all = "snake_case")]
pub enum OverlayState {
    #[default]
    Closed,
    Open(Product),
}

/// Controller for the product detail overlay.
#[derive(Debug, Clone, Default)]
pub struct ProductOverlay {
    state: OverlayState,
}

impl ProductOverlay {
    /// Mounts the overlay needs to be usable.
    pub const REQUIRED_MOUNTS: [MountPoint; 1] = [MountPoint::ProductModal];

    /// Attach to `page`, or `None` if the overlay is not mounted.
    #[must_use]
    pub fn attach(page: &Page) -> Option<Self> {
        page.has_all(&Self::REQUIRED_MOUNTS).then(Self::default)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &OverlayState {
        &self.state
    }

    /// Whether the overlay is showing a product.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open(_))
    }

    /// The product currently shown, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&Product> {
        match &self.state {
            OverlayState::Open(product) => Some(product),
            OverlayState::Closed => None,
        }
    }

    /// Show `product`, replacing any current selection.
    pub fn open(&mut self, product: Product, page: &mut Page) {
        page.with(MountPoint::ModalTitle, |title| title.text.clone_from(&product.name));
        page.with(MountPoint::ModalImage, |image| {
            image.set_attribute("src", product.image.clone());
            image.set_attribute("alt", product.name.clone());
        });
        page.with(MountPoint::ModalPrice, |price| price.text = product.price.to_string());
        page.with(MountPoint::ModalDescription, |description| {
            description.text.clone_from(&product.description);
        });

        tracing::debug!(product_id = %product.id, "Product overlay opened");
        self.state = OverlayState::Open(product);
        self.project(page);
    }

    /// Hide the overlay and clear the selection.
    pub fn close(&mut self, page: &mut Page) {
        self.state = OverlayState::Closed;
        self.project(page);
    }

    /// Move focus to the primary dismiss control if still open.
    ///
    /// Runs deferred after [`open`](Self::open); if the overlay was closed
    /// in the meantime nothing happens.
    pub fn focus_close_control(&self, page: &mut Page) {
        if self.is_open() {
            page.focus(MountPoint::ModalClose);
        }
    }

    fn project(&self, page: &mut Page) {
        let open = self.is_open();
        page.with(MountPoint::ProductModal, |modal| modal.set_class("active", open));
        page.with(MountPoint::ModalBackdrop, |backdrop| {
            backdrop.set_class("active", open);
            backdrop.set_attribute("aria-hidden", if open { "false" } else { "true" });
        });
        if !open && page.focused == Some(MountPoint::ModalClose) {
            page.focused = None;
        }
    }
}
