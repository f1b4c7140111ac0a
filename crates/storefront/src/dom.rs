//! Headless page model.
//!
//! The storefront renders into named mount points rather than a live DOM.
//! Each [`MountPoint`] corresponds to an element id (or class hook) in the
//! page markup. A mount that is absent from the [`Page`] disables the
//! component that needs it, mirroring how the page script skips
//! initialization when an element is missing.
//!
//! Components own their state; whatever they write here is a projection
//! of that state and is never read back as a source of truth.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Named hook in the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MountPoint {
    // Notifications
    ToastContainer,

    // Cart panel
    CartIcon,
    CartBadge,
    CartDrawer,
    CartBackdrop,
    CartItems,
    CartEmpty,
    CartFooter,
    CartTotal,

    // Product overlay
    ProductModal,
    ModalBackdrop,
    ModalClose,
    ModalTitle,
    ModalImage,
    ModalPrice,
    ModalDescription,

    // Contact form
    ContactForm,
    ContactName,
    ContactEmail,
    ContactMessage,
    NameError,
    EmailError,
    MessageError,
}

impl MountPoint {
    /// Every mount point, in declaration order.
    pub const ALL: [Self; 23] = [
        Self::ToastContainer,
        Self::CartIcon,
        Self::CartBadge,
        Self::CartDrawer,
        Self::CartBackdrop,
        Self::CartItems,
        Self::CartEmpty,
        Self::CartFooter,
        Self::CartTotal,
        Self::ProductModal,
        Self::ModalBackdrop,
        Self::ModalClose,
        Self::ModalTitle,
        Self::ModalImage,
        Self::ModalPrice,
        Self::ModalDescription,
        Self::ContactForm,
        Self::ContactName,
        Self::ContactEmail,
        Self::ContactMessage,
        Self::NameError,
        Self::EmailError,
        Self::MessageError,
    ];

    /// Element id (or class, for the badge) used in the page markup.
    #[must_use]
    pub const fn dom_id(&self) -> &'static str {
        match self {
            Self::ToastContainer => "toast-container",
            Self::CartIcon => "cart-icon",
            Self::CartBadge => "cart-badge",
            Self::CartDrawer => "cart-drawer",
            Self::CartBackdrop => "cart-backdrop",
            Self::CartItems => "cart-items",
            Self::CartEmpty => "cart-empty",
            Self::CartFooter => "cart-footer",
            Self::CartTotal => "cart-total",
            Self::ProductModal => "product-modal",
            Self::ModalBackdrop => "modal-backdrop",
            Self::ModalClose => "modal-close",
            Self::ModalTitle => "modal-title",
            Self::ModalImage => "modal-image",
            Self::ModalPrice => "modal-price",
            Self::ModalDescription => "modal-description",
            Self::ContactForm => "contact-form",
            Self::ContactName => "contact-name",
            Self::ContactEmail => "contact-email",
            Self::ContactMessage => "contact-message",
            Self::NameError => "name-error",
            Self::EmailError => "email-error",
            Self::MessageError => "message-error",
        }
    }
}

/// A keyed child fragment rendered into an element, such as a cart row or
/// a toast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub key: String,
    pub classes: BTreeSet<String>,
    pub html: String,
}

impl Fragment {
    /// Create a fragment with the given key, classes and inner markup.
    #[must_use]
    pub fn new<'a>(
        key: impl Into<String>,
        classes: impl IntoIterator<Item = &'a str>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            classes: classes.into_iter().map(str::to_string).collect(),
            html: html.into(),
        }
    }

    /// Whether the fragment carries a class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// State of one mounted element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub text: String,
    pub hidden: bool,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Fragment>,
}

impl Element {
    /// Whether the element carries a class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Add or remove a class.
    pub fn set_class(&mut self, class: &str, on: bool) {
        if on {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    /// Set an attribute value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Read an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Find a child fragment by key.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Fragment> {
        self.children.iter().find(|c| c.key == key)
    }

    /// Find a child fragment by key, mutably.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Fragment> {
        self.children.iter_mut().find(|c| c.key == key)
    }

    /// Remove a child fragment by key. Removing a missing key is a no-op.
    pub fn remove_child(&mut self, key: &str) -> Option<Fragment> {
        let index = self.children.iter().position(|c| c.key == key)?;
        Some(self.children.remove(index))
    }
}

/// The mounted page: present mount points plus page-level state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    mounts: BTreeMap<MountPoint, Element>,
    /// Body scroll is suppressed while a modal surface is open.
    pub scroll_locked: bool,
    /// Mount point holding input focus, if any.
    pub focused: Option<MountPoint>,
}

impl Page {
    /// A page with every mount point present.
    #[must_use]
    pub fn standard() -> Self {
        Self::without(&[])
    }

    /// A page with every mount point except the listed ones.
    #[must_use]
    pub fn without(missing: &[MountPoint]) -> Self {
        let mounts = MountPoint::ALL
            .iter()
            .filter(|m| !missing.contains(m))
            .map(|m| (*m, Element::default()))
            .collect();
        Self {
            mounts,
            scroll_locked: false,
            focused: None,
        }
    }

    /// Whether a mount point is present.
    #[must_use]
    pub fn has(&self, mount: MountPoint) -> bool {
        self.mounts.contains_key(&mount)
    }

    /// Whether all of the given mount points are present.
    #[must_use]
    pub fn has_all(&self, mounts: &[MountPoint]) -> bool {
        mounts.iter().all(|m| self.has(*m))
    }

    /// Borrow a mounted element.
    #[must_use]
    pub fn get(&self, mount: MountPoint) -> Option<&Element> {
        self.mounts.get(&mount)
    }

    /// Mutably borrow a mounted element.
    pub fn get_mut(&mut self, mount: MountPoint) -> Option<&mut Element> {
        self.mounts.get_mut(&mount)
    }

    /// Run `f` against a mounted element; absent mounts are skipped.
    pub fn with(&mut self, mount: MountPoint, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.mounts.get_mut(&mount) {
            f(element);
        }
    }

    /// Move focus to a mount point if it is present.
    pub fn focus(&mut self, mount: MountPoint) {
        if self.has(mount) {
            self.focused = Some(mount);
        }
    }
}
