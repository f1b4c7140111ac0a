//! Slide-in cart panel controller.

use serde::Serialize;

use crate::dom::{MountPoint, Page};

/// Open/closed state of the cart panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Controller for the cart drawer and its backdrop.
///
/// Body scroll locking is not handled here: the storefront derives it from
/// the state of every modal surface so the panel and the product overlay
/// can never leave it out of sync.
#[derive(Debug, Clone, Default)]
pub struct CartPanel {
    state: PanelState,
}

impl CartPanel {
    /// Mounts the panel needs to be usable.
    pub const REQUIRED_MOUNTS: [MountPoint; 1] = [MountPoint::CartDrawer];

    /// Attach to `page`, or `None` if the drawer is not mounted.
    #[must_use]
    pub fn attach(page: &Page) -> Option<Self> {
        page.has_all(&Self::REQUIRED_MOUNTS).then(Self::default)
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PanelState {
        self.state
    }

    /// Whether the panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Open the panel.
    pub fn open(&mut self, page: &mut Page) {
        self.state = PanelState::Open;
        self.project(page);
    }

    /// Close the panel. Closing a closed panel is harmless.
    pub fn close(&mut self, page: &mut Page) {
        self.state = PanelState::Closed;
        self.project(page);
    }

    /// Flip between open and closed.
    pub fn toggle(&mut self, page: &mut Page) {
        if self.is_open() {
            self.close(page);
        } else {
            self.open(page);
        }
    }

    fn project(&self, page: &mut Page) {
        let open = self.is_open();
        page.with(MountPoint::CartDrawer, |drawer| drawer.set_class("active", open));
        page.with(MountPoint::CartBackdrop, |backdrop| {
            backdrop.set_class("active", open);
            backdrop.set_attribute("aria-hidden", if open { "false" } else { "true" });
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_requires_drawer() {
        assert!(CartPanel::attach(&Page::standard()).is_some());
        assert!(CartPanel::attach(&Page::without(&[MountPoint::CartDrawer])).is_none());
    }

    #[test]
    fn test_toggle_projects_classes() {
        let mut page = Page::standard();
        let mut panel = CartPanel::attach(&page).unwrap();

        panel.toggle(&mut page);
        assert!(panel.is_open());
        assert!(page.get(MountPoint::CartDrawer).unwrap().has_class("active"));
        let backdrop = page.get(MountPoint::CartBackdrop).unwrap();
        assert!(backdrop.has_class("active"));
        assert_eq!(backdrop.attribute("aria-hidden"), Some("false"));

        panel.toggle(&mut page);
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(!page.get(MountPoint::CartDrawer).unwrap().has_class("active"));
        assert_eq!(
            page.get(MountPoint::CartBackdrop).unwrap().attribute("aria-hidden"),
            Some("true")
        );
    }

    #[test]
    fn test_close_when_closed_is_harmless() {
        let mut page = Page::standard();
        let mut panel = CartPanel::attach(&page).unwrap();
        panel.close(&mut page);
        panel.close(&mut page);
        assert!(!panel.is_open());
    }
}
