//! The storefront session: components wired to one page and one cart.
//!
//! [`Storefront`] owns the cart store, the page model, every UI component
//! that found its mounts, and the virtual clock driving deferred work.
//! The cart renderer is subscribed to the store at construction, so every
//! cart mutation is reflected on the page before the mutating call returns.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::instrument;

use jardin_core::{Cart, Product, ProductAttributes, ProductId, ToastId, ToastKind};

use crate::cart::{CartPanel, CartProjection, CartRenderer, CartStore, PanelState};
use crate::config::StorefrontConfig;
use crate::contact::{ContactForm, ContactMessage, ContactSubmission, FieldError};
use crate::dom::Page;
use crate::error::Result;
use crate::events::{Activation, Control, Event, Key};
use crate::overlay::{OverlayState, ProductOverlay};
use crate::scheduler::Scheduler;
use crate::storage::KeyValueStore;
use crate::toast::{Toast, ToastEmitter, ToastTask};

const UNAVAILABLE_PRODUCT: &str = "Sorry, this product is unavailable right now.";
const CONTACT_SENT: &str = "Thank you! Your message has been sent.";

/// Deferred storefront work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Move focus into the product overlay.
    FocusOverlay,
    /// A toast lifecycle step.
    Toast(ToastTask),
}

impl From<ToastTask> for Task {
    fn from(task: ToastTask) -> Self {
        Self::Toast(task)
    }
}

/// A storefront page session.
pub struct Storefront<S: KeyValueStore> {
    config: StorefrontConfig,
    page: Rc<RefCell<Page>>,
    cart: CartStore<S>,
    panel: Option<CartPanel>,
    overlay: Option<ProductOverlay>,
    toasts: Option<ToastEmitter>,
    contact: Option<ContactForm>,
    scheduler: Scheduler<Task>,
}

impl<S: KeyValueStore> std::fmt::Debug for Storefront<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("cart", self.cart.cart())
            .field("panel", &self.panel)
            .field("overlay", &self.overlay)
            .field("toasts", &self.toasts)
            .field("now", &self.scheduler.now())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> Storefront<S> {
    /// Start a session on `page`.
    ///
    /// The cart is loaded from `storage` and rendered immediately.
    /// Components whose mounts are missing are left disabled.
    pub fn new(config: StorefrontConfig, storage: S, page: Page) -> Self {
        let panel = attach("cart panel", CartPanel::attach(&page));
        let overlay = attach("product overlay", ProductOverlay::attach(&page));
        let toasts = attach("toasts", ToastEmitter::attach(&page, config.toast));
        let contact = attach("contact form", ContactForm::attach(&page));

        let page = Rc::new(RefCell::new(page));
        let mut cart = CartStore::load(storage, config.cart_storage_key.clone());

        let renderer = CartRenderer::new(config.badge_cap);
        let target = Rc::clone(&page);
        cart.subscribe(move |cart| {
            if let Err(e) = renderer.render(cart, &mut target.borrow_mut()) {
                tracing::error!(error = %e, "Failed to render cart");
            }
        });
        cart.notify();

        Self {
            config,
            page,
            cart,
            panel,
            overlay,
            toasts,
            contact,
            scheduler: Scheduler::new(),
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// The page model.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a cart listener while it holds the page.
    #[must_use]
    pub fn page(&self) -> Ref<'_, Page> {
        self.page.borrow()
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.cart.cart()
    }

    /// The cart store, for its storage and subscriptions.
    pub const fn cart_store(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// The cart as currently projected onto the page.
    #[must_use]
    pub fn projection(&self) -> CartProjection {
        CartProjection::project(self.cart.cart(), self.config.badge_cap)
    }

    /// Cart panel state, or `None` if the panel is not mounted.
    #[must_use]
    pub fn panel_state(&self) -> Option<PanelState> {
        self.panel.as_ref().map(CartPanel::state)
    }

    /// Overlay state, or `None` if the overlay is not mounted.
    #[must_use]
    pub fn overlay_state(&self) -> Option<&OverlayState> {
        self.overlay.as_ref().map(ProductOverlay::state)
    }

    /// Live toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        self.toasts
            .as_ref()
            .map_or(&[] as &[Toast], ToastEmitter::toasts)
    }

    /// Virtual time elapsed in this session.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Timers still queued.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Handle one input event.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted or a template
    /// failed to render. The page still reflects the attempted change.
    #[instrument(skip_all, fields(event = event.name()))]
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::ProductCard {
                activation,
                attributes,
            } => self.activate_card(&activation, &attributes),
            Event::Click { control } => self.click(control),
            Event::KeyDown { key } => {
                if key == Key::Escape {
                    self.close_overlay();
                    self.close_panel();
                }
                Ok(())
            }
            Event::SubmitContact { submission } => self.submit_contact(&submission).map(|_| ()),
        }
    }

    /// Advance the virtual clock, running every task that falls due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now().saturating_add(by);
        while let Some((timer, task)) = self.scheduler.pop_due(until) {
            tracing::debug!(timer = %timer, ?task, "Timer fired");
            self.run(task);
        }
    }

    /// Add `product` to the cart directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn add_to_cart(&mut self, product: Product) -> Result<()> {
        let name = product.name.clone();
        let persisted = self.cart.add(product);
        let toasted = self.toast(ToastKind::Success, format!("{name} added to cart!"));
        persisted?;
        toasted?;
        Ok(())
    }

    /// Remove the line for `id`. Removing an absent id only re-renders.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<()> {
        let name = self.cart.cart().get(id).map(|line| line.product.name.clone());
        let removed = self.cart.remove(id);
        let toasted = name.map_or(Ok(None), |name| {
            self.toast(ToastKind::Info, format!("{name} removed from cart"))
        });
        removed?;
        toasted?;
        Ok(())
    }

    /// Submit the contact form.
    ///
    /// Returns the field errors when the submission is blocked, or `Ok(None)`
    /// when the page has no contact form.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation toast failed to render.
    pub fn submit_contact(
        &mut self,
        submission: &ContactSubmission,
    ) -> Result<Option<std::result::Result<ContactMessage, Vec<FieldError>>>> {
        let Some(form) = self.contact else {
            tracing::debug!("Contact form not mounted");
            return Ok(None);
        };

        let outcome = form.submit(submission, &mut self.page.borrow_mut());
        if outcome.is_ok() {
            self.toast(ToastKind::Success, CONTACT_SENT)?;
        }
        Ok(Some(outcome))
    }

    fn activate_card(&mut self, activation: &Activation, attributes: &ProductAttributes) -> Result<()> {
        if !activation.activates() {
            return Ok(());
        }
        if self.overlay.is_none() {
            tracing::debug!("Product overlay not mounted");
            return Ok(());
        }

        match Product::parse(attributes) {
            Ok(product) => {
                self.open_overlay(product);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, product_id = ?attributes.id, "Unusable product card");
                self.toast(ToastKind::Error, UNAVAILABLE_PRODUCT)?;
                Ok(())
            }
        }
    }

    fn click(&mut self, control: Control) -> Result<()> {
        match control {
            Control::CartIcon => {
                self.toggle_panel();
                Ok(())
            }
            Control::CartClose | Control::CartBackdrop | Control::CartShopLink => {
                self.close_panel();
                Ok(())
            }
            Control::ModalClose | Control::ModalCloseFooter | Control::ModalBackdrop => {
                self.close_overlay();
                Ok(())
            }
            Control::AddToCart => self.add_selected(),
            Control::RemoveItem(id) => self.remove_from_cart(&id),
            Control::ToastClose(id) => {
                self.dismiss_toast(id);
                Ok(())
            }
        }
    }

    fn add_selected(&mut self) -> Result<()> {
        let Some(product) = self
            .overlay
            .as_ref()
            .and_then(ProductOverlay::selected)
            .cloned()
        else {
            tracing::debug!("Add to cart with no product selected");
            return Ok(());
        };

        let result = self.add_to_cart(product);
        self.close_overlay();
        result
    }

    fn open_overlay(&mut self, product: Product) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let mut page = self.page.borrow_mut();
        if let Some(panel) = self.panel.as_mut() {
            panel.close(&mut page);
        }
        overlay.open(product, &mut page);
        drop(page);

        self.scheduler
            .schedule(self.config.focus_delay, Task::FocusOverlay);
        self.sync_scroll_lock();
    }

    fn close_overlay(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.close(&mut self.page.borrow_mut());
        }
        self.sync_scroll_lock();
    }

    fn toggle_panel(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let mut page = self.page.borrow_mut();
        if !panel.is_open() {
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.close(&mut page);
            }
        }
        panel.toggle(&mut page);
        drop(page);
        self.sync_scroll_lock();
    }

    fn close_panel(&mut self) {
        if let Some(panel) = self.panel.as_mut() {
            panel.close(&mut self.page.borrow_mut());
        }
        self.sync_scroll_lock();
    }

    fn sync_scroll_lock(&self) {
        let locked = self.panel.as_ref().is_some_and(CartPanel::is_open)
            || self.overlay.as_ref().is_some_and(ProductOverlay::is_open);
        self.page.borrow_mut().scroll_locked = locked;
    }

    fn toast(&mut self, kind: ToastKind, message: impl Into<String>) -> Result<Option<ToastId>> {
        let Some(toasts) = self.toasts.as_mut() else {
            return Ok(None);
        };
        let id = toasts.emit(
            kind,
            message,
            &mut self.page.borrow_mut(),
            &mut self.scheduler,
        )?;
        Ok(Some(id))
    }

    fn dismiss_toast(&mut self, id: ToastId) {
        if let Some(toasts) = self.toasts.as_mut() {
            toasts.dismiss(id, &mut self.page.borrow_mut(), &mut self.scheduler);
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::FocusOverlay => {
                if let Some(overlay) = self.overlay.as_ref() {
                    overlay.focus_close_control(&mut self.page.borrow_mut());
                }
            }
            Task::Toast(task) => {
                if let Some(toasts) = self.toasts.as_mut() {
                    toasts.run(task, &mut self.page.borrow_mut(), &mut self.scheduler);
                }
            }
        }
    }
}

fn attach<T>(component: &'static str, attached: Option<T>) -> Option<T> {
    if attached.is_none() {
        tracing::debug!(component, "Mount points missing, component disabled");
    }
    attached
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jardin_core::ProductAttributes;

    use super::*;
    use crate::dom::MountPoint;
    use crate::error::AppError;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError};

    /// Store whose writes always fail.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io {
                path: key.into(),
                source: std::io::Error::other("quota exceeded"),
            })
        }
    }

    fn rose_card() -> ProductAttributes {
        ProductAttributes {
            id: Some("rose-1".to_string()),
            name: Some("Velvet Rose".to_string()),
            category: Some("Bouquets".to_string()),
            price: Some("25".to_string()),
            image: Some("images/rose.jpg".to_string()),
            description: Some("A dozen deep red roses.".to_string()),
        }
    }

    fn storefront(page: Page) -> Storefront<MemoryStore> {
        Storefront::new(StorefrontConfig::default(), MemoryStore::new(), page)
    }

    fn open_card(store: &mut Storefront<MemoryStore>) {
        store
            .dispatch(Event::ProductCard {
                activation: Activation::Pointer,
                attributes: rose_card(),
            })
            .unwrap();
    }

    #[test]
    fn test_open_card_then_add() {
        let mut store = storefront(Page::standard());
        open_card(&mut store);
        assert!(store.page().scroll_locked);

        store.advance(Duration::from_millis(100));
        assert_eq!(store.page().focused, Some(MountPoint::ModalClose));

        store
            .dispatch(Event::Click {
                control: Control::AddToCart,
            })
            .unwrap();
        assert_eq!(store.cart().count(), 1);
        assert_eq!(store.overlay_state(), Some(&OverlayState::Closed));
        assert!(!store.page().scroll_locked);
        assert_eq!(store.toasts()[0].message, "Velvet Rose added to cart!");
        assert_eq!(
            store.page().get(MountPoint::CartBadge).unwrap().text,
            "1"
        );
    }

    #[test]
    fn test_add_without_selection_is_noop() {
        let mut store = storefront(Page::standard());
        store
            .dispatch(Event::Click {
                control: Control::AddToCart,
            })
            .unwrap();
        assert!(store.cart().is_empty());
        assert!(store.toasts().is_empty());
    }

    #[test]
    fn test_bad_card_shows_error_toast() {
        let mut store = storefront(Page::standard());
        let mut attributes = rose_card();
        attributes.price = Some("free".to_string());
        store
            .dispatch(Event::ProductCard {
                activation: Activation::Key(Key::Enter),
                attributes,
            })
            .unwrap();

        assert_eq!(store.overlay_state(), Some(&OverlayState::Closed));
        assert_eq!(store.toasts()[0].kind, ToastKind::Error);
        assert_eq!(store.toasts()[0].message, UNAVAILABLE_PRODUCT);
    }

    #[test]
    fn test_other_keys_do_not_open_card() {
        let mut store = storefront(Page::standard());
        store
            .dispatch(Event::ProductCard {
                activation: Activation::Key(Key::from("a")),
                attributes: rose_card(),
            })
            .unwrap();
        assert_eq!(store.overlay_state(), Some(&OverlayState::Closed));
    }

    #[test]
    fn test_panel_and_overlay_exclusive() {
        let mut store = storefront(Page::standard());
        store
            .dispatch(Event::Click {
                control: Control::CartIcon,
            })
            .unwrap();
        assert_eq!(store.panel_state(), Some(PanelState::Open));

        open_card(&mut store);
        assert_eq!(store.panel_state(), Some(PanelState::Closed));
        assert!(store.page().scroll_locked);

        store
            .dispatch(Event::Click {
                control: Control::CartIcon,
            })
            .unwrap();
        assert_eq!(store.overlay_state(), Some(&OverlayState::Closed));
        assert_eq!(store.panel_state(), Some(PanelState::Open));
        assert!(store.page().scroll_locked);
    }

    #[test]
    fn test_escape_closes_everything() {
        let mut store = storefront(Page::standard());
        open_card(&mut store);
        store
            .dispatch(Event::KeyDown { key: Key::Escape })
            .unwrap();
        assert_eq!(store.overlay_state(), Some(&OverlayState::Closed));
        assert!(!store.page().scroll_locked);

        store.advance(Duration::from_millis(100));
        assert_eq!(store.page().focused, None);
    }

    #[test]
    fn test_remove_shows_info_toast() {
        let mut store = storefront(Page::standard());
        store
            .add_to_cart(Product::parse(&rose_card()).unwrap())
            .unwrap();
        store
            .dispatch(Event::Click {
                control: Control::RemoveItem(ProductId::new("rose-1")),
            })
            .unwrap();

        assert!(store.cart().is_empty());
        let last = store.toasts().last().unwrap();
        assert_eq!(last.kind, ToastKind::Info);
        assert_eq!(last.message, "Velvet Rose removed from cart");

        store
            .dispatch(Event::Click {
                control: Control::RemoveItem(ProductId::new("rose-1")),
            })
            .unwrap();
        assert_eq!(store.toasts().len(), 2);
    }

    #[test]
    fn test_missing_mounts_disable_components() {
        let mut store = storefront(Page::without(&[
            MountPoint::CartDrawer,
            MountPoint::ProductModal,
            MountPoint::ToastContainer,
        ]));
        assert_eq!(store.panel_state(), None);
        assert_eq!(store.overlay_state(), None);

        open_card(&mut store);
        store
            .dispatch(Event::Click {
                control: Control::CartIcon,
            })
            .unwrap();
        assert!(!store.page().scroll_locked);

        store
            .add_to_cart(Product::parse(&rose_card()).unwrap())
            .unwrap();
        assert!(store.toasts().is_empty());
        assert_eq!(
            store.page().get(MountPoint::CartBadge).unwrap().text,
            "1"
        );
    }

    #[test]
    fn test_contact_success_toast() {
        let mut store = storefront(Page::standard());
        let outcome = store
            .submit_contact(&ContactSubmission {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                message: "Hello".to_string(),
            })
            .unwrap()
            .unwrap();
        assert!(outcome.is_ok());
        assert_eq!(store.toasts()[0].message, CONTACT_SENT);
    }

    #[test]
    fn test_toast_lifecycle_through_clock() {
        let mut store = storefront(Page::standard());
        store
            .add_to_cart(Product::parse(&rose_card()).unwrap())
            .unwrap();
        store.advance(Duration::ZERO);
        assert_eq!(store.toasts().len(), 1);

        store.advance(Duration::from_millis(3000));
        assert_eq!(store.toasts().len(), 1);
        store.advance(Duration::from_millis(300));
        assert!(store.toasts().is_empty());
        assert_eq!(store.now(), Duration::from_millis(3300));
    }

    #[test]
    fn test_advance_saturates_clock() {
        let mut store = storefront(Page::standard());
        store
            .add_to_cart(Product::parse(&rose_card()).unwrap())
            .unwrap();
        store.advance(Duration::from_millis(1));
        store.advance(Duration::MAX);
        assert_eq!(store.now(), Duration::MAX);
        assert!(store.toasts().is_empty());
        assert_eq!(store.pending_timers(), 0);
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let mut store = Storefront::new(StorefrontConfig::default(), FailingStore, Page::standard());
        let result = store.add_to_cart(Product::parse(&rose_card()).unwrap());
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(store.cart().count(), 1);
        assert_eq!(store.toasts()[0].message, "Velvet Rose added to cart!");
        assert_eq!(
            store.page().get(MountPoint::CartBadge).unwrap().text,
            "1"
        );

        let result = store.remove_from_cart(&ProductId::new("rose-1"));
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(store.cart().is_empty());
        assert_eq!(store.toasts().last().unwrap().message, "Velvet Rose removed from cart");
    }
}
