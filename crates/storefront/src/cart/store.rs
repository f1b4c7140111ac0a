//! Persistent cart store.
//!
//! Owns the canonical [`Cart`], hydrates it from a durable slot once, and
//! after every mutation writes the full cart back and notifies subscribers
//! synchronously. Subscribers replace the page script's global cart object:
//! anything that projects cart state registers a listener here.

use std::fmt;

use jardin_core::{Cart, CartLineItem, Price, Product, ProductId, define_id};

use crate::storage::{KeyValueStore, StorageError};

define_id!(SubscriptionId);

/// Callback invoked with the current cart after every change.
pub type CartListener = Box<dyn FnMut(&Cart)>;

/// Cart state bound to a durable storage slot.
pub struct CartStore<S> {
    storage: S,
    key: String,
    cart: Cart,
    listeners: Vec<(SubscriptionId, CartListener)>,
    next_subscription: SubscriptionId,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Hydrate the cart from `storage[key]`.
    ///
    /// Never fails: a missing slot, a storage read error, invalid JSON or a
    /// payload that breaks the cart invariants all yield an empty cart.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let cart = match storage.get(&key) {
            Ok(Some(raw)) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "Discarding malformed persisted cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not read persisted cart");
                Cart::new()
            }
        };

        tracing::debug!(key = %key, items = cart.len(), "Cart hydrated");

        Self {
            storage,
            key,
            cart,
            listeners: Vec::new(),
            next_subscription: SubscriptionId::new(1),
        }
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line items in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Storage slot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a listener for cart changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&Cart) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription = id.next();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Invoke every listener with the current cart.
    pub fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.cart);
        }
    }

    /// Add one unit of `product`, then persist and notify.
    ///
    /// An existing line only gains quantity; its stored fields are kept.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the cart could not be written. The
    /// in-memory cart is updated and listeners are notified regardless.
    pub fn add(&mut self, product: Product) -> Result<(), StorageError> {
        let line = self.cart.add(product);
        tracing::info!(product_id = %line.id(), quantity = line.quantity, "Added to cart");
        self.save()
    }

    /// Remove the line for `id`, then persist and notify.
    ///
    /// Removing an id that is not in the cart changes nothing, but still
    /// persists and notifies.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the cart could not be written. The
    /// in-memory cart is updated and listeners are notified regardless.
    pub fn remove(&mut self, id: &ProductId) -> Result<Option<CartLineItem>, StorageError> {
        let removed = self.cart.remove(id);
        if removed.is_some() {
            tracing::info!(product_id = %id, "Removed from cart");
        } else {
            tracing::debug!(product_id = %id, "Remove ignored, product not in cart");
        }
        self.save()?;
        Ok(removed)
    }

    /// Persist the whole cart, then notify.
    fn save(&mut self) -> Result<(), StorageError> {
        let persisted = serde_json::to_string(&self.cart)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&self.key, &json));

        if let Err(e) = &persisted {
            tracing::error!(key = %self.key, error = %e, "Failed to persist cart");
        }

        self.notify();
        persisted
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "jardinfleur-cart";

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Flower {id}"),
            category: "Bouquets".to_string(),
            price: Price::new(price),
            image: format!("images/{id}.jpg"),
            description: "Fresh".to_string(),
        }
    }

    /// Store whose writes always fail.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: key.into(),
                source: std::io::Error::other("quota exceeded"),
            })
        }
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let store = CartStore::load(MemoryStore::new(), KEY);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        for raw in ["{not json", "{\"id\":1}", "[{\"id\":\"a\"}]", "null"] {
            let store = CartStore::load(MemoryStore::with_entry(KEY, raw), KEY);
            assert!(store.cart().is_empty(), "payload {raw:?} should load empty");
        }
    }

    #[test]
    fn test_add_persists_full_cart() {
        let mut store = CartStore::load(MemoryStore::new(), KEY);
        store.add(product("rose-1", 25)).unwrap();
        store.add(product("lily-2", 10)).unwrap();

        let raw = store.storage().get(KEY).unwrap().unwrap();
        let persisted: Cart = serde_json::from_str(&raw).unwrap();
        assert_eq!(&persisted, store.cart());
    }

    #[test]
    fn test_reload_reproduces_cart() {
        let mut store = CartStore::load(MemoryStore::new(), KEY);
        store.add(product("rose-1", 25)).unwrap();
        store.add(product("lily-2", 10)).unwrap();
        store.add(product("rose-1", 25)).unwrap();

        let raw = store.storage().get(KEY).unwrap().unwrap();
        let reloaded = CartStore::load(MemoryStore::with_entry(KEY, raw), KEY);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.count(), 3);
    }

    #[test]
    fn test_listeners_see_every_mutation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = CartStore::load(MemoryStore::new(), KEY);
        let sink = Rc::clone(&seen);
        store.subscribe(move |cart| sink.borrow_mut().push(cart.count()));

        store.add(product("rose-1", 25)).unwrap();
        store.add(product("rose-1", 25)).unwrap();
        store.remove(&ProductId::new("missing")).unwrap();
        store.remove(&ProductId::new("rose-1")).unwrap();

        assert_eq!(*seen.borrow(), [1, 2, 2, 0]);
    }

    #[test]
    fn test_unsubscribe() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = CartStore::load(MemoryStore::new(), KEY);
        let counter = Rc::clone(&calls);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.notify();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.notify();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_failed_write_still_mutates_and_notifies() {
        let notified = Rc::new(RefCell::new(false));
        let mut store = CartStore::load(FailingStore, KEY);
        let flag = Rc::clone(&notified);
        store.subscribe(move |_| *flag.borrow_mut() = true);

        let result = store.add(product("rose-1", 25));
        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert_eq!(store.count(), 1);
        assert!(*notified.borrow());
    }
}
