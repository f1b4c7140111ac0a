//! Cart line items and the pure cart algebra.
//!
//! [`Cart`] owns the ordered sequence of line items and enforces its
//! invariants: at most one line per product id, and every quantity at
//! least one. Persistence and change notification live in the storefront
//! crate; this type only knows how to mutate and summarize itself.

use serde::{Deserialize, Serialize, Serializer};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// Errors raised when building a cart from existing line items.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two line items share a product id.
    #[error("duplicate line item for product {0}")]
    DuplicateId(ProductId),
    /// A line item has a quantity of zero.
    #[error("line item for product {0} has zero quantity")]
    ZeroQuantity(ProductId),
}

/// One product entry in the cart with its quantity.
///
/// Serializes flat: the product fields sit next to `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// The product id this line is keyed by.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Ordered shopping cart.
///
/// Insertion order is preserved. Deserialization validates the invariants,
/// so a payload with duplicate ids or zero quantities is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from existing line items, checking the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::DuplicateId`] if two items share an id and
    /// [`CartError::ZeroQuantity`] if any quantity is zero.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartError> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartError::ZeroQuantity(item.id().clone()));
            }
            if items.iter().take(index).any(|prior| prior.id() == item.id()) {
                return Err(CartError::DuplicateId(item.id().clone()));
            }
        }
        Ok(Self { items })
    }

    /// Line items in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up the line for a product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// An existing line only has its quantity bumped; the stored name,
    /// price and other fields keep their first-seen values. Otherwise the
    /// product is appended with a quantity of one.
    #[allow(clippy::indexing_slicing)] // index comes from `position` or the push
    pub fn add(&mut self, product: Product) -> &CartLineItem {
        let index = match self.items.iter().position(|item| item.id() == &product.id) {
            Some(index) => index,
            None => {
                self.items.push(CartLineItem {
                    product,
                    quantity: 0,
                });
                self.items.len() - 1
            }
        };

        let line = &mut self.items[index];
        line.quantity = line.quantity.saturating_add(1);
        line
    }

    /// Remove the whole line for a product id.
    ///
    /// Returns the removed line, or `None` if the id was not in the cart.
    pub fn remove(&mut self, id: &ProductId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "Bouquets".to_string(),
            price: Price::new(price),
            image: format!("images/{id}.jpg"),
            description: String::new(),
        }
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.count(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_twice_keeps_first_seen_fields() {
        let mut cart = Cart::new();
        cart.add(product("rose-1", 25));

        let mut repriced = product("rose-1", 40);
        repriced.name = "Renamed Rose".to_string();
        let line = cart.add(repriced);

        assert_eq!(line.quantity, 2);
        assert_eq!(line.product.price, Price::new(25));
        assert_eq!(line.product.name, "Product rose-1");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Price::new(50));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(product("b", 1));
        cart.add(product("a", 1));
        cart.add(product("b", 1));
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("rose-1", 25));
        let before = cart.clone();
        assert!(cart.remove(&ProductId::new("nope")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let mut cart = Cart::new();
        cart.add(product("rose-1", 25));
        let json = serde_json::to_value(&cart).unwrap();
        let first = json.get(0).unwrap();
        assert_eq!(first.get("id").unwrap(), "rose-1");
        assert_eq!(first.get("price").unwrap(), 25);
        assert_eq!(first.get("quantity").unwrap(), 1);
    }

    #[test]
    fn test_deserialize_rejects_duplicates_and_zero_quantity() {
        let dup = r#"[
            {"id":"a","name":"A","category":"c","price":1,"image":"i","description":"d","quantity":1},
            {"id":"a","name":"A","category":"c","price":1,"image":"i","description":"d","quantity":2}
        ]"#;
        assert!(serde_json::from_str::<Cart>(dup).is_err());

        let zero = r#"[{"id":"a","name":"A","category":"c","price":1,"image":"i","description":"d","quantity":0}]"#;
        assert!(serde_json::from_str::<Cart>(zero).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u16),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, 0u16..500).prop_map(|(id, price)| Op::Add(id, price)),
            (0u8..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_ids_stay_unique_and_totals_match(ops in proptest::collection::vec(op(), 0..64)) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(id, price) => {
                        cart.add(product(&id.to_string(), u64::from(price)));
                    }
                    Op::Remove(id) => {
                        cart.remove(&ProductId::new(id.to_string()));
                    }
                }
            }

            let mut ids: Vec<&ProductId> = cart.items().iter().map(CartLineItem::id).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.len());
            prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));

            let expected_total: u64 = cart
                .items()
                .iter()
                .map(|item| item.product.price.amount() * u64::from(item.quantity))
                .sum();
            prop_assert_eq!(cart.total().amount(), expected_total);
        }

        #[test]
        fn prop_serde_roundtrip_preserves_order(ops in proptest::collection::vec(0u8..10, 0..32)) {
            let mut cart = Cart::new();
            for id in ops {
                cart.add(product(&id.to_string(), u64::from(id) * 3));
            }
            let json = serde_json::to_string(&cart).unwrap();
            let back: Cart = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, cart);
        }
    }
}
