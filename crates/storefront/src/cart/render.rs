//! Cart projection renderer.
//!
//! [`CartProjection::project`] is a pure function from cart state to what
//! the page should show. [`CartRenderer`] writes a projection into the page,
//! rebuilding the item rows from scratch on every call.

use askama::Template;
use serde::Serialize;

use jardin_core::Cart;

use crate::dom::{Fragment, MountPoint, Page};
use crate::filters;

/// Badge state derived from the item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum BadgeView {
    Hidden,
    Shown(String),
}

impl BadgeView {
    /// Badge for `count` items, capped at `"<cap>+"`.
    #[must_use]
    pub fn for_count(count: u64, cap: u64) -> Self {
        match count {
            0 => Self::Hidden,
            n if n > cap => Self::Shown(format!("{cap}+")),
            n => Self::Shown(n.to_string()),
        }
    }

    /// Text shown on the badge, if visible.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Shown(text) => Some(text),
        }
    }
}

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartRowView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: u64,
    pub quantity: u32,
    /// `"$<price> × <quantity>"`
    pub price_line: String,
}

/// Everything the cart surfaces display for one cart state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartProjection {
    pub badge: BadgeView,
    pub rows: Vec<CartRowView>,
    pub empty: bool,
    /// `"$<total>"`
    pub total: String,
}

impl CartProjection {
    /// Project a cart.
    #[must_use]
    pub fn project(cart: &Cart, badge_cap: u64) -> Self {
        let rows = cart
            .items()
            .iter()
            .map(|item| CartRowView {
                id: item.id().to_string(),
                name: item.product.name.clone(),
                image: item.product.image.clone(),
                price: item.product.price.amount(),
                quantity: item.quantity,
                price_line: format!("{} × {}", item.product.price, item.quantity),
            })
            .collect();

        Self {
            badge: BadgeView::for_count(cart.count(), badge_cap),
            rows,
            empty: cart.is_empty(),
            total: cart.total().to_string(),
        }
    }
}

/// Cart row fragment template.
#[derive(Template)]
#[template(path = "partials/cart_item.html")]
struct CartItemTemplate<'a> {
    row: &'a CartRowView,
}

/// Writes cart projections into the page.
#[derive(Debug, Clone, Copy)]
pub struct CartRenderer {
    badge_cap: u64,
}

impl CartRenderer {
    /// Create a renderer with the given badge cap.
    #[must_use]
    pub const fn new(badge_cap: u64) -> Self {
        Self { badge_cap }
    }

    /// Project `cart` and write it into `page`.
    ///
    /// # Errors
    ///
    /// Returns an error if a row template fails to render; the page is left
    /// untouched in that case apart from the badge.
    pub fn render(&self, cart: &Cart, page: &mut Page) -> Result<CartProjection, askama::Error> {
        let projection = CartProjection::project(cart, self.badge_cap);
        Self::apply(&projection, page)?;
        Ok(projection)
    }

    /// Write an existing projection into `page`.
    ///
    /// The badge is updated whenever its mount exists. The panel body is
    /// skipped entirely without the item list mount.
    ///
    /// # Errors
    ///
    /// Returns an error if a row template fails to render.
    pub fn apply(projection: &CartProjection, page: &mut Page) -> Result<(), askama::Error> {
        page.with(MountPoint::CartBadge, |badge| match &projection.badge {
            BadgeView::Hidden => badge.set_class("visible", false),
            BadgeView::Shown(text) => {
                badge.text.clone_from(text);
                badge.set_class("visible", true);
            }
        });

        if !page.has(MountPoint::CartItems) {
            return Ok(());
        }

        let rows = projection
            .rows
            .iter()
            .map(|row| {
                let html = CartItemTemplate { row }.render()?;
                Ok(Fragment::new(row.id.clone(), ["cart-item"], html))
            })
            .collect::<Result<Vec<_>, askama::Error>>()?;

        page.with(MountPoint::CartItems, |list| list.children = rows);
        page.with(MountPoint::CartEmpty, |empty| {
            empty.hidden = !projection.empty;
        });
        page.with(MountPoint::CartFooter, |footer| {
            footer.hidden = projection.empty;
        });
        page.with(MountPoint::CartTotal, |total| {
            total.text.clone_from(&projection.total);
        });

        tracing::debug!(rows = projection.rows.len(), total = %projection.total, "Cart rendered");
        Ok(())
    }
}
