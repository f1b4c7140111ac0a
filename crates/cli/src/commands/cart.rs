//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! jardin cart show
//! jardin cart show --json
//! jardin cart add --id rose-1 --name "Velvet Rose" --price 25 --category Bouquets
//! jardin cart remove rose-1
//! ```
//!
//! # Environment Variables
//!
//! - `JARDIN_STORAGE_PATH` - JSON file holding the persisted cart
//! - `JARDIN_CART_STORAGE_KEY` - Key of the cart inside that file

use std::io::Write;

use clap::Args;

use jardin_core::{Product, ProductAttributes, ProductId};
use jardin_storefront::{AppError, StorefrontConfig};

use super::{CommandError, open_storefront};

/// Product fields for `cart add`.
#[derive(Debug, Args)]
pub struct ProductArgs {
    /// Product id
    #[arg(long)]
    pub id: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Whole-dollar price
    #[arg(long)]
    pub price: String,

    /// Category label
    #[arg(long, default_value = "")]
    pub category: String,

    /// Image URL
    #[arg(long, default_value = "")]
    pub image: String,

    /// Description text
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<ProductArgs> for ProductAttributes {
    fn from(args: ProductArgs) -> Self {
        Self {
            id: Some(args.id),
            name: Some(args.name),
            category: Some(args.category),
            price: Some(args.price),
            image: Some(args.image),
            description: Some(args.description),
        }
    }
}

/// Print the persisted cart.
pub fn show(config: StorefrontConfig, json: bool) -> Result<(), CommandError> {
    let storefront = open_storefront(config)?;
    let projection = storefront.projection();
    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &projection)?;
        writeln!(out)?;
        return Ok(());
    }

    if projection.empty {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    for row in &projection.rows {
        writeln!(out, "{:<16} {:<32} {}", row.id, row.name, row.price_line)?;
    }
    writeln!(
        out,
        "Total: {} ({} items)",
        projection.total,
        storefront.cart().count()
    )?;
    Ok(())
}

/// Add one unit of a product.
pub fn add(config: StorefrontConfig, args: ProductArgs) -> Result<(), CommandError> {
    let product = Product::parse(&args.into()).map_err(AppError::from)?;
    let mut storefront = open_storefront(config)?;

    storefront.add_to_cart(product)?;
    let projection = storefront.projection();
    writeln!(
        std::io::stdout().lock(),
        "Cart total: {} ({} items)",
        projection.total,
        storefront.cart().count()
    )?;
    Ok(())
}

/// Remove a product line. Removing an absent id succeeds without changes.
pub fn remove(config: StorefrontConfig, id: &str) -> Result<(), CommandError> {
    let mut storefront = open_storefront(config)?;
    let id = ProductId::new(id);

    if storefront.cart().get(&id).is_none() {
        tracing::info!(product_id = %id, "Product not in cart");
    }
    storefront.remove_from_cart(&id)?;
    writeln!(
        std::io::stdout().lock(),
        "Cart total: {} ({} items)",
        storefront.projection().total,
        storefront.cart().count()
    )?;
    Ok(())
}
