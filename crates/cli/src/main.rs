//! `JardinFleur` CLI - Cart management and scripted storefront sessions.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! jardin cart show
//!
//! # Add a product
//! jardin cart add --id rose-1 --name "Velvet Rose" --price 25
//!
//! # Remove a product line
//! jardin cart remove rose-1
//!
//! # Validate and send a contact message
//! jardin contact -n "Ana" -e ana@example.com -m "Do you deliver on Sundays?"
//!
//! # Drive a session from newline-delimited JSON events
//! jardin session < events.ndjson
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and edit the persisted cart
//! - `contact` - Submit the contact form
//! - `session` - Replay input events against a live storefront

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "jardin")]
#[command(author, version, about = "JardinFleur storefront tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Submit the contact form
    Contact {
        /// Sender name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Sender email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Message body
        #[arg(short, long, default_value = "")]
        message: String,
    },
    /// Read JSON events from stdin, one per line, and print the page state
    /// after each
    Session {
        /// Wall-clock interval between timer ticks, in milliseconds
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and totals
    Show {
        /// Print the cart projection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add(commands::cart::ProductArgs),
    /// Remove a product line
    Remove {
        /// Product id
        id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jardin_storefront=info,jardin_cli=info".into());

    // Logs go to stderr so stdout stays machine-readable
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = commands::load_config()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(config, json)?,
            CartAction::Add(product) => commands::cart::add(config, product)?,
            CartAction::Remove { id } => commands::cart::remove(config, &id)?,
        },
        Commands::Contact {
            name,
            email,
            message,
        } => commands::contact::submit(config, name, email, message)?,
        Commands::Session { tick_ms } => commands::session::run(config, tick_ms).await?,
    }
    Ok(())
}
