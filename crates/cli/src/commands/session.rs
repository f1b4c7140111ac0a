//! Scripted storefront session.
//!
//! Reads one JSON [`Event`] per line from stdin and dispatches it against a
//! storefront backed by the storage file. The virtual clock follows wall
//! time, ticking every `--tick-ms`, so toasts and deferred focus behave as
//! they would on the page. Each time the visible state changes a JSON
//! snapshot line is written to stdout.
//!
//! Once stdin closes the session keeps ticking until every timer has fired.
//!
//! # Usage
//!
//! ```bash
//! printf '%s\n' \
//!   '{"type":"product_card","activation":"pointer","attributes":{"id":"rose-1","name":"Velvet Rose","category":"Bouquets","price":"25","image":"rose.jpg","description":"Red"}}' \
//!   '{"type":"click","control":"add_to_cart"}' \
//!   | jardin session
//! ```

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};

use jardin_storefront::cart::{CartProjection, PanelState};
use jardin_storefront::overlay::OverlayState;
use jardin_storefront::toast::Toast;
use jardin_storefront::{Event, FileStore, Storefront, StorefrontConfig};

use super::{CommandError, open_storefront};

/// Visible state written after each change.
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    now_ms: u64,
    cart: CartProjection,
    panel: Option<PanelState>,
    overlay: Option<&'a OverlayState>,
    toasts: &'a [Toast],
    scroll_locked: bool,
    focused: Option<&'static str>,
}

/// Run a session until stdin closes and all timers have fired.
pub async fn run(config: StorefrontConfig, tick_ms: u64) -> Result<(), CommandError> {
    let mut storefront = open_storefront(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let started = Instant::now();
    let mut last = String::new();
    emit_snapshot(&storefront, &mut last)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                catch_up(&mut storefront, started);
                match serde_json::from_str::<Event>(line) {
                    Ok(event) => {
                        if let Err(e) = storefront.dispatch(event) {
                            tracing::error!(error = %e, "Event failed");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed event");
                        continue;
                    }
                }
                emit_snapshot(&storefront, &mut last)?;
            }
            _ = ticker.tick() => {
                catch_up(&mut storefront, started);
                emit_snapshot(&storefront, &mut last)?;
            }
        }
    }

    tracing::debug!(pending = storefront.pending_timers(), "Input closed, draining timers");
    while storefront.pending_timers() > 0 {
        ticker.tick().await;
        catch_up(&mut storefront, started);
        emit_snapshot(&storefront, &mut last)?;
    }

    tracing::info!(
        items = storefront.cart().len(),
        total = %storefront.cart().total(),
        "Session finished"
    );
    Ok(())
}

fn catch_up(storefront: &mut Storefront<FileStore>, started: Instant) {
    if let Some(by) = started.elapsed().checked_sub(storefront.now()) {
        storefront.advance(by);
    }
}

fn emit_snapshot(storefront: &Storefront<FileStore>, last: &mut String) -> Result<(), CommandError> {
    let page = storefront.page();
    let snapshot = Snapshot {
        now_ms: u64::try_from(storefront.now().as_millis()).unwrap_or(u64::MAX),
        cart: storefront.projection(),
        panel: storefront.panel_state(),
        overlay: storefront.overlay_state(),
        toasts: storefront.toasts(),
        scroll_locked: page.scroll_locked,
        focused: page.focused.map(|mount| mount.dom_id()),
    };

    // Compare without the clock so idle ticks stay quiet.
    let line = serde_json::to_string(&snapshot)?;
    let state = serde_json::to_string(&Snapshot {
        now_ms: 0,
        ..snapshot
    })?;
    if state == *last {
        return Ok(());
    }
    *last = state;

    writeln!(std::io::stdout().lock(), "{line}")?;
    Ok(())
}
