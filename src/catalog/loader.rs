//! Listing busy indicator gate
//!
//! Every filter change and page turn makes the listing reload behind a busy
//! indicator. Product entries must not be read until it has gone.

use std::time::{Duration, Instant};
use tracing::debug;

use super::types::LOADER_SELECTOR;
use crate::dom::Document;
use crate::error::HarvestResult;

/// Wait until the busy indicator is no longer in the document
///
/// Polls with `poll_interval` and has no deadline of its own; the run-level
/// deadline bounds it.
pub async fn wait_for_loader<D: Document>(doc: &D, poll_interval: Duration) -> HarvestResult<()> {
    let start = Instant::now();
    let mut polls = 0usize;

    while doc.query(LOADER_SELECTOR).await?.is_some() {
        polls += 1;
        tokio::time::sleep(poll_interval).await;
    }

    debug!(
        "Listing loader detached after {:?} ({} polls)",
        start.elapsed(),
        polls
    );
    Ok(())
}
