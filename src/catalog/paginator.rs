//! Pagination state machine
//!
//! ```text
//! OnPage(n) --scan--> Done(UnavailableSeen)    page listed an unavailable entry
//!           --------> Done(NoNextPage)         next control missing or disabled
//!           --------> Advancing(n)
//! Advancing(n) --click next, wait for loader--> OnPage(n + 1)
//! ```
//!
//! There is no page limit. Stopping on the first page with an unavailable
//! entry relies on the price sort: once out-of-stock entries show up, later
//! pages hold nothing worth scanning.

use chrono::NaiveDate;
use std::time::Duration;
use tracing::info;

use super::loader::wait_for_loader;
use super::scanner::scan_page;
use super::types::{NEXT_PAGE_SELECTOR, PageScan, StopReason};
use crate::dom::{Document, Node};
use crate::error::HarvestResult;

/// Paginator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// Page `n` (1-indexed) is loaded and about to be scanned
    OnPage(usize),
    /// Leaving page `n` for the next one
    Advancing(usize),
    /// Terminal
    Done(StopReason),
}

/// Everything the paginator collected
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    /// Fresh hrefs from every visited page, in visitation order
    pub hrefs: Vec<Option<String>>,
    /// One entry per visited page
    pub pages: Vec<PageScan>,
}

impl Pagination {
    #[must_use]
    pub fn products_seen(&self) -> usize {
        self.pages.iter().map(|p| p.total).sum()
    }
}

/// Whether the next-page control exists and accepts clicks
pub async fn next_page_enabled<D: Document>(doc: &D) -> HarvestResult<bool> {
    let Some(next) = doc.query(NEXT_PAGE_SELECTOR).await? else {
        return Ok(false);
    };

    if next.attribute("disabled").await?.is_some() {
        return Ok(false);
    }

    let aria_disabled = next.attribute("aria-disabled").await?;
    Ok(aria_disabled.as_deref() != Some("true"))
}

/// Walks the listing pages and collects fresh hrefs
pub struct Paginator<'a, D: Document> {
    doc: &'a D,
    today: NaiveDate,
    window_months: u32,
    poll_interval: Duration,
    state: PaginatorState,
}

impl<'a, D: Document> Paginator<'a, D> {
    /// Start on page 1; the listing must already be loaded
    pub fn new(doc: &'a D, today: NaiveDate, window_months: u32, poll_interval: Duration) -> Self {
        Self {
            doc,
            today,
            window_months,
            poll_interval,
            state: PaginatorState::OnPage(1),
        }
    }

    #[must_use]
    pub fn state(&self) -> PaginatorState {
        self.state
    }

    /// Drive the state machine to `Done`
    ///
    /// The paginator stays in its terminal state afterwards; running it again
    /// returns an empty `Pagination` with the same stop reason.
    pub async fn run(&mut self) -> HarvestResult<(Pagination, StopReason)> {
        let mut pagination = Pagination::default();

        loop {
            let next = match self.state {
                PaginatorState::OnPage(page) => {
                    let scan =
                        scan_page(self.doc, page, self.today, self.window_months).await?;
                    pagination.hrefs.extend(scan.fresh_hrefs.iter().cloned());
                    let unavailable_seen = scan.has_unavailable();
                    pagination.pages.push(scan);

                    if unavailable_seen {
                        PaginatorState::Done(StopReason::UnavailableSeen)
                    } else if !next_page_enabled(self.doc).await? {
                        PaginatorState::Done(StopReason::NoNextPage)
                    } else {
                        PaginatorState::Advancing(page)
                    }
                }
                PaginatorState::Advancing(page) => {
                    self.doc.locate(NEXT_PAGE_SELECTOR).await?.click().await?;
                    wait_for_loader(self.doc, self.poll_interval).await?;
                    PaginatorState::OnPage(page + 1)
                }
                PaginatorState::Done(reason) => {
                    info!(
                        "Pagination finished after {} pages: {:?}",
                        pagination.pages.len(),
                        reason
                    );
                    return Ok((pagination, reason));
                }
            };
            self.state = next;
        }
    }
}
