//! Per-page listing scan
//!
//! Reads every product entry on the current page, keeps the ones that can be
//! ordered, then keeps the available ones with a fresh roast date. Checks on
//! individual entries are read-only and independent, so each step fans out
//! over all entries and joins before the next step starts. Output order always
//! follows listing order.

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, info};

use super::freshness;
use super::types::{NOT_AVAILABLE_SELECTOR, PRODUCT_LINK_SELECTOR, PRODUCT_SELECTOR, PageScan};
use crate::dom::{Document, Node};
use crate::error::HarvestResult;

/// An entry is available unless its "not available" marker is visible
pub async fn is_available<N: Node>(product: &N) -> HarvestResult<bool> {
    match product.query(NOT_AVAILABLE_SELECTOR).await? {
        Some(marker) => Ok(!marker.is_visible().await?),
        None => Ok(true),
    }
}

/// Keep the available entries, preserving order
pub async fn filter_available<N: Node>(products: &[N]) -> HarvestResult<Vec<&N>> {
    let checks = join_all(products.iter().map(is_available)).await;

    let mut available = Vec::with_capacity(products.len());
    for (product, check) in products.iter().zip(checks) {
        if check? {
            available.push(product);
        }
    }
    Ok(available)
}

/// Keep the entries with a fresh roast date, preserving order
pub async fn filter_fresh<'a, N: Node>(
    products: &[&'a N],
    today: NaiveDate,
    window_months: u32,
) -> Vec<&'a N> {
    let checks = join_all(
        products
            .iter()
            .map(|product| freshness::assess(*product, today, window_months)),
    )
    .await;

    products
        .iter()
        .zip(checks)
        .filter(|(_, freshness)| freshness.is_fresh())
        .map(|(product, _)| *product)
        .collect()
}

/// Detail href of an entry; `None` when the link or its `href` is absent
pub async fn product_href<N: Node>(product: &N) -> HarvestResult<Option<String>> {
    match product.query(PRODUCT_LINK_SELECTOR).await? {
        Some(link) => link.attribute("href").await,
        None => Ok(None),
    }
}

/// Scan the listing currently shown in `doc`
///
/// Freshness is only ever evaluated for entries that passed the
/// availability check.
pub async fn scan_page<D: Document>(
    doc: &D,
    page_number: usize,
    today: NaiveDate,
    window_months: u32,
) -> HarvestResult<PageScan> {
    let products = doc.query_all(PRODUCT_SELECTOR).await?;
    let available = filter_available(&products).await?;
    let fresh = filter_fresh(&available, today, window_months).await;

    let fresh_hrefs = join_all(fresh.iter().map(|product| product_href(*product)))
        .await
        .into_iter()
        .collect::<HarvestResult<Vec<_>>>()?;

    let scan = PageScan {
        page_number,
        total: products.len(),
        available: available.len(),
        fresh_hrefs,
    };

    info!(
        "Page {}: {} products, {} available, {} fresh",
        scan.page_number,
        scan.total,
        scan.available,
        scan.fresh_hrefs.len()
    );
    debug!("Page {} hrefs: {:?}", scan.page_number, scan.fresh_hrefs);
    Ok(scan)
}
