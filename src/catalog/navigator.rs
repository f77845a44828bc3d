//! Catalog navigation and overlay handling

use tracing::info;

use super::types::{COOKIE_ACCEPT_SELECTOR, POPUP_SUPPRESSION_CSS};
use crate::dom::{Document, Node};
use crate::error::HarvestResult;

/// Open the catalog, hide the marketing popup and accept cookies
///
/// The popup is suppressed with a style rule rather than dismissed, so it
/// stays hidden if the site re-renders it later in the session.
pub async fn open_catalog<D: Document>(doc: &D, url: &str) -> HarvestResult<()> {
    info!("Navigating to catalog: {}", url);
    doc.goto(url).await?;

    doc.add_style(POPUP_SUPPRESSION_CSS).await?;

    confirm_cookies(doc).await?;
    info!("Cookie consent accepted");
    Ok(())
}

async fn confirm_cookies<D: Document>(doc: &D) -> HarvestResult<()> {
    doc.locate(COOKIE_ACCEPT_SELECTOR).await?.click().await
}
