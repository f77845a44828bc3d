//! Listing filter controls
//!
//! Filters are applied in a fixed order: producers, sort by ascending price,
//! the "more filters" panel, the price bound, flavour notes. Each step changes
//! the remote filter state, and none of them is idempotent: running the
//! sequence twice toggles the multi-select options back off.

use tracing::{debug, info, warn};

use super::types::{
    FILTER_PANEL_SELECTOR, FLAVOUR_FILTER_TEXT, MAX_PRICE_INPUT_SELECTOR,
    MORE_FILTERS_CONTAINER_SELECTOR, MORE_FILTERS_TEXT, OPTION_INPUT_SELECTOR,
    OPTION_LABEL_SELECTOR, OPTION_SELECTOR, PRICE_CONTROL_TEXT, PRODUCER_FILTER_SELECTOR,
    SORT_PRICE_ASC_TEXT, SORTING_FILTER_SELECTOR,
};
use crate::config::HarvestConfig;
use crate::dom::{Document, Node};
use crate::error::HarvestResult;

/// Toggle every enabled option of a multi-select whose text is in `wanted`
///
/// Opens the dropdown, then walks its visible option entries in order.
/// Options not in `wanted`, or whose checkbox is disabled, are left alone.
/// Allowlist values missing from the dropdown are not an error.
///
/// # Returns
/// Texts of the options that were clicked, in dropdown order
pub async fn select_from_multi_select<N: Node>(
    dropdown: &N,
    wanted: &[String],
) -> HarvestResult<Vec<String>> {
    dropdown.click().await?;

    let options = dropdown.query_all(OPTION_SELECTOR).await?;
    let mut selected = Vec::new();

    for option in options {
        if !option.is_visible().await? {
            continue;
        }

        let text = option.text_content().await?.unwrap_or_default();
        let text = text.trim();
        if !wanted.iter().any(|w| w == text) {
            continue;
        }

        let disabled = match option.query(OPTION_INPUT_SELECTOR).await? {
            Some(input) => input.attribute("disabled").await?.is_some(),
            None => false,
        };
        if disabled {
            debug!("Skipping disabled option '{}'", text);
            continue;
        }

        option.locate(OPTION_LABEL_SELECTOR).await?.click().await?;
        selected.push(text.to_string());
    }

    Ok(selected)
}

/// Select the allowlisted producers
pub async fn filter_by_producers<D: Document>(
    doc: &D,
    producers: &[String],
) -> HarvestResult<Vec<String>> {
    let dropdown = doc.locate(PRODUCER_FILTER_SELECTOR).await?;
    let selected = select_from_multi_select(&dropdown, producers).await?;
    info!("Selected {} producers", selected.len());
    Ok(selected)
}

/// Sort the listing by ascending price
pub async fn sort_by_price<D: Document>(doc: &D) -> HarvestResult<()> {
    let dropdown = doc.locate(SORTING_FILTER_SELECTOR).await?;
    dropdown.click().await?;
    dropdown.locate_text(SORT_PRICE_ASC_TEXT).await?.click().await?;
    info!("Sorted listing by ascending price");
    Ok(())
}

/// Expand the additional filter panel
pub async fn open_more_filters<D: Document>(doc: &D) -> HarvestResult<()> {
    doc.locate_text(MORE_FILTERS_TEXT).await?.click().await
}

/// Set the upper price bound
///
/// The price control is found by its text, which also matches the minimum
/// rating control ("Ocena min."). The first match in document order is
/// clicked, so this relies on the price control preceding the rating
/// control. When nothing matches the click is skipped and the bound is still
/// typed.
///
/// # Returns
/// Trimmed text of the control that was clicked, if any
pub async fn set_max_price<D: Document>(doc: &D, max_price: u32) -> HarvestResult<Option<String>> {
    let panel = doc.locate(MORE_FILTERS_CONTAINER_SELECTOR).await?;
    let candidates = panel.query_text(PRICE_CONTROL_TEXT).await?;
    if candidates.len() > 1 {
        debug!(
            "'{}' matched {} controls, using the first",
            PRICE_CONTROL_TEXT,
            candidates.len()
        );
    }

    let clicked = match candidates.first() {
        Some(control) => {
            control.click().await?;
            control.text_content().await?.map(|t| t.trim().to_string())
        }
        None => {
            warn!("No '{}' control in the filter panel", PRICE_CONTROL_TEXT);
            None
        }
    };

    doc.locate(MAX_PRICE_INPUT_SELECTOR)
        .await?
        .fill(&max_price.to_string())
        .await?;
    info!("Set max price to {}", max_price);
    Ok(clicked)
}

/// Select the allowlisted flavour notes
pub async fn set_flavours<D: Document>(
    doc: &D,
    flavours: &[String],
) -> HarvestResult<Vec<String>> {
    let panel = doc.locate(FILTER_PANEL_SELECTOR).await?;
    let dropdown = panel.locate_text(FLAVOUR_FILTER_TEXT).await?;
    let selected = select_from_multi_select(&dropdown, flavours).await?;
    info!("Selected {} flavour notes", selected.len());
    Ok(selected)
}

/// Apply the full filter sequence
pub async fn apply_filters<D: Document>(doc: &D, config: &HarvestConfig) -> HarvestResult<()> {
    filter_by_producers(doc, config.producers()).await?;
    sort_by_price(doc).await?;
    open_more_filters(doc).await?;
    set_max_price(doc, config.max_price()).await?;
    set_flavours(doc, config.flavours()).await?;
    Ok(())
}
