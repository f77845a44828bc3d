//! Catalog harvest pipeline
//!
//! Opens the catalog, applies the filters, pages through the listing and
//! writes the hrefs of available, freshly roasted products.
//!
//! Stages run strictly in order against one shared page. Only the per-entry
//! checks inside a page scan run concurrently.

pub mod filters;
pub mod freshness;
pub mod loader;
pub mod navigator;
pub mod paginator;
pub mod scanner;
pub mod types;
pub mod writer;

pub use freshness::{Freshness, FreshnessError};
pub use paginator::{Pagination, Paginator, PaginatorState};
pub use types::{HarvestReport, PageScan, StopReason};
pub use writer::ResultWriter;

use chrono::NaiveDate;
use tracing::info;

use crate::config::HarvestConfig;
use crate::dom::Document;
use crate::error::HarvestResult;

/// Run the pipeline against `doc` and write the output file
///
/// `today` anchors the freshness window. Any automation failure aborts the
/// run before the output file is touched.
pub async fn harvest<D: Document>(
    doc: &D,
    config: &HarvestConfig,
    today: NaiveDate,
) -> HarvestResult<HarvestReport> {
    // Compile exclusions before touching the page so a bad pattern fails fast
    let writer = ResultWriter::new(config.exclusion_patterns())?;

    navigator::open_catalog(doc, config.catalog_url()).await?;
    filters::apply_filters(doc, config).await?;
    loader::wait_for_loader(doc, config.loader_poll_interval()).await?;

    let mut paginator = Paginator::new(
        doc,
        today,
        config.freshness_window_months(),
        config.loader_poll_interval(),
    );
    let (pagination, stop_reason) = paginator.run().await?;

    let rendered = writer.write(config.output_path(), &pagination.hrefs)?;

    let report = HarvestReport {
        pages_visited: pagination.pages.len(),
        products_seen: pagination.products_seen(),
        collected: pagination.hrefs.len(),
        excluded: rendered.excluded,
        written: rendered.lines.len(),
        output_path: config.output_path().to_path_buf(),
        stop_reason,
    };
    info!(
        "Harvest complete: {} pages, {} products, {} hrefs written",
        report.pages_visited, report.products_seen, report.written
    );
    Ok(report)
}
