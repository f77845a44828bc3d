pub mod browser_setup;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod error;
pub mod utils;

pub use browser_setup::{
    BrowserSession, ProfileDir, download_managed_browser, find_browser_executable,
};
pub use catalog::{HarvestReport, PageScan, StopReason, harvest};
pub use config::HarvestConfig;
pub use dom::chromium::ChromiumDocument;
pub use dom::{Document, Node};
pub use error::{HarvestError, HarvestResult};
pub use utils::with_deadline;

use tracing::info;

/// Launch Chromium, run the harvest pipeline once and shut the browser down.
///
/// The whole pipeline runs under `config.run_timeout_secs()`. On expiry or any
/// automation failure the output file is left untouched.
pub async fn run(config: &HarvestConfig) -> HarvestResult<HarvestReport> {
    let today = chrono::Local::now().date_naive();
    info!("Starting harvest for {} (today: {})", config.catalog_url(), today);

    let session = BrowserSession::launch(config.headless(), config.chrome_data_dir().cloned())
        .await
        .map_err(|e| HarvestError::Browser(format!("{e:#}")))?;

    let outcome: HarvestResult<HarvestReport> = async {
        let page = session.new_page().await?;
        let doc = ChromiumDocument::new(page);
        with_deadline(
            harvest(&doc, config, today),
            config.run_timeout_secs(),
            "Catalog harvest",
        )
        .await
    }
    .await;

    if let Err(e) = session.shutdown().await {
        tracing::warn!("Browser shutdown failed: {e:#}");
    }
    outcome
}
