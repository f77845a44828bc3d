//! Core configuration types for a harvest run
//!
//! `HarvestConfig` carries every value the pipeline reads. Its defaults are
//! the retailer constants from `catalog::types`; a plain run never overrides
//! them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::types::{
    CATALOG_URL, EXCLUDED_HREF_PATTERNS, FLAVOURS, FRESHNESS_WINDOW_MONTHS, MAX_PRICE,
    OUTPUT_PATH, PRODUCERS,
};
use crate::utils::constants::{DEFAULT_LOADER_POLL_MS, DEFAULT_RUN_TIMEOUT_SECS};

/// Main configuration struct for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub(crate) catalog_url: String,
    pub(crate) producers: Vec<String>,
    pub(crate) flavours: Vec<String>,

    /// Value typed into the upper price bound input
    pub(crate) max_price: u32,

    /// Roast dates strictly before `today - freshness_window_months` are stale
    pub(crate) freshness_window_months: u32,

    pub(crate) output_path: PathBuf,

    /// Regex patterns; an href matching any of them is not written
    pub(crate) exclusion_patterns: Vec<String>,

    /// Deadline for the whole run, navigation through the final page scan.
    /// On expiry the run fails and nothing is written.
    ///
    /// Default: 300 seconds
    pub(crate) run_timeout_secs: u64,

    /// Sleep between checks for the listing busy indicator
    ///
    /// Default: 100 milliseconds
    pub(crate) loader_poll_interval_ms: u64,

    pub(crate) headless: bool,

    /// Chrome user data directory. When `None` a per-process directory under
    /// the system temp dir is used and removed on shutdown.
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            catalog_url: CATALOG_URL.to_string(),
            producers: PRODUCERS.iter().map(|s| (*s).to_string()).collect(),
            flavours: FLAVOURS.iter().map(|s| (*s).to_string()).collect(),
            max_price: MAX_PRICE,
            freshness_window_months: FRESHNESS_WINDOW_MONTHS,
            output_path: PathBuf::from(OUTPUT_PATH),
            exclusion_patterns: EXCLUDED_HREF_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            run_timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
            loader_poll_interval_ms: DEFAULT_LOADER_POLL_MS,
            headless: true,
            chrome_data_dir: None,
        }
    }
}
