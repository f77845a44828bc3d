//! Getter methods for `HarvestConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::HarvestConfig;

impl HarvestConfig {
    #[must_use]
    pub fn catalog_url(&self) -> &str {
        &self.catalog_url
    }

    #[must_use]
    pub fn producers(&self) -> &[String] {
        &self.producers
    }

    #[must_use]
    pub fn flavours(&self) -> &[String] {
        &self.flavours
    }

    #[must_use]
    pub fn max_price(&self) -> u32 {
        self.max_price
    }

    #[must_use]
    pub fn freshness_window_months(&self) -> u32 {
        self.freshness_window_months
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    #[must_use]
    pub fn exclusion_patterns(&self) -> &[String] {
        &self.exclusion_patterns
    }

    #[must_use]
    pub fn run_timeout_secs(&self) -> u64 {
        self.run_timeout_secs
    }

    #[must_use]
    pub fn loader_poll_interval(&self) -> Duration {
        Duration::from_millis(self.loader_poll_interval_ms)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
