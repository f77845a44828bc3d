//! Fluent builder for `HarvestConfig`
//!
//! Every field starts at its default, so `build()` on an untouched builder
//! yields `HarvestConfig::default()`. Validation happens once, in `build()`.

use regex::Regex;
use std::path::PathBuf;

use super::types::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};

#[derive(Debug, Clone, Default)]
pub struct HarvestConfigBuilder {
    pub(crate) config: HarvestConfig,
}

impl HarvestConfig {
    /// Create a builder for configuring a `HarvestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> HarvestConfigBuilder {
        HarvestConfigBuilder::default()
    }
}

impl HarvestConfigBuilder {
    #[must_use]
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.config.catalog_url = url.into();
        self
    }

    #[must_use]
    pub fn producers<I, S>(mut self, producers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.producers = producers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn flavours<I, S>(mut self, flavours: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.flavours = flavours.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn max_price(mut self, max_price: u32) -> Self {
        self.config.max_price = max_price;
        self
    }

    #[must_use]
    pub fn freshness_window_months(mut self, months: u32) -> Self {
        self.config.freshness_window_months = months;
        self
    }

    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    #[must_use]
    pub fn exclusion_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclusion_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn run_timeout_secs(mut self, secs: u64) -> Self {
        self.config.run_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn loader_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.loader_poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.chrome_data_dir = dir;
        self
    }

    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Config` when the catalog URL does not parse, an
    /// allowlist is empty, a numeric bound is zero, or an exclusion pattern is
    /// not a valid regex.
    pub fn build(self) -> HarvestResult<HarvestConfig> {
        let config = self.config;

        url::Url::parse(&config.catalog_url).map_err(|e| {
            HarvestError::Config(format!("Invalid catalog URL '{}': {e}", config.catalog_url))
        })?;

        if config.producers.is_empty() {
            return Err(HarvestError::Config("producer allowlist is empty".to_string()));
        }
        if config.flavours.is_empty() {
            return Err(HarvestError::Config("flavour allowlist is empty".to_string()));
        }
        if config.max_price == 0 {
            return Err(HarvestError::Config("max_price must be positive".to_string()));
        }
        if config.run_timeout_secs == 0 {
            return Err(HarvestError::Config(
                "run_timeout_secs must be positive".to_string(),
            ));
        }

        for pattern in &config.exclusion_patterns {
            Regex::new(pattern).map_err(|e| {
                HarvestError::Config(format!("Invalid exclusion pattern '{pattern}': {e}"))
            })?;
        }

        Ok(config)
    }
}
