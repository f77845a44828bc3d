//! Error types for harvest operations
//!
//! Automation failures are not recovered anywhere in the pipeline: they
//! propagate to the caller and the run produces no output file. The only
//! locally absorbed failure is an unreadable roast date, which lives in
//! [`crate::catalog::freshness::FreshnessError`].

use thiserror::Error;

/// Result type alias for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Error types for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Browser could not be found, launched or talked to
    #[error("Browser error: {0}")]
    Browser(String),

    /// Page navigation failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// A required element was not present on the page
    #[error("Element not found: '{selector}'")]
    ElementNotFound { selector: String },

    /// An operation ran past its deadline
    #[error("{operation} timeout after {secs} seconds")]
    Timeout { operation: String, secs: u64 },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Harvest error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for HarvestError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::Other(format!("{err:#}"))
    }
}

impl From<chromiumoxide::error::CdpError> for HarvestError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

impl HarvestError {
    /// Shorthand for [`HarvestError::ElementNotFound`]
    pub fn missing(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }
}
