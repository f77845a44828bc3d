//! Roast date freshness classification
//!
//! A product is fresh when its roast date is not strictly before
//! `today - window` calendar months. The check is fail-closed: a label that is
//! missing, hidden, empty or unparseable yields `Freshness::Undetermined`,
//! which counts as "not fresh" at the pipeline boundary and is never raised
//! as an error.

use chrono::{Months, NaiveDate};
use thiserror::Error;
use tracing::{debug, trace};

use super::types::{ROAST_DATE_LABEL, ROAST_DATE_SELECTOR};
use crate::dom::Node;

/// Roast date pattern, `dd.MM.yyyy`
pub const ROAST_DATE_FORMAT: &str = "%d.%m.%Y";

/// Why a roast date could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FreshnessError {
    #[error("roast date label not present")]
    LabelMissing,

    #[error("roast date label not visible")]
    LabelHidden,

    #[error("roast date label has no text")]
    LabelEmpty,

    #[error("roast date '{text}' does not match dd.MM.yyyy")]
    Unparseable { text: String },

    #[error("roast date could not be read: {0}")]
    Dom(String),
}

/// Outcome of a freshness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Roasted on or after the cutoff
    Fresh { roasted: NaiveDate },
    /// Roasted strictly before the cutoff
    Stale { roasted: NaiveDate, cutoff: NaiveDate },
    /// No usable roast date
    Undetermined(FreshnessError),
}

impl Freshness {
    /// Collapse to the pipeline's keep/drop decision
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh { .. })
    }
}

/// Oldest roast date still considered fresh
///
/// Month subtraction clamps to the last day of shorter months, so
/// `2024-04-30` minus two months is `2024-02-29`.
#[must_use]
pub fn freshness_cutoff(today: NaiveDate, window_months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(window_months))
        .unwrap_or(NaiveDate::MIN)
}

/// Classify a known roast date
#[must_use]
pub fn classify(roasted: NaiveDate, today: NaiveDate, window_months: u32) -> Freshness {
    let cutoff = freshness_cutoff(today, window_months);
    if roasted < cutoff {
        Freshness::Stale { roasted, cutoff }
    } else {
        Freshness::Fresh { roasted }
    }
}

/// Parse a roast date label such as `Data palenia: 15.02.2024`
///
/// The label prefix is optional; surrounding whitespace is ignored.
///
/// # Errors
///
/// `LabelEmpty` for blank text, `Unparseable` when the remainder is not a
/// `dd.MM.yyyy` date.
pub fn parse_roast_label(text: &str) -> Result<NaiveDate, FreshnessError> {
    let trimmed = text.trim();
    let date_text = trimmed
        .strip_prefix(ROAST_DATE_LABEL)
        .unwrap_or(trimmed)
        .trim();

    if date_text.is_empty() {
        return Err(FreshnessError::LabelEmpty);
    }

    NaiveDate::parse_from_str(date_text, ROAST_DATE_FORMAT).map_err(|_| {
        FreshnessError::Unparseable {
            text: date_text.to_string(),
        }
    })
}

/// Read the roast date label of `product`
async fn read_roast_date<N: Node>(product: &N) -> Result<NaiveDate, FreshnessError> {
    let dom = |e: crate::error::HarvestError| FreshnessError::Dom(e.to_string());

    let label = product
        .query(ROAST_DATE_SELECTOR)
        .await
        .map_err(dom)?
        .ok_or(FreshnessError::LabelMissing)?;

    if !label.is_visible().await.map_err(dom)? {
        return Err(FreshnessError::LabelHidden);
    }

    let text = label
        .text_content()
        .await
        .map_err(dom)?
        .filter(|t| !t.is_empty())
        .ok_or(FreshnessError::LabelEmpty)?;

    parse_roast_label(&text)
}

/// Check the freshness of one product entry
///
/// Never fails: DOM errors while reading the label become
/// `Freshness::Undetermined`.
pub async fn assess<N: Node>(product: &N, today: NaiveDate, window_months: u32) -> Freshness {
    match read_roast_date(product).await {
        Ok(roasted) => {
            let freshness = classify(roasted, today, window_months);
            if let Freshness::Stale { roasted, cutoff } = &freshness {
                debug!("Roast date too old: {} (cutoff {})", roasted, cutoff);
            }
            freshness
        }
        Err(reason) => {
            trace!("Roast date undetermined: {}", reason);
            Freshness::Undetermined(reason)
        }
    }
}
