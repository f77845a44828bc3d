//! Result file output
//!
//! Hrefs are written in the order they were collected, one per line, with no
//! trailing newline. Entries whose link had no `href` are written as `null`
//! and are never matched by the exclusion patterns. The file is overwritten
//! in place with a single write.

use regex::Regex;
use std::path::Path;
use tracing::info;

use crate::error::{HarvestError, HarvestResult};

/// Placeholder line for an entry without an `href`
pub const MISSING_HREF: &str = "null";

/// Applies exclusion patterns and writes the output file
#[derive(Debug, Clone)]
pub struct ResultWriter {
    exclusions: Vec<Regex>,
}

/// Lines kept and dropped by `ResultWriter::render`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    pub excluded: usize,
}

impl ResultWriter {
    /// # Errors
    ///
    /// Returns `HarvestError::Config` if a pattern is not a valid regex.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> HarvestResult<Self> {
        let exclusions = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    HarvestError::Config(format!("Invalid exclusion pattern '{}': {e}", p.as_ref()))
                })
            })
            .collect::<HarvestResult<Vec<_>>>()?;
        Ok(Self { exclusions })
    }

    #[must_use]
    pub fn is_excluded(&self, href: &str) -> bool {
        self.exclusions.iter().any(|re| re.is_match(href))
    }

    /// Drop excluded hrefs and turn the rest into output lines
    #[must_use]
    pub fn render(&self, hrefs: &[Option<String>]) -> Rendered {
        let mut lines = Vec::with_capacity(hrefs.len());
        let mut excluded = 0;

        for href in hrefs {
            match href {
                Some(h) if self.is_excluded(h) => excluded += 1,
                Some(h) => lines.push(h.clone()),
                None => lines.push(MISSING_HREF.to_string()),
            }
        }

        Rendered { lines, excluded }
    }

    /// Overwrite `path` with the rendered hrefs
    pub fn write(&self, path: &Path, hrefs: &[Option<String>]) -> HarvestResult<Rendered> {
        let rendered = self.render(hrefs);
        std::fs::write(path, rendered.lines.join("\n"))?;
        info!(
            "Wrote {} hrefs to {} ({} excluded)",
            rendered.lines.len(),
            path.display(),
            rendered.excluded
        );
        Ok(rendered)
    }
}
