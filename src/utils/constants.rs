//! Shared configuration constants
//!
//! Default values used by the config builder and browser setup.

/// Default deadline for a whole run: 5 minutes
///
/// A full scan of the filtered catalog takes well under a minute; the
/// deadline only trips when the busy indicator never clears or the browser
/// stops answering.
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 5 * 60;

/// Default sleep between busy indicator checks: 100ms
pub const DEFAULT_LOADER_POLL_MS: u64 = 100;

/// Per-request CDP timeout for the launched browser
pub const BROWSER_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
