//! Deadline wrapper for browser operations
//!
//! The pipeline has exactly one deadline, covering the whole run. Stages never
//! set their own.

use std::future::Future;
use std::time::Duration;

use crate::error::{HarvestError, HarvestResult};

/// Run `operation` to completion or fail with `HarvestError::Timeout`
///
/// # Arguments
/// * `operation` - The async operation to bound
/// * `timeout_secs` - Deadline in seconds
/// * `operation_name` - Human-readable name for the error message
pub async fn with_deadline<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> HarvestResult<T>
where
    F: Future<Output = HarvestResult<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(HarvestError::Timeout {
            operation: operation_name.to_string(),
            secs: timeout_secs,
        }),
    }
}
