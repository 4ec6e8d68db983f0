use std::future::Future;
use std::time::Duration;

use salesdash_core::{DashError, Result};

/// Runs `request`, failing with [`DashError::Timeout`] after `limit`.
///
/// Applied on top of the HTTP client's own timeout so that any
/// [`salesdash_core::service`] implementation is bounded.
pub(crate) async fn with_deadline<T, F>(endpoint: &str, limit: Duration, request: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(DashError::timeout(endpoint, limit)),
    }
}
