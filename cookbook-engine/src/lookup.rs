//! Deadlines for calls into external collaborators.

use std::{future::Future, time::Duration};

use cookbook_common::errors::CookbookError;
use tracing::warn;

/// Deadline applied to every on-chain or HTTP lookup a recipe performs.
pub const EXTERNAL_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Await `lookup`, failing with [`CookbookError::Timeout`] if it does not resolve within
/// `timeout`.
pub async fn with_timeout<T, F>(
    context: &str,
    timeout: Duration,
    lookup: F,
) -> Result<T, CookbookError>
where
    F: Future<Output = Result<T, CookbookError>>,
{
    match tokio::time::timeout(timeout, lookup).await {
        Ok(result) => result,
        Err(_) => {
            warn!(context, timeout_secs = timeout.as_secs(), "External lookup timed out");
            Err(CookbookError::Timeout { context: context.to_string(), timeout })
        }
    }
}
