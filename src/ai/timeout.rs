//! Timeout helper for advisory calls.

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, StressError};

/// Execute an async operation with a timeout
///
/// Returns [`StressError::Timeout`] if the operation doesn't complete
/// within `timeout`.
///
/// ```ignore
/// let response = with_timeout(
///     Duration::from_secs(20),
///     provider.generate(&prompt, &schema),
///     "advisory request",
/// )
/// .await?;
/// ```
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(StressError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, StressError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, StressError>(42)
            },
            "slow operation",
        )
        .await;
        match result {
            Err(StressError::Timeout { operation, .. }) => assert_eq!(operation, "slow operation"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<()> = with_timeout(
            Duration::from_secs(1),
            async { Err(StressError::Config("bad".to_string())) },
            "op",
        )
        .await;
        assert!(matches!(result, Err(StressError::Config(_))));
    }
}
