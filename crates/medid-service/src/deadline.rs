//! Store-call deadlines.

use std::future::Future;
use std::time::Duration;

use medid_store::StoreError;
use tracing::warn;

use crate::error::ServiceError;

/// Await a store call for at most `limit`.
///
/// An elapsed deadline becomes [`ServiceError::StoreUnavailable`]. The
/// in-memory stores never suspend while holding a lock, so a dropped future
/// leaves no partial write behind.
pub async fn within<T, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(ServiceError::from),
        Err(_) => {
            warn!(operation, timeout_ms = limit.as_millis() as u64, "store call timed out");
            Err(ServiceError::StoreUnavailable(format!(
                "{operation} did not complete within {}ms",
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_results() {
        let ok = within(Duration::from_secs(1), "read", async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = within(Duration::from_secs(1), "read", async {
            Err::<(), _>(StoreError::NotFound("credential x".into()))
        })
        .await;
        assert_eq!(err.unwrap_err().code(), "NOT_FOUND");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_is_unavailable() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, StoreError>(())
        };
        let err = within(Duration::from_millis(50), "save", slow).await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(m) if m.contains("save")));
    }
}
