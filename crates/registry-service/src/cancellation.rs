//! Cancellation plumbing: every Service operation takes a caller-supplied
//! [`CancellationToken`] and races it against each I/O boundary (persistence,
//! cache, broker). A cancellation mid-mutation, after commit, is treated the
//! same as a post-commit crash: the write already landed, only the
//! best-effort cache invalidation / event publish are skipped.

use registry_error::{RegistryError, Result};
use tokio_util::sync::CancellationToken;

pub use tokio_util::sync::CancellationToken as Cancellation;

/// Race `future` against `token`, returning [`RegistryError::Cancelled`] if
/// the token fires first.
pub async fn cancellable<F, T>(token: &CancellationToken, future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(RegistryError::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_normally_when_not_cancelled() {
        let token = CancellationToken::new();
        let result = cancellable(&token, async { Ok::<_, RegistryError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn returns_cancelled_when_token_fires_first() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<i32> = cancellable(&token, std::future::pending()).await;
        assert!(matches!(result.unwrap_err(), RegistryError::Cancelled));
    }
}
