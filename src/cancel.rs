// Cancellation support shared by the remote client and the reconciler

use crate::error::{Error, Result};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Race `fut` against `cancel`. A token that is already cancelled wins
/// without polling the future.
pub async fn or_cancelled<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        res = fut => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let res = or_cancelled(&token, async { Ok::<_, Error>(1) }).await;
        assert!(matches!(res, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn live_token_passes_result_through() {
        let token = CancellationToken::new();
        let res = or_cancelled(&token, async { Ok::<_, Error>(7) }).await;
        assert_eq!(res.unwrap(), 7);
    }
}
