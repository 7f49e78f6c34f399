//! Request context carrying the acting user and a cancellation signal.

use std::future::Future;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;
use cardvault_core::types::UserId;

/// Context for the current authenticated request.
///
/// Passed into every service method so that each operation knows *who*
/// is acting and can be abandoned when the caller goes away.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// Correlation ID for logs.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    /// Fires when the request is cancelled.
    cancel: CancellationToken,
}

impl RequestContext {
    /// Creates a context for `user_id` that is never cancelled.
    pub fn new(user_id: UserId) -> Self {
        Self::with_cancellation(user_id, CancellationToken::new())
    }

    /// Creates a context for `user_id` cancelled by `cancel`.
    pub fn with_cancellation(user_id: UserId, cancel: CancellationToken) -> Self {
        Self {
            user_id,
            request_id: Uuid::now_v7(),
            request_time: Utc::now(),
            cancel,
        }
    }

    /// The token cancelling this request.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the request has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` to completion unless the request is cancelled first.
    ///
    /// On cancellation `fut` is dropped where it stands; anything it held
    /// open (a ledger unit of work, a database transaction) rolls back.
    pub async fn run<T, F>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::cancelled(format!(
                "Request {} was cancelled",
                self.request_id
            ))),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::error::ErrorKind;

    #[tokio::test]
    async fn test_run_completes_when_not_cancelled() {
        let ctx = RequestContext::new(UserId::new());
        let value = ctx.run(async { Ok::<_, AppError>(7) }).await.expect("runs");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_aborts_when_cancelled() {
        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(UserId::new(), token.clone());
        token.cancel();
        let err = ctx
            .run(std::future::pending::<AppResult<()>>())
            .await
            .expect_err("cancelled");
        assert_eq!(err.kind, ErrorKind::Cancelled);
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_context_abandons_access_check() {
        use cardvault_database::Repositories;
        use cardvault_entity::resource::NewCard;

        let repos = Repositories::memory();
        let owner = UserId::new();
        let card = repos
            .resources
            .create_card(&NewCard {
                owner_id: Some(owner),
                name: "Library".into(),
                card_number: None,
            })
            .await
            .expect("create card");
        let access = cardvault_auth::AccessResolver::new(
            std::sync::Arc::clone(&repos.resources),
            std::sync::Arc::clone(&repos.shares),
        );

        let token = CancellationToken::new();
        let ctx = RequestContext::with_cancellation(owner, token.clone());
        let perms = ctx
            .run(access.check_card_access(ctx.user_id, card.id))
            .await
            .expect("live context resolves");
        assert!(perms.is_owner);

        token.cancel();
        let err = ctx
            .run(access.check_card_access(ctx.user_id, card.id))
            .await
            .expect_err("cancelled");
        assert_eq!(err.kind, ErrorKind::Cancelled);
    }
}
