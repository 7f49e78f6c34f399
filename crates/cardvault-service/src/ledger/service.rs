//! Gift card ledger service.
//!
//! Creating a transaction follows a fixed protocol:
//! 1. validate the amount,
//! 2. require `can_edit_transactions`,
//! 3. open a unit of work that locks the gift card and re-reads its balance,
//! 4. refuse debits larger than the balance,
//! 5. insert and commit.
//!
//! The storage layer enforces the non-negative balance independently. If it
//! rejects an insert that passed step 4, the race is logged and reported as
//! an insufficient balance; the operation is not retried.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use cardvault_auth::{AccessResolver, Capability};
use cardvault_core::config::LedgerConfig;
use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::events::AuditAction;
use cardvault_core::result::AppResult;
use cardvault_core::types::{GiftCardId, TransactionId};
use cardvault_database::repositories::LedgerRepository;
use cardvault_entity::ledger::{GiftCardTransaction, NewTransaction};
use cardvault_entity::resource::GiftCardBalance;

use super::amount::validate_amount;
use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// Creates, deletes and reads gift card transactions.
#[derive(Debug, Clone)]
pub struct LedgerService {
    /// Ledger storage.
    ledger_repo: Arc<dyn LedgerRepository>,
    /// Permission checks.
    access: AccessResolver,
    /// Audit trail.
    audit: AuditRecorder,
    /// Ledger limits.
    config: LedgerConfig,
}

impl LedgerService {
    /// Creates a new ledger service.
    pub fn new(
        ledger_repo: Arc<dyn LedgerRepository>,
        access: AccessResolver,
        audit: AuditRecorder,
        config: LedgerConfig,
    ) -> Self {
        Self {
            ledger_repo,
            access,
            audit,
            config,
        }
    }

    /// Debits `amount` from a gift card.
    ///
    /// Fails with `InsufficientBalance`, reporting the available balance,
    /// if the debit would take the balance below zero.
    pub async fn create_transaction(
        &self,
        ctx: &RequestContext,
        gift_card: GiftCardId,
        amount: Decimal,
        description: &str,
        transaction_date: NaiveDate,
    ) -> AppResult<GiftCardTransaction> {
        let transaction = ctx
            .run(async {
                let amount = validate_amount(amount)?;
                let description = self.validate_description(description)?;

                self.access
                    .check_gift_card_access(ctx.user_id, gift_card)
                    .await?
                    .require(Capability::EditTransactions)?;

                let mut uow = self
                    .ledger_repo
                    .begin(gift_card)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Gift card {gift_card} not found")))?;

                let available = uow.balance().current;
                if amount > available {
                    info!(
                        user_id = %ctx.user_id,
                        gift_card_id = %gift_card,
                        %amount,
                        %available,
                        "Debit refused: insufficient balance"
                    );
                    return Err(AppError::insufficient_balance(format!("{available:.2}")));
                }

                let new = NewTransaction {
                    gift_card_id: gift_card,
                    amount,
                    description,
                    transaction_date,
                    created_by: ctx.user_id,
                };

                let inserted = match uow.insert(&new).await {
                    Ok(row) => uow.commit().await.map(|()| row),
                    Err(e) => Err(e),
                };
                drop(uow);

                match inserted {
                    Err(e) if e.kind == ErrorKind::BalanceConstraint => {
                        Err(self.race_caught(ctx, gift_card, amount).await)
                    }
                    other => other,
                }
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            gift_card_id = %gift_card,
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            "Gift card transaction created"
        );
        self.audit
            .record(
                ctx,
                AuditAction::TransactionCreated,
                gift_card.into(),
                &transaction,
            )
            .await;

        Ok(transaction)
    }

    /// Soft-deletes a transaction of `gift_card`, restoring its amount to
    /// the balance.
    ///
    /// A transaction that does not exist, belongs to another gift card, or
    /// is already deleted is `NotFound`.
    pub async fn delete_transaction(
        &self,
        ctx: &RequestContext,
        gift_card: GiftCardId,
        transaction: TransactionId,
    ) -> AppResult<GiftCardTransaction> {
        let deleted = ctx
            .run(async {
                self.access
                    .check_gift_card_access(ctx.user_id, gift_card)
                    .await?
                    .require(Capability::EditTransactions)?;

                let not_found =
                    || AppError::not_found(format!("Transaction {transaction} not found"));

                let existing = self
                    .ledger_repo
                    .find_transaction(transaction)
                    .await?
                    .filter(|t| t.gift_card_id == gift_card && t.is_active())
                    .ok_or_else(not_found)?;

                self.ledger_repo
                    .mark_deleted(existing.id, ctx.user_id)
                    .await?
                    .ok_or_else(not_found)
            })
            .await?;

        info!(
            user_id = %ctx.user_id,
            gift_card_id = %gift_card,
            transaction_id = %deleted.id,
            amount = %deleted.amount,
            "Gift card transaction deleted"
        );
        self.audit
            .record(
                ctx,
                AuditAction::TransactionDeleted,
                gift_card.into(),
                &deleted,
            )
            .await;

        Ok(deleted)
    }

    /// Current balance of a gift card. Requires view access.
    pub async fn balance(
        &self,
        ctx: &RequestContext,
        gift_card: GiftCardId,
    ) -> AppResult<GiftCardBalance> {
        ctx.run(async {
            self.access
                .check_gift_card_access(ctx.user_id, gift_card)
                .await?;
            self.ledger_repo
                .balance(gift_card)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Gift card {gift_card} not found")))
        })
        .await
    }

    /// Transactions of a gift card ordered by transaction date. Requires
    /// view access.
    pub async fn list_transactions(
        &self,
        ctx: &RequestContext,
        gift_card: GiftCardId,
        include_deleted: bool,
    ) -> AppResult<Vec<GiftCardTransaction>> {
        ctx.run(async {
            self.access
                .check_gift_card_access(ctx.user_id, gift_card)
                .await?;
            self.ledger_repo
                .list_transactions(gift_card, include_deleted)
                .await
        })
        .await
    }

    fn validate_description(&self, description: &str) -> AppResult<String> {
        let description = description.trim();
        let max = self.config.max_description_length;
        if description.chars().count() > max {
            return Err(AppError::validation(format!(
                "Description must be at most {max} characters"
            )));
        }
        Ok(description.to_string())
    }

    /// The storage layer rejected a debit the application check let
    /// through. Report it with a freshly read balance.
    async fn race_caught(
        &self,
        ctx: &RequestContext,
        gift_card: GiftCardId,
        amount: Decimal,
    ) -> AppError {
        let available = match self.ledger_repo.balance(gift_card).await {
            Ok(Some(balance)) => balance.current.max(Decimal::ZERO),
            Ok(None) => Decimal::ZERO,
            Err(e) => return e,
        };
        warn!(
            user_id = %ctx.user_id,
            gift_card_id = %gift_card,
            %amount,
            %available,
            "Race caught by balance constraint; debit rejected"
        );
        AppError::insufficient_balance(format!("{available:.2}"))
    }
}
