use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use cardvault_core::error::{AppError, ErrorKind};
use cardvault_core::result::AppResult;
use cardvault_core::types::{GiftCardId, TransactionId, UserId};
use cardvault_entity::ledger::{GiftCardTransaction, NewTransaction};
use cardvault_entity::resource::GiftCardBalance;

use super::{MemoryStore, Sequenced};
use crate::repositories::{LedgerRepository, LedgerUnitOfWork};

#[async_trait]
impl LedgerRepository for MemoryStore {
    async fn begin(&self, gift_card: GiftCardId) -> AppResult<Option<Box<dyn LedgerUnitOfWork>>> {
        if !self.state.gift_cards.contains_key(&gift_card) {
            return Ok(None);
        }

        let lock = self
            .state
            .ledger_locks
            .entry(gift_card)
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;

        // The card may have been deleted while we waited.
        let Some(balance) = self.derive_balance(gift_card) else {
            return Ok(None);
        };
        debug!(
            gift_card_id = %gift_card,
            initial = %balance.initial_balance,
            spent = %balance.spent,
            "Gift card locked"
        );

        Ok(Some(Box::new(MemoryLedgerUnitOfWork {
            store: self.clone(),
            _guard: guard,
            balance,
            staged: Vec::new(),
        })))
    }

    async fn balance(&self, gift_card: GiftCardId) -> AppResult<Option<GiftCardBalance>> {
        Ok(self.derive_balance(gift_card))
    }

    async fn list_transactions(
        &self,
        gift_card: GiftCardId,
        include_deleted: bool,
    ) -> AppResult<Vec<GiftCardTransaction>> {
        let mut rows: Vec<Sequenced<GiftCardTransaction>> = self
            .state
            .transactions
            .iter()
            .filter(|t| t.row.gift_card_id == gift_card && (include_deleted || t.row.is_active()))
            .map(|t| t.value().clone())
            .collect();
        rows.sort_by_key(|t| (t.row.transaction_date, t.row.created_at, t.seq));
        Ok(rows.into_iter().map(|t| t.row).collect())
    }

    async fn find_transaction(&self, id: TransactionId) -> AppResult<Option<GiftCardTransaction>> {
        Ok(self.state.transactions.get(&id).map(|t| t.row.clone()))
    }

    async fn mark_deleted(
        &self,
        id: TransactionId,
        deleted_by: UserId,
    ) -> AppResult<Option<GiftCardTransaction>> {
        let Some(mut stored) = self.state.transactions.get_mut(&id) else {
            return Ok(None);
        };
        if !stored.row.is_active() {
            return Ok(None);
        }
        stored.row.deleted_at = Some(Utc::now());
        stored.row.deleted_by = Some(deleted_by);
        Ok(Some(stored.row.clone()))
    }
}

/// Unit of work holding the gift card's async mutex. Inserts are staged
/// and only become visible on commit.
struct MemoryLedgerUnitOfWork {
    store: MemoryStore,
    _guard: OwnedMutexGuard<()>,
    balance: GiftCardBalance,
    staged: Vec<GiftCardTransaction>,
}

#[async_trait]
impl LedgerUnitOfWork for MemoryLedgerUnitOfWork {
    fn balance(&self) -> GiftCardBalance {
        self.balance
    }

    async fn insert(&mut self, data: &NewTransaction) -> AppResult<GiftCardTransaction> {
        let gift_card = self.balance.gift_card_id;
        if data.gift_card_id != gift_card {
            return Err(AppError::internal(
                "Transaction targets a different gift card than the locked one",
            ));
        }
        if data.amount <= Decimal::ZERO {
            return Err(AppError::invalid_amount("Amount must be greater than zero"));
        }

        let committed = self
            .store
            .derive_balance(gift_card)
            .ok_or_else(|| AppError::not_found(format!("Gift card {gift_card} not found")))?;
        let staged: Decimal = self.staged.iter().map(|t| t.amount).sum();
        if committed.current - staged - data.amount < Decimal::ZERO {
            return Err(AppError::new(
                ErrorKind::BalanceConstraint,
                "Gift card balance would become negative",
            ));
        }

        let row = GiftCardTransaction {
            id: TransactionId::new(),
            gift_card_id: gift_card,
            amount: data.amount,
            description: data.description.clone(),
            transaction_date: data.transaction_date,
            created_by: Some(data.created_by),
            created_at: Utc::now(),
            deleted_at: None,
            deleted_by: None,
        };
        self.staged.push(row.clone());
        self.balance = GiftCardBalance::new(
            gift_card,
            self.balance.initial_balance,
            self.balance.spent + row.amount,
        );
        Ok(row)
    }

    async fn commit(&mut self) -> AppResult<()> {
        if !self
            .store
            .state
            .gift_cards
            .contains_key(&self.balance.gift_card_id)
        {
            self.staged.clear();
            return Err(AppError::not_found(format!(
                "Gift card {} not found",
                self.balance.gift_card_id
            )));
        }
        for row in self.staged.drain(..) {
            let seq = self.store.next_seq();
            self.store
                .state
                .transactions
                .insert(row.id, Sequenced { seq, row });
        }
        Ok(())
    }
}
