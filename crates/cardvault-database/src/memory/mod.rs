//! In-memory implementation of every repository trait.
//!
//! Used by tests and by the `memory` storage backend. Uniqueness and the
//! non-negative balance rule are enforced here independently of the
//! services, the same way the database enforces them with constraints
//! and triggers.

mod audit;
mod favorites;
mod ledger;
mod resources;
mod shares;
mod users;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, RwLock};

use cardvault_core::types::{
    CardId, GiftCardId, ResourceRef, ShareId, TransactionId, UserId, VoucherId,
};
use cardvault_entity::audit::AuditLogEntry;
use cardvault_entity::favorite::Favorite;
use cardvault_entity::ledger::GiftCardTransaction;
use cardvault_entity::resource::{Card, GiftCard, GiftCardBalance, Voucher};
use cardvault_entity::share::Share;
use cardvault_entity::user::User;

/// Shared in-memory store. Cloning is cheap; clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<State>,
}

/// A stored row tagged with its insertion sequence, used as a tie-breaker
/// when ordering by timestamp.
#[derive(Debug, Clone)]
struct Sequenced<T> {
    seq: u64,
    row: T,
}

#[derive(Debug, Default)]
struct State {
    seq: AtomicU64,
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    cards: DashMap<CardId, Card>,
    vouchers: DashMap<VoucherId, Voucher>,
    gift_cards: DashMap<GiftCardId, GiftCard>,
    shares: DashMap<ShareId, Sequenced<Share>>,
    share_index: DashMap<(ResourceRef, UserId), ShareId>,
    transactions: DashMap<TransactionId, Sequenced<GiftCardTransaction>>,
    ledger_locks: DashMap<GiftCardId, Arc<Mutex<()>>>,
    favorites: DashMap<(UserId, ResourceRef), Favorite>,
    audit_log: RwLock<Vec<AuditLogEntry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.state.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Balance derived from the committed rows, without locking.
    fn derive_balance(&self, gift_card: GiftCardId) -> Option<GiftCardBalance> {
        let initial = self.state.gift_cards.get(&gift_card)?.initial_balance;
        let spent: Decimal = self
            .state
            .transactions
            .iter()
            .filter(|t| t.row.gift_card_id == gift_card && t.row.is_active())
            .map(|t| t.row.amount)
            .sum();
        Some(GiftCardBalance::new(gift_card, initial, spent))
    }

    /// Remove everything hanging off a deleted resource.
    fn cascade_delete(&self, resource: ResourceRef) {
        let removed: Vec<ShareId> = self
            .state
            .shares
            .iter()
            .filter(|s| s.row.resource == resource)
            .map(|s| *s.key())
            .collect();
        for id in removed {
            if let Some((_, stored)) = self.state.shares.remove(&id) {
                self.state
                    .share_index
                    .remove(&(resource, stored.row.shared_with));
            }
        }

        if let ResourceRef::GiftCard(gift_card) = resource {
            self.state
                .transactions
                .retain(|_, t| t.row.gift_card_id != gift_card);
            self.state.ledger_locks.remove(&gift_card);
        }

        self.state.favorites.retain(|(_, r), _| *r != resource);
    }
}
