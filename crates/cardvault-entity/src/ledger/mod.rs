//! Gift card ledger entities.

pub mod transaction;

pub use transaction::{GiftCardTransaction, NewTransaction, TransactionState};
