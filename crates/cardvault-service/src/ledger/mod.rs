//! Gift card balance ledger.

pub mod amount;
pub mod service;

pub use amount::validate_amount;
pub use service::LedgerService;
