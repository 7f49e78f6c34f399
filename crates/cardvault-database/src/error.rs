//! Mapping of sqlx errors into [`AppError`].

use cardvault_core::error::{AppError, ErrorKind};

/// Name of the constraint raised by the gift card balance trigger.
pub const BALANCE_CONSTRAINT: &str = "gift_card_balance_non_negative";

/// Build a `map_err` adapter that classifies a sqlx error.
///
/// Unique violations become [`ErrorKind::Conflict`], the balance trigger
/// becomes [`ErrorKind::BalanceConstraint`], and everything else is an
/// opaque [`ErrorKind::Database`] error carrying `context`.
pub fn map_db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::with_source(
                    ErrorKind::Conflict,
                    format!("{context}: a matching record already exists"),
                    e,
                );
            }
            if db.is_check_violation() && db.constraint() == Some(BALANCE_CONSTRAINT) {
                return AppError::with_source(
                    ErrorKind::BalanceConstraint,
                    "Gift card balance would become negative",
                    e,
                );
            }
        }
        AppError::with_source(ErrorKind::Database, context, e)
    }
}
