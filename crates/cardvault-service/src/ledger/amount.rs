//! Validation of transaction amounts.

use rust_decimal::Decimal;

use cardvault_core::error::AppError;
use cardvault_core::result::AppResult;

/// Largest number of decimal places an amount may carry.
pub const MAX_SCALE: u32 = 2;

/// Check that `amount` is a positive amount of whole cents.
pub fn validate_amount(amount: Decimal) -> AppResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid_amount(format!(
            "Amount must be greater than zero, got {amount}"
        )));
    }
    let normalized = amount.normalize();
    if normalized.scale() > MAX_SCALE {
        return Err(AppError::invalid_amount(format!(
            "Amount {amount} has more than {MAX_SCALE} decimal places"
        )));
    }
    Ok(normalized)
}
