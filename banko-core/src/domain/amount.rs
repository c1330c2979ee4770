//! Money amount rules

use rust_decimal::Decimal;

use super::result::{Error, Result};

/// Number of fractional digits every stored amount carries
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound of any amount or balance; DECIMAL(18, 2) holds 16 integer digits
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_874_919_424, 2_328_306, 0, false, 0);

/// Validate an amount for a deposit, withdrawal, transfer or loan
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation("Amount must be positive"));
    }
    check_scale(amount)
}

/// Validate the opening balance of a new account (zero is allowed)
pub fn validate_opening_balance(amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::validation("Initial deposit cannot be negative"));
    }
    check_scale(amount)
}

fn check_scale(amount: Decimal) -> Result<Decimal> {
    if amount >= MAX_AMOUNT {
        return Err(Error::validation(format!("Amount must be below {}", MAX_AMOUNT)));
    }
    let normalized = amount.normalize();
    if normalized.scale() > AMOUNT_SCALE {
        return Err(Error::validation(format!(
            "Amount cannot have more than {} decimal places",
            AMOUNT_SCALE
        )));
    }
    let mut value = normalized;
    value.rescale(AMOUNT_SCALE);
    Ok(value)
}

/// Balance after crediting `amount`, refused when it would leave the storable range
pub fn credit(balance: Decimal, amount: Decimal) -> Result<Decimal> {
    balance
        .checked_add(amount)
        .filter(|total| *total < MAX_AMOUNT)
        .ok_or_else(|| Error::validation(format!("Balance would reach {} or more", MAX_AMOUNT)))
}

/// Balance after debiting `amount`; callers check funds first
pub fn debit(balance: Decimal, amount: Decimal) -> Result<Decimal> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| Error::validation("Balance out of range"))
}

/// Render an amount with the configured currency symbol, e.g. `₱1250.50`
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    let mut value = amount;
    value.rescale(AMOUNT_SCALE);
    format!("{}{}", symbol, value)
}
