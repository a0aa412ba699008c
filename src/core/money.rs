//! Money helpers shared by the catalog and order workflows.
//!
//! All prices and amounts are [`Decimal`]s with at most two decimal places. Catalog
//! prices carry at most 8 digits in total, order amounts (unit prices, line and order
//! totals, payments) at most 10, which keeps every stored value exact through `SQLite`.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Number of decimal places stored for every price and amount.
pub const MONEY_SCALE: u32 = 2;

/// Total digits allowed in a catalog price.
pub const PRICE_MAX_DIGITS: u32 = 8;

/// Total digits allowed in an order amount.
pub const AMOUNT_MAX_DIGITS: u32 = 10;

/// Rounds to the stored scale. Values read back from `SQLite` can carry float noise.
#[must_use]
pub fn normalize(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Sums amounts and rounds the result to the stored scale.
///
/// # Errors
/// Fails with [`Error::InvalidAmount`] if the sum overflows.
pub fn sum<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| {
            acc.checked_add(amount)
                .ok_or(Error::InvalidAmount { amount })
        })
        .map(normalize)
}

/// Accepts catalog prices of zero or more with no more than two decimal places and
/// eight digits.
pub fn validate_price(price: Decimal) -> Result<Decimal> {
    validate_non_negative(price)?;
    check_digits(validate_scale(price)?, PRICE_MAX_DIGITS)
}

/// Accepts order unit prices of zero or more with no more than two decimal places and
/// ten digits.
pub fn validate_unit_price(price: Decimal) -> Result<Decimal> {
    validate_non_negative(price)?;
    validate_amount(price)
}

/// Accepts strictly positive amounts with no more than two decimal places and ten
/// digits.
pub fn validate_payment_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    validate_amount(amount)
}

/// Checks scale and digit count of an order amount such as a line or order total.
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    check_digits(validate_scale(amount)?, AMOUNT_MAX_DIGITS)
}

/// Multiplies a unit price by a quantity, rejecting results that overflow or do not
/// fit an order amount.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Result<Decimal> {
    let total = unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or(Error::InvalidAmount { amount: unit_price })?;
    check_digits(normalize(total), AMOUNT_MAX_DIGITS)
}

fn validate_non_negative(amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn check_digits(amount: Decimal, max_digits: u32) -> Result<Decimal> {
    let limit = Decimal::from(10_i64.pow(max_digits - MONEY_SCALE));
    if amount.abs() >= limit {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

fn validate_scale(amount: Decimal) -> Result<Decimal> {
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(normalize(amount))
}
