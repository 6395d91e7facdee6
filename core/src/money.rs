// ritual/src/money.rs

//! Monetary amounts are plain `rust_decimal::Decimal` values.

use crate::error::{RitualError, RitualResult};
pub use rust_decimal::Decimal;

/// Places kept when an amount is rendered into a receipt or confirmation.
pub const DISPLAY_SCALE: u32 = 2;

/// The base amount both skeletons start from when none is configured.
pub fn reference_amount() -> Decimal {
  Decimal::ONE_HUNDRED
}

/// Largest base amount a pipeline accepts: 10 trillion.
///
/// Keeps every built-in variant delta far away from `Decimal::MAX`.
pub fn max_amount() -> Decimal {
  Decimal::new(10_000_000_000_000, 0)
}

/// Accepts `amount` as a base amount, or explains under `key` why it can't be one.
pub fn check_amount(key: &str, amount: Decimal) -> RitualResult<Decimal> {
  if amount.is_sign_negative() && !amount.is_zero() {
    return Err(RitualError::ConfigurationError {
      key: key.to_string(),
      message: format!("amount must not be negative, got {}", amount),
    });
  }
  if amount > max_amount() {
    return Err(RitualError::ConfigurationError {
      key: key.to_string(),
      message: format!("amount must not exceed {}, got {}", max_amount(), amount),
    });
  }
  Ok(amount)
}

/// Renders `amount` rounded to two decimal places, always showing both (`110.00`).
pub fn format_amount(amount: Decimal) -> String {
  let mut rounded = amount.round_dp(DISPLAY_SCALE);
  rounded.rescale(DISPLAY_SCALE);
  rounded.to_string()
}
