// ritual/src/policy.rs

//! Policy functions injected into a pipeline at construction time.
//!
//! A policy is a pure function stored behind an `Arc`. Adjustment policies map an
//! amount to a new amount (shipping, promotion, exchange); the fraud policy
//! decides whether an amount may proceed. An unbound slot behaves as identity
//! (adjustments) or always-approve (fraud check), it never skips the step that
//! would have applied it.

use crate::money::Decimal;
use std::sync::Arc;

/// `(amount) -> amount`
pub type AdjustmentPolicy = Arc<dyn Fn(Decimal) -> Decimal + Send + Sync>;

/// `(amount) -> approved?`
pub type FraudPolicy = Arc<dyn Fn(Decimal) -> bool + Send + Sync>;

/// Applies an optional adjustment policy; an unbound slot returns `amount` unchanged.
pub fn adjust(policy: Option<&AdjustmentPolicy>, amount: Decimal) -> Decimal {
  policy.map_or(amount, |f| f(amount))
}

/// Evaluates an optional fraud policy; an unbound slot approves.
pub fn approve(policy: Option<&FraudPolicy>, amount: Decimal) -> bool {
  policy.map_or(true, |f| f(amount))
}

/// Ready-made policies for the common adjustments.
pub mod presets {
  use super::{AdjustmentPolicy, FraudPolicy};
  use crate::money::Decimal;
  use std::sync::Arc;

  pub fn identity() -> AdjustmentPolicy {
    Arc::new(|amount| amount)
  }

  /// Adds a fixed fee, e.g. flat-rate shipping.
  pub fn flat_surcharge(fee: Decimal) -> AdjustmentPolicy {
    Arc::new(move |amount| amount + fee)
  }

  /// Adds `percent` percent of the amount. `percentage_surcharge(10)` multiplies by 1.10.
  pub fn percentage_surcharge(percent: Decimal) -> AdjustmentPolicy {
    let factor = Decimal::ONE + percent / Decimal::ONE_HUNDRED;
    Arc::new(move |amount| amount * factor)
  }

  /// Subtracts a fixed amount, e.g. a coupon.
  pub fn flat_discount(discount: Decimal) -> AdjustmentPolicy {
    Arc::new(move |amount| amount - discount)
  }

  /// Multiplies by an exchange rate that already includes any markup.
  pub fn exchange_markup(rate: Decimal) -> AdjustmentPolicy {
    Arc::new(move |amount| amount * rate)
  }

  pub fn approve_all() -> FraudPolicy {
    Arc::new(|_| true)
  }

  pub fn reject_all() -> FraudPolicy {
    Arc::new(|_| false)
  }

  /// Approves amounts strictly below `limit`, rejects anything at or above it.
  pub fn approve_below(limit: Decimal) -> FraudPolicy {
    Arc::new(move |amount| amount < limit)
  }
}

#[cfg(test)]
mod tests {
  use super::presets::*;
  use super::*;

  #[test]
  fn unbound_slots_are_identity_and_approve() {
    let amount = Decimal::new(12345, 2);
    assert_eq!(adjust(None, amount), amount);
    assert!(approve(None, amount));
  }

  #[test]
  fn presets_compute_expected_amounts() {
    let hundred = Decimal::ONE_HUNDRED;
    assert_eq!(adjust(Some(&identity()), hundred), hundred);
    assert_eq!(adjust(Some(&flat_surcharge(Decimal::new(25, 0))), hundred), Decimal::new(125, 0));
    assert_eq!(adjust(Some(&percentage_surcharge(Decimal::TEN)), hundred), Decimal::new(110, 0));
    assert_eq!(adjust(Some(&flat_discount(Decimal::new(15, 0))), hundred), Decimal::new(85, 0));
    assert_eq!(adjust(Some(&exchange_markup(Decimal::new(105, 2))), hundred), Decimal::new(105, 0));
  }

  #[test]
  fn fraud_presets() {
    let limit = approve_below(Decimal::new(150, 0));
    assert!(approve(Some(&limit), Decimal::new(14999, 2)));
    assert!(!approve(Some(&limit), Decimal::new(150, 0)));
    assert!(approve(Some(&approve_all()), Decimal::MAX));
    assert!(!approve(Some(&reject_all()), Decimal::ZERO));
  }
}
