// ritual/src/order/variant.rs

//! The order capability interface and its two leaf variants.

use crate::error::RitualResult;
use crate::money::{format_amount, Decimal};
use tracing::trace;

/// Step behaviour an order variant may specialize.
///
/// The skeleton owns the step order and the base rules; a variant only sees
/// what the skeleton hands it. Validation here runs after the base checks, and
/// `adjust_subtotal` receives the base subtotal instead of computing its own.
pub trait OrderVariant: Send + Sync + std::fmt::Debug {
  /// Stable identifier, used in logs and on the receipt.
  fn name(&self) -> &'static str;

  /// Checks added on top of the base validation.
  fn validate(&self) -> RitualResult<()> {
    Ok(())
  }

  /// Variant delta applied to the base subtotal.
  fn adjust_subtotal(&self, base_subtotal: Decimal) -> Decimal {
    base_subtotal
  }

  /// Receipt text for the final, post-policy amount.
  fn emit_receipt(&self, total: Decimal) -> String {
    format!("Recibo: {}", format_amount(total))
  }
}

/// Domestic order: 10% tax embedded in the subtotal, NF-e receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct National;

impl National {
  /// base × 1.10
  pub fn tax_factor() -> Decimal {
    Decimal::new(110, 2)
  }
}

impl OrderVariant for National {
  fn name(&self) -> &'static str {
    "National"
  }

  fn adjust_subtotal(&self, base_subtotal: Decimal) -> Decimal {
    base_subtotal * Self::tax_factor()
  }

  fn emit_receipt(&self, total: Decimal) -> String {
    format!("Recibo (Nacional): {} - NF-e", format_amount(total))
  }
}

/// Export order: 20% import duty plus a flat customs fee, commercial invoice receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct International;

impl International {
  pub fn duty_factor() -> Decimal {
    Decimal::new(120, 2)
  }

  pub fn customs_fee() -> Decimal {
    Decimal::new(5000, 2)
  }

  fn check_export_documentation(&self) -> RitualResult<()> {
    trace!(variant = self.name(), "Export documentation check (simulated).");
    Ok(())
  }

  fn check_exchange(&self) -> RitualResult<()> {
    trace!(variant = self.name(), "Exchange check (simulated).");
    Ok(())
  }
}

impl OrderVariant for International {
  fn name(&self) -> &'static str {
    "International"
  }

  fn validate(&self) -> RitualResult<()> {
    self.check_export_documentation()?;
    self.check_exchange()
  }

  fn adjust_subtotal(&self, base_subtotal: Decimal) -> Decimal {
    base_subtotal * Self::duty_factor() + Self::customs_fee()
  }

  fn emit_receipt(&self, total: Decimal) -> String {
    format!("Recibo (Internacional): {} - Commercial Invoice", format_amount(total))
  }
}
