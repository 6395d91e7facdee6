// ritual/src/payment/method.rs

//! The payment capability interface and the card, PIX and boleto methods.

use crate::error::RitualResult;
use crate::money::{format_amount, Decimal};
use tracing::{info, trace};

/// Step behaviour a payment method may specialize.
///
/// A method never decides the amount: obtaining the value, exchange and the
/// fraud gate belong to the skeleton. The hooks below only see the processed
/// value recorded once the gate approved the run.
pub trait PaymentMethod: Send + Sync + std::fmt::Debug {
  fn name(&self) -> &'static str;

  /// Checks added on top of the base validation.
  fn validate(&self) -> RitualResult<()> {
    Ok(())
  }

  /// Simulated authorization or capture. Returns a notice when the method
  /// produces one.
  fn authorize_or_capture(&self, _processed_value: Decimal) -> Option<String> {
    None
  }

  /// Confirmation text referencing the processed value.
  fn confirm(&self, processed_value: Decimal) -> String {
    format!("Pagamento confirmado: Valor processado = {}", format_amount(processed_value))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Card;

impl PaymentMethod for Card {
  fn name(&self) -> &'static str {
    "Card"
  }

  fn validate(&self) -> RitualResult<()> {
    // Number, CVV and expiry checks are simulated.
    trace!(method = self.name(), "Card details check (simulated).");
    Ok(())
  }

  fn authorize_or_capture(&self, processed_value: Decimal) -> Option<String> {
    let notice = format!("Autorizando cartão (simulado): {}", format_amount(processed_value));
    info!(method = self.name(), %processed_value, "{}", notice);
    Some(notice)
  }

  fn confirm(&self, processed_value: Decimal) -> String {
    format!("Comprovante Cartão: Valor processado = {}", format_amount(processed_value))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pix;

impl PaymentMethod for Pix {
  fn name(&self) -> &'static str {
    "Pix"
  }

  fn authorize_or_capture(&self, _processed_value: Decimal) -> Option<String> {
    trace!(method = self.name(), "PIX payload generation (simulated).");
    None
  }

  fn confirm(&self, processed_value: Decimal) -> String {
    format!("Comprovante PIX: Valor processado = {}", format_amount(processed_value))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boleto;

impl PaymentMethod for Boleto {
  fn name(&self) -> &'static str {
    "Boleto"
  }

  fn validate(&self) -> RitualResult<()> {
    trace!(method = self.name(), "Due date check (simulated).");
    Ok(())
  }

  fn authorize_or_capture(&self, _processed_value: Decimal) -> Option<String> {
    trace!(method = self.name(), "Digitable line generation (simulated).");
    None
  }

  fn confirm(&self, processed_value: Decimal) -> String {
    format!("Boleto gerado: Valor processado = {}", format_amount(processed_value))
  }
}
