// ritual/src/config.rs

use crate::error::{RitualError, RitualResult};
use crate::money::{self, Decimal};
use std::env;
use std::str::FromStr;

/// Environment variable overriding the base amount both skeletons start from.
pub const REFERENCE_AMOUNT_ENV: &str = "RITUAL_REFERENCE_AMOUNT";

/// Settings shared by the order and payment skeletons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingConfig {
  /// Amount returned by the base subtotal / obtain-value rule.
  pub reference_amount: Decimal,
}

impl Default for ProcessingConfig {
  fn default() -> Self {
    Self {
      reference_amount: money::reference_amount(),
    }
  }
}

impl ProcessingConfig {
  /// Reads the configuration from the process environment, falling back to
  /// defaults for unset variables.
  pub fn from_env() -> RitualResult<Self> {
    let mut config = Self::default();
    if let Ok(raw) = env::var(REFERENCE_AMOUNT_ENV) {
      config.reference_amount = parse_amount(REFERENCE_AMOUNT_ENV, &raw)?;
    }
    tracing::debug!(reference_amount = %config.reference_amount, "Processing configuration loaded.");
    Ok(config)
  }
}

fn parse_amount(key: &str, raw: &str) -> RitualResult<Decimal> {
  let amount = Decimal::from_str(raw.trim()).map_err(|e| RitualError::ConfigurationError {
    key: key.to_string(),
    message: format!("'{}' is not a decimal amount: {}", raw, e),
  })?;
  money::check_amount(key, amount)
}
