// ritual/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RitualError {
  /// The fraud-check gate rejected the payment. Carries no further detail.
  #[error("payment blocked by fraud policy")]
  PolicyRejection,

  #[error("Handler missing for step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in variant hook or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for '{key}': {message}")]
  ConfigurationError { key: String, message: String },

  #[error("Internal pipeline error: {0}")]
  Internal(String),
}

impl RitualError {
  /// True when the run was halted by the fraud gate.
  pub fn is_policy_rejection(&self) -> bool {
    matches!(self, RitualError::PolicyRejection)
  }
}

// Lets variant hooks use `?` on anything anyhow can carry.
impl From<AnyhowError> for RitualError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<RitualError>() {
      Ok(ritual_err) => ritual_err,
      Err(err) => RitualError::HandlerError { source: err },
    }
  }
}

pub type RitualResult<T, E = RitualError> = std::result::Result<T, E>;
