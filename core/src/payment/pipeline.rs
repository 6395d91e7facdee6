// ritual/src/payment/pipeline.rs

//! The payment skeleton:
//! validate → obtain_value → apply_exchange → fraud_check → authorize_or_capture → confirm.
//!
//! `fraud_check` is the only step that can end a run early. On rejection its
//! handler returns `PipelineControl::Stop`, the engine reports
//! `PipelineResult::Stopped`, and `process()` turns that into
//! `RitualError::PolicyRejection`.

use crate::config::ProcessingConfig;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::{RitualError, RitualResult};
use crate::money::{self, Decimal};
use crate::payment::method::PaymentMethod;
use crate::pipeline::Pipeline;
use crate::policy::{self, AdjustmentPolicy, FraudPolicy};
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub const VALIDATE: &str = "validate";
pub const OBTAIN_VALUE: &str = "obtain_value";
pub const APPLY_EXCHANGE: &str = "apply_exchange";
pub const FRAUD_CHECK: &str = "fraud_check";
pub const AUTHORIZE_OR_CAPTURE: &str = "authorize_or_capture";
pub const CONFIRM: &str = "confirm";

/// Key reported when the builder was given an unusable base amount.
const BASE_AMOUNT_KEY: &str = "base_amount";

/// Step order shared by every payment method.
pub const PAYMENT_STEPS: [&str; 6] = [VALIDATE, OBTAIN_VALUE, APPLY_EXCHANGE, FRAUD_CHECK, AUTHORIZE_OR_CAPTURE, CONFIRM];

/// State of one payment run, shared by the step handlers.
#[derive(Debug, Clone, Default)]
pub(crate) struct PaymentRunData {
  pub(crate) value: Option<Decimal>,
  pub(crate) exchanged: Option<Decimal>,
  processed_value: Option<Decimal>,
  pub(crate) authorization: Option<String>,
  pub(crate) confirmation: Option<String>,
  pub(crate) steps_executed: Vec<&'static str>,
}

impl PaymentRunData {
  /// The value approved by the fraud gate. Set once per run.
  pub(crate) fn processed_value(&self) -> RitualResult<Decimal> {
    required(self.processed_value, "processed value")
  }

  fn record_processed_value(&mut self, value: Decimal) -> RitualResult<()> {
    if self.processed_value.is_some() {
      return Err(RitualError::Internal("processed value already recorded for this run".to_string()));
    }
    self.processed_value = Some(value);
    Ok(())
  }
}

/// The outcome of a completed payment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
  pub method: &'static str,
  /// Post-exchange value approved by the fraud gate.
  pub processed_value: Decimal,
  /// Notice produced by the authorization step, if the method emits one.
  pub authorization: Option<String>,
  pub text: String,
}

impl fmt::Display for Confirmation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

#[derive(Clone, Default)]
struct PaymentPolicies {
  exchange: Option<AdjustmentPolicy>,
  fraud_check: Option<FraudPolicy>,
}

/// Value rule shared by all methods.
fn obtain_value(base_amount: Decimal) -> Decimal {
  base_amount
}

/// Checks every payment gets regardless of method.
fn base_validate(method: &dyn PaymentMethod, base_amount: Decimal) -> RitualResult<()> {
  event!(Level::TRACE, method = method.name(), %base_amount, "Base payment validation.");
  money::check_amount(BASE_AMOUNT_KEY, base_amount)?;
  Ok(())
}

fn required<T>(value: Option<T>, what: &str) -> RitualResult<T> {
  value.ok_or_else(|| RitualError::Internal(format!("{} missing from payment run", what)))
}

/// A payment pipeline bound to one method and its policies.
///
/// Policies are fixed when the pipeline is built; there is no way to rebind
/// them afterwards. Every `process()` call starts from a fresh run.
pub struct PaymentPipeline {
  method: Arc<dyn PaymentMethod>,
  base_amount: Decimal,
  skeleton: Pipeline<PaymentRunData, RitualError>,
}

impl PaymentPipeline {
  /// Pipeline for `method` with no policies bound: identity exchange, approve-all fraud check.
  pub fn new<M: PaymentMethod + 'static>(method: M) -> Self {
    Self::builder(method).build()
  }

  pub fn builder<M: PaymentMethod + 'static>(method: M) -> PaymentPipelineBuilder {
    Self::builder_for(Arc::new(method))
  }

  /// Builder for an already type-erased method.
  pub fn builder_for(method: Arc<dyn PaymentMethod>) -> PaymentPipelineBuilder {
    PaymentPipelineBuilder {
      method,
      base_amount: money::reference_amount(),
      policies: PaymentPolicies::default(),
    }
  }

  pub fn method_name(&self) -> &'static str {
    self.method.name()
  }

  pub fn base_amount(&self) -> Decimal {
    self.base_amount
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.skeleton.step_names()
  }

  /// Runs the six payment steps.
  ///
  /// Returns `Err(RitualError::PolicyRejection)` when the fraud gate rejects
  /// the post-exchange value; authorization and confirmation do not run then.
  #[instrument(
        name = "PaymentPipeline::process",
        skip(self),
        fields(method = self.method.name()),
        err(Display)
    )]
  pub fn process(&self) -> RitualResult<Confirmation> {
    let (run, result) = self.run()?;
    if result == PipelineResult::Stopped {
      return Err(RitualError::PolicyRejection);
    }
    let confirmation = Confirmation {
      method: self.method.name(),
      processed_value: run.processed_value()?,
      authorization: run.authorization,
      text: required(run.confirmation, "confirmation")?,
    };
    event!(Level::DEBUG, processed_value = %confirmation.processed_value, "Payment processed.");
    Ok(confirmation)
  }

  pub(crate) fn run(&self) -> RitualResult<(PaymentRunData, PipelineResult)> {
    let ctx = ContextData::new(PaymentRunData::default());
    let result = self.skeleton.run(ctx.clone())?;
    Ok((ctx.into_inner(), result))
  }
}

impl fmt::Debug for PaymentPipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PaymentPipeline")
      .field("method", &self.method)
      .field("base_amount", &self.base_amount)
      .field("skeleton", &self.skeleton)
      .finish()
  }
}

/// Collects the method, base amount and policies; consumed by `build()`.
pub struct PaymentPipelineBuilder {
  method: Arc<dyn PaymentMethod>,
  base_amount: Decimal,
  policies: PaymentPolicies,
}

impl PaymentPipelineBuilder {
  pub fn config(mut self, config: &ProcessingConfig) -> Self {
    self.base_amount = config.reference_amount;
    self
  }

  pub fn base_amount(mut self, amount: Decimal) -> Self {
    self.base_amount = amount;
    self
  }

  pub fn exchange(self, f: impl Fn(Decimal) -> Decimal + Send + Sync + 'static) -> Self {
    self.exchange_policy(Arc::new(f))
  }

  pub fn exchange_policy(mut self, policy: AdjustmentPolicy) -> Self {
    self.policies.exchange = Some(policy);
    self
  }

  pub fn fraud_check(self, f: impl Fn(Decimal) -> bool + Send + Sync + 'static) -> Self {
    self.fraud_policy(Arc::new(f))
  }

  pub fn fraud_policy(mut self, policy: FraudPolicy) -> Self {
    self.policies.fraud_check = Some(policy);
    self
  }

  pub fn build(self) -> PaymentPipeline {
    let PaymentPipelineBuilder {
      method,
      base_amount,
      policies,
    } = self;
    event!(
      Level::DEBUG,
      method = method.name(),
      %base_amount,
      exchange_bound = policies.exchange.is_some(),
      fraud_check_bound = policies.fraud_check.is_some(),
      "Building payment pipeline."
    );

    let mut skeleton = Pipeline::<PaymentRunData, RitualError>::new(&PAYMENT_STEPS);

    let base_method = method.clone();
    skeleton.before_root(VALIDATE, move |_ctx: ContextData<PaymentRunData>| {
      base_validate(base_method.as_ref(), base_amount)?;
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let validate_method = method.clone();
    skeleton.on_root(VALIDATE, move |ctx: ContextData<PaymentRunData>| {
      validate_method.validate()?;
      ctx.write().steps_executed.push(VALIDATE);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    skeleton.on_root(OBTAIN_VALUE, move |ctx: ContextData<PaymentRunData>| {
      let mut guard = ctx.write();
      guard.value = Some(obtain_value(base_amount));
      guard.steps_executed.push(OBTAIN_VALUE);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let exchange = policies.exchange;
    skeleton.on_root(APPLY_EXCHANGE, move |ctx: ContextData<PaymentRunData>| {
      let value = required(ctx.read().value, "value")?;
      let exchanged = policy::adjust(exchange.as_ref(), value);
      event!(Level::DEBUG, %value, %exchanged, "Exchange applied.");
      let mut guard = ctx.write();
      guard.exchanged = Some(exchanged);
      guard.steps_executed.push(APPLY_EXCHANGE);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let fraud_check = policies.fraud_check;
    skeleton.on_root(FRAUD_CHECK, move |ctx: ContextData<PaymentRunData>| {
      let exchanged = required(ctx.read().exchanged, "exchanged value")?;
      ctx.write().steps_executed.push(FRAUD_CHECK);
      if !policy::approve(fraud_check.as_ref(), exchanged) {
        event!(Level::INFO, value = %exchanged, "Payment blocked by fraud policy.");
        return Ok::<_, RitualError>(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    });

    // Only reached when the gate approved.
    skeleton.after_root(FRAUD_CHECK, move |ctx: ContextData<PaymentRunData>| {
      let mut guard = ctx.write();
      let exchanged = required(guard.exchanged, "exchanged value")?;
      guard.record_processed_value(exchanged)?;
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let authorize_method = method.clone();
    skeleton.on_root(AUTHORIZE_OR_CAPTURE, move |ctx: ContextData<PaymentRunData>| {
      let processed_value = ctx.read().processed_value()?;
      let authorization = authorize_method.authorize_or_capture(processed_value);
      let mut guard = ctx.write();
      guard.authorization = authorization;
      guard.steps_executed.push(AUTHORIZE_OR_CAPTURE);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let confirm_method = method.clone();
    skeleton.on_root(CONFIRM, move |ctx: ContextData<PaymentRunData>| {
      let processed_value = ctx.read().processed_value()?;
      let confirmation = confirm_method.confirm(processed_value);
      let mut guard = ctx.write();
      guard.confirmation = Some(confirmation);
      guard.steps_executed.push(CONFIRM);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    PaymentPipeline {
      method,
      base_amount,
      skeleton,
    }
  }
}
