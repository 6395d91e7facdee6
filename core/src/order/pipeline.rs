// ritual/src/order/pipeline.rs

//! The order skeleton: validate → compute_subtotal → apply_policies → emit_receipt.

use crate::config::ProcessingConfig;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::{RitualError, RitualResult};
use crate::money::{self, Decimal};
use crate::order::variant::OrderVariant;
use crate::pipeline::Pipeline;
use crate::policy::{self, AdjustmentPolicy};
use std::fmt;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub const VALIDATE: &str = "validate";
pub const COMPUTE_SUBTOTAL: &str = "compute_subtotal";
pub const APPLY_POLICIES: &str = "apply_policies";
pub const EMIT_RECEIPT: &str = "emit_receipt";

/// Key reported when the builder was given an unusable base amount.
const BASE_AMOUNT_KEY: &str = "base_amount";

/// Step order shared by every order variant.
pub const ORDER_STEPS: [&str; 4] = [VALIDATE, COMPUTE_SUBTOTAL, APPLY_POLICIES, EMIT_RECEIPT];

/// State of one order run, shared by the step handlers.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderRunData {
  pub(crate) subtotal: Option<Decimal>,
  pub(crate) total: Option<Decimal>,
  pub(crate) receipt: Option<String>,
  pub(crate) steps_executed: Vec<&'static str>,
}

/// The outcome of a completed order run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
  pub variant: &'static str,
  /// Subtotal after the variant delta, before policies.
  pub subtotal: Decimal,
  /// Amount after shipping and promotion.
  pub total: Decimal,
  pub text: String,
}

impl fmt::Display for Receipt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

/// Policy slots of the order skeleton, applied shipping first, then promotion.
#[derive(Clone, Default)]
struct OrderPolicies {
  shipping: Option<AdjustmentPolicy>,
  promotion: Option<AdjustmentPolicy>,
}

impl OrderPolicies {
  fn apply(&self, subtotal: Decimal) -> Decimal {
    let after_shipping = policy::adjust(self.shipping.as_ref(), subtotal);
    policy::adjust(self.promotion.as_ref(), after_shipping)
  }
}

/// Base subtotal rule every variant builds on.
fn base_subtotal(base_amount: Decimal) -> Decimal {
  base_amount
}

/// Checks every order gets regardless of variant.
fn base_validate(variant: &dyn OrderVariant, base_amount: Decimal) -> RitualResult<()> {
  event!(Level::TRACE, variant = variant.name(), %base_amount, "Base order validation.");
  money::check_amount(BASE_AMOUNT_KEY, base_amount)?;
  Ok(())
}

fn required<T>(value: Option<T>, what: &str) -> RitualResult<T> {
  value.ok_or_else(|| RitualError::Internal(format!("{} missing from order run", what)))
}

/// An order pipeline bound to one variant and its policies.
///
/// Policies are fixed when the pipeline is built; there is no way to rebind
/// them afterwards. Every `process()` call starts from a fresh run.
pub struct OrderPipeline {
  variant: Arc<dyn OrderVariant>,
  base_amount: Decimal,
  skeleton: Pipeline<OrderRunData, RitualError>,
}

impl OrderPipeline {
  /// Pipeline for `variant` with no policies bound and the reference base amount.
  pub fn new<V: OrderVariant + 'static>(variant: V) -> Self {
    Self::builder(variant).build()
  }

  pub fn builder<V: OrderVariant + 'static>(variant: V) -> OrderPipelineBuilder {
    Self::builder_for(Arc::new(variant))
  }

  /// Builder for an already type-erased variant.
  pub fn builder_for(variant: Arc<dyn OrderVariant>) -> OrderPipelineBuilder {
    OrderPipelineBuilder {
      variant,
      base_amount: money::reference_amount(),
      policies: OrderPolicies::default(),
    }
  }

  pub fn variant_name(&self) -> &'static str {
    self.variant.name()
  }

  pub fn base_amount(&self) -> Decimal {
    self.base_amount
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.skeleton.step_names()
  }

  /// Runs the four order steps and returns the receipt.
  #[instrument(
        name = "OrderPipeline::process",
        skip(self),
        fields(variant = self.variant.name()),
        err(Display)
    )]
  pub fn process(&self) -> RitualResult<Receipt> {
    let (run, result) = self.run()?;
    if !result.is_completed() {
      return Err(RitualError::Internal("order pipeline stopped before emitting a receipt".to_string()));
    }
    let receipt = Receipt {
      variant: self.variant.name(),
      subtotal: required(run.subtotal, "subtotal")?,
      total: required(run.total, "total")?,
      text: required(run.receipt, "receipt")?,
    };
    event!(Level::DEBUG, total = %receipt.total, "Order processed.");
    Ok(receipt)
  }

  pub(crate) fn run(&self) -> RitualResult<(OrderRunData, PipelineResult)> {
    let ctx = ContextData::new(OrderRunData::default());
    let result = self.skeleton.run(ctx.clone())?;
    Ok((ctx.into_inner(), result))
  }
}

impl fmt::Debug for OrderPipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OrderPipeline")
      .field("variant", &self.variant)
      .field("base_amount", &self.base_amount)
      .field("skeleton", &self.skeleton)
      .finish()
  }
}

/// Collects the variant, base amount and policies; consumed by `build()`.
pub struct OrderPipelineBuilder {
  variant: Arc<dyn OrderVariant>,
  base_amount: Decimal,
  policies: OrderPolicies,
}

impl OrderPipelineBuilder {
  pub fn config(mut self, config: &ProcessingConfig) -> Self {
    self.base_amount = config.reference_amount;
    self
  }

  pub fn base_amount(mut self, amount: Decimal) -> Self {
    self.base_amount = amount;
    self
  }

  pub fn shipping(self, f: impl Fn(Decimal) -> Decimal + Send + Sync + 'static) -> Self {
    self.shipping_policy(Arc::new(f))
  }

  pub fn shipping_policy(mut self, policy: AdjustmentPolicy) -> Self {
    self.policies.shipping = Some(policy);
    self
  }

  pub fn promotion(self, f: impl Fn(Decimal) -> Decimal + Send + Sync + 'static) -> Self {
    self.promotion_policy(Arc::new(f))
  }

  pub fn promotion_policy(mut self, policy: AdjustmentPolicy) -> Self {
    self.policies.promotion = Some(policy);
    self
  }

  pub fn build(self) -> OrderPipeline {
    let OrderPipelineBuilder {
      variant,
      base_amount,
      policies,
    } = self;
    event!(
      Level::DEBUG,
      variant = variant.name(),
      %base_amount,
      shipping_bound = policies.shipping.is_some(),
      promotion_bound = policies.promotion.is_some(),
      "Building order pipeline."
    );

    let mut skeleton = Pipeline::<OrderRunData, RitualError>::new(&ORDER_STEPS);

    let base_variant = variant.clone();
    skeleton.before_root(VALIDATE, move |_ctx: ContextData<OrderRunData>| {
      base_validate(base_variant.as_ref(), base_amount)?;
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let validate_variant = variant.clone();
    skeleton.on_root(VALIDATE, move |ctx: ContextData<OrderRunData>| {
      validate_variant.validate()?;
      ctx.write().steps_executed.push(VALIDATE);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let subtotal_variant = variant.clone();
    skeleton.on_root(COMPUTE_SUBTOTAL, move |ctx: ContextData<OrderRunData>| {
      let subtotal = subtotal_variant.adjust_subtotal(base_subtotal(base_amount));
      event!(Level::DEBUG, %subtotal, "Subtotal computed.");
      let mut guard = ctx.write();
      guard.subtotal = Some(subtotal);
      guard.steps_executed.push(COMPUTE_SUBTOTAL);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    skeleton.on_root(APPLY_POLICIES, move |ctx: ContextData<OrderRunData>| {
      let subtotal = required(ctx.read().subtotal, "subtotal")?;
      let total = policies.apply(subtotal);
      event!(Level::DEBUG, %subtotal, %total, "Policies applied.");
      let mut guard = ctx.write();
      guard.total = Some(total);
      guard.steps_executed.push(APPLY_POLICIES);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    let receipt_variant = variant.clone();
    skeleton.on_root(EMIT_RECEIPT, move |ctx: ContextData<OrderRunData>| {
      let total = required(ctx.read().total, "total")?;
      let receipt = receipt_variant.emit_receipt(total);
      let mut guard = ctx.write();
      guard.receipt = Some(receipt);
      guard.steps_executed.push(EMIT_RECEIPT);
      Ok::<_, RitualError>(PipelineControl::Continue)
    });

    OrderPipeline {
      variant,
      base_amount,
      skeleton,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::order::variant::{International, National};

  #[derive(Debug)]
  struct Refusing;

  impl OrderVariant for Refusing {
    fn name(&self) -> &'static str {
      "Refusing"
    }

    fn validate(&self) -> RitualResult<()> {
      Err(anyhow::anyhow!("missing export licence").into())
    }
  }

  #[test]
  fn every_variant_runs_the_same_steps() {
    for pipeline in [OrderPipeline::new(National), OrderPipeline::new(International)] {
      let (run, result) = pipeline.run().unwrap();
      assert_eq!(result, PipelineResult::Completed);
      assert_eq!(run.steps_executed, ORDER_STEPS.to_vec());
      assert_eq!(pipeline.step_names(), ORDER_STEPS.to_vec());
    }
  }

  #[test]
  fn run_state_is_fresh_per_call() {
    let pipeline = OrderPipeline::new(National);
    let (first, _) = pipeline.run().unwrap();
    let (second, _) = pipeline.run().unwrap();
    assert_eq!(first.steps_executed.len(), 4);
    assert_eq!(second.steps_executed.len(), 4);
    assert_eq!(first.total, second.total);
  }

  #[test]
  fn failing_validation_stops_before_subtotal() {
    let pipeline = OrderPipeline::new(Refusing);
    let err = pipeline.process().unwrap_err();
    match err {
      RitualError::HandlerError { source } => assert_eq!(source.to_string(), "missing export licence"),
      other => panic!("Expected HandlerError, got {:?}", other),
    }
  }

  #[test]
  fn policies_apply_shipping_then_promotion() {
    let policies = OrderPolicies {
      shipping: Some(Arc::new(|d| d * Decimal::TWO)),
      promotion: Some(Arc::new(|d| d - Decimal::ONE)),
    };
    assert_eq!(policies.apply(Decimal::TEN), Decimal::new(19, 0));
    assert_eq!(OrderPolicies::default().apply(Decimal::TEN), Decimal::TEN);
  }
}
