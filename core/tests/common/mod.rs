// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use ritual::{ContextData, Decimal, PipelineControl, RitualError};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};
use tracing::Level;

// --- Common Context Struct for engine tests ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Ritual engine error: {0}")]
  Ritual(String), // Store as String for Eq comparison

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<RitualError> for TestError {
  fn from(re: RitualError) -> Self {
    TestError::Ritual(format!("{:?}", re))
  }
}

// --- Common Handler Creators ---
pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> ritual::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| -> Result<PipelineControl, TestError> {
    let mut guard = ctx.write();
    guard.counter += 1;
    guard.message.push_str(message_to_append);
    guard.steps_executed.push(step_name.to_string());
    tracing::debug!(target: "test_handlers", step = %step_name, "executed, counter: {}, message: '{}'", guard.counter, guard.message);
    if guard.should_stop_at.as_deref() == Some(step_name) {
      return Ok(PipelineControl::Stop);
    }
    Ok(PipelineControl::Continue)
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> ritual::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    ctx.write().steps_executed.push(step_name.to_string());
    tracing::warn!(target: "test_handlers", step = %step_name, "failing with: '{}'", error_message);
    Err(TestError::Handler(error_message.to_string()))
  })
}

// --- Policy spies for the order and payment pipelines ---

/// Records every amount a policy was called with.
#[derive(Clone, Default)]
pub struct PolicySpy {
  seen: Arc<Mutex<Vec<Decimal>>>,
  calls: Arc<AtomicUsize>,
}

impl PolicySpy {
  pub fn adjustment(&self, f: impl Fn(Decimal) -> Decimal + Send + Sync + 'static) -> ritual::AdjustmentPolicy {
    let spy = self.clone();
    Arc::new(move |amount| {
      spy.record(amount);
      f(amount)
    })
  }

  pub fn fraud(&self, f: impl Fn(Decimal) -> bool + Send + Sync + 'static) -> ritual::FraudPolicy {
    let spy = self.clone();
    Arc::new(move |amount| {
      spy.record(amount);
      f(amount)
    })
  }

  fn record(&self, amount: Decimal) {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.seen.lock().unwrap().push(amount);
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn seen(&self) -> Vec<Decimal> {
    self.seen.lock().unwrap().clone()
  }
}

pub fn dec(value: &str) -> Decimal {
  value.parse().unwrap()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
