// ritual/src/pipeline/definition.rs

//! Contains the `Pipeline<TData, Err>` struct definition and its construction.

use crate::core::context::Handler;
use crate::core::step::StepDef;
use crate::error::RitualError;
use std::collections::HashMap;

/// A fixed sequence of named steps, generic over the run data type `TData`
/// and the error type `Err` that its handlers return.
///
/// The step list is set once by `Pipeline::new` and cannot be changed afterwards;
/// only handlers can be attached. Both the order and the payment skeletons are
/// built on this type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RitualError> + Send + Sync + 'static,
{
  /// Ordered list of step definitions for this pipeline.
  pub(crate) steps: Vec<StepDef>,

  // Handlers for different phases of each step.
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RitualError> + Send + Sync + 'static,
{
  /// Creates a new `Pipeline` with the given step names, in execution order.
  ///
  /// Panics on a duplicate step name.
  pub fn new(step_names: &[&str]) -> Self {
    let mut pipeline = Self {
      steps: Vec::with_capacity(step_names.len()),
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    };
    for name in step_names {
      pipeline.ensure_step_not_exists(name);
      pipeline.steps.push(StepDef::new(*name));
    }
    pipeline
  }

  /// Ensures that a step with the given name exists in the pipeline. Panics if not found.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.has_step(step_name) {
      // Programming error (typo in a step name), not a RitualError.
      panic!("Ritual setup error: Step '{}' not found in pipeline definition.", step_name);
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.has_step(step_name) {
      panic!("Ritual setup error: Step '{}' already exists in pipeline definition.", step_name);
    }
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}

impl<TData, Err> std::fmt::Debug for Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RitualError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("steps", &self.step_names())
      .field("before_handlers", &self.before.values().map(Vec::len).sum::<usize>())
      .field("on_handlers", &self.on.values().map(Vec::len).sum::<usize>())
      .field("after_handlers", &self.after.values().map(Vec::len).sum::<usize>())
      .finish()
  }
}
