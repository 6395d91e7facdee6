// ritual/src/pipeline/hooks.rs

//! Methods for registering `before`, `on`, and `after` handlers for pipeline steps.
//! Handlers for `Pipeline<TData, Err>` operate on `ContextData<TData>` and return `Result<_, Err>`.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::RitualError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use tracing::{event, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RitualError> + Send + Sync + 'static,
{
  /// Registers a `before` hook for a given step.
  ///
  /// `UserProvidedErr` must be convertible into the pipeline's `Err` type.
  pub fn before_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) where
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = wrap_handler(handler_fn);
    push_handler(&mut self.before, step_name, handler);
    event!(Level::TRACE, %step_name, "'before' handler registered.");
  }

  /// Registers an `on` hook for a given step.
  /// (Similar to `before_root` regarding error types).
  pub fn on_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) where
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = wrap_handler(handler_fn);
    push_handler(&mut self.on, step_name, handler);
    event!(Level::TRACE, %step_name, "'on' handler registered.");
  }

  /// Registers an `after` hook for a given step.
  /// (Similar to `before_root` regarding error types).
  pub fn after_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) where
    UserProvidedErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = wrap_handler(handler_fn);
    push_handler(&mut self.after, step_name, handler);
    event!(Level::TRACE, %step_name, "'after' handler registered.");
  }
}

fn wrap_handler<TData, Err, UserProvidedErr>(
  handler_fn: impl Fn(ContextData<TData>) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  UserProvidedErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| handler_fn(ctx_data).map_err(Into::into))
}

fn push_handler<TData, Err>(phase: &mut HashMap<String, Vec<Handler<TData, Err>>>, step_name: &str, handler: Handler<TData, Err>)
where
  TData: 'static + Send + Sync,
{
  phase.entry(step_name.to_string()).or_default().push(handler);
}
