// ritual/src/pipeline/execution.rs

//! Contains the `Pipeline::run()` method, responsible for executing the pipeline's steps and handlers.
//! The pipeline is `Pipeline<TData, Err>`, and `run` returns `Result<PipelineResult, Err>`.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::RitualError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Level};

/// Handler phases of a step, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn label(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<RitualError> + Send + Sync + 'static,
{
  /// Executes the pipeline against the given run context `ctx_data`.
  ///
  /// Steps run strictly in declaration order; within a step the `before`, `on`
  /// and `after` handlers run in that order, each list in registration order.
  /// A handler returning `PipelineControl::Stop` ends the run with
  /// `PipelineResult::Stopped`; a handler error ends it with that error.
  /// A step without any handler fails with `RitualError::HandlerMissing`,
  /// converted into `Err`.
  #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(
            pipeline_context_data_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name_str = step_def.name.as_str();

      let step_span = span!(
        Level::INFO,
        "pipeline_step_execution",
        step_name = step_name_str,
        step_index = step_idx
      );
      let _step_span_guard = step_span.enter();
      event!(Level::DEBUG, "Processing step.");

      let phases = [
        (Phase::Before, self.before.get(step_name_str)),
        (Phase::On, self.on.get(step_name_str)),
        (Phase::After, self.after.get(step_name_str)),
      ];

      if phases.iter().all(|(_, handlers)| handlers.map_or(true, |v| v.is_empty())) {
        event!(Level::ERROR, "Step has no handlers.");
        return Err(Err::from(RitualError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in phases {
        if let Some(handlers) = handlers {
          if run_phase(phase, handlers, &ctx_data)? == PipelineControl::Stop {
            return Ok(PipelineResult::Stopped);
          }
        }
      }
      event!(Level::DEBUG, "Step processing finished successfully.");
    }

    event!(Level::DEBUG, "Pipeline execution completed successfully.");
    Ok(PipelineResult::Completed)
  }
}

fn run_phase<TData, Err>(
  phase: Phase,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PipelineControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error,
{
  if handlers.is_empty() {
    return Ok(PipelineControl::Continue);
  }
  event!(Level::TRACE, phase = phase.label(), "Executing handlers.");
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = span!(Level::DEBUG, "step_handler", phase = phase.label(), handler_index = handler_idx);
    let _handler_span_guard = handler_span.enter();
    match handler_fn(ctx_data.clone()) {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::INFO, phase = phase.label(), "Pipeline stopped by a handler.");
        return Ok(PipelineControl::Stop);
      }
      Err(e) => {
        event!(Level::ERROR, phase = phase.label(), error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PipelineControl::Continue)
}
