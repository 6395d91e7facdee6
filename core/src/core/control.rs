// ritual/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a pipeline run.

/// Signal from a handler indicating whether the pipeline should continue or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Continue with the remaining handlers of the current step and the steps after it.
  Continue,
  /// Halt the pipeline immediately.
  /// No further handlers in the current step or subsequent steps will be executed.
  /// The fraud gate uses this to block a payment.
  Stop,
}

/// Outcome of a full pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran to completion.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}

impl PipelineResult {
  pub fn is_completed(&self) -> bool {
    matches!(self, PipelineResult::Completed)
  }
}
