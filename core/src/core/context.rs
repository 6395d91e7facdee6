// ritual/src/core/context.rs

//! Defines the `Handler<TData, Err>` type for pipeline step handlers, operating on `ContextData<TData>`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;

/// Type alias for a pipeline step handler.
///
/// A handler is a synchronous function that receives a handle to the run's
/// `ContextData<TData>` (a clone of the shared `Arc`) and returns
/// `Result<PipelineControl, Err>`.
///
/// Handlers are responsible for:
/// 1. Acquiring locks (`.read()` or `.write()`) on the `ContextData` to access or modify state.
/// 2. Dropping the guard before calling back into anything that locks the same context.
/// 3. Returning `PipelineControl::Continue` to proceed or `PipelineControl::Stop` to halt the pipeline.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> Result<PipelineControl, Err> + Send + Sync>;
