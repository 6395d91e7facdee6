// ritual/src/pipeline/mod.rs

//! Defines the generic step engine: the `Pipeline<TData, Err>` struct, handler
//! registration, and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Pipeline;
