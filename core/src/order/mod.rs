// ritual/src/order/mod.rs

//! Order processing: a four-step skeleton specialized by `National` and
//! `International`, with optional shipping and promotion policies.

pub mod pipeline;
pub mod variant;

pub use pipeline::{OrderPipeline, OrderPipelineBuilder, Receipt, ORDER_STEPS};
pub use variant::{International, National, OrderVariant};
