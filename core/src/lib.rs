// src/lib.rs

//! Ritual: fixed-skeleton processing pipelines specialized along two axes.
//!
//! Every pipeline family runs one fixed, ordered sequence of steps. Two things
//! can vary without touching that sequence:
//!  - The variant, a small capability object (`OrderVariant`, `PaymentMethod`)
//!    that supplies step-specific behaviour: tax rules, receipt labels,
//!    authorization and confirmation.
//!  - Policies, plain functions bound once at construction: shipping and
//!    promotion for orders, exchange and the fraud gate for payments.
//!
//! Both families are built on a small synchronous step engine (`Pipeline`)
//! with named steps and before/on/after handlers.

pub mod config;
pub mod core;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod pipeline;
pub mod policy;

// --- Re-exports for the Public API ---

// Step engine
pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::StepDef;
pub use crate::pipeline::definition::Pipeline;

pub use crate::config::ProcessingConfig;
pub use crate::error::{RitualError, RitualResult};
pub use crate::money::Decimal;
pub use crate::policy::{AdjustmentPolicy, FraudPolicy};

// Pipeline families
pub use crate::order::{International, National, OrderPipeline, OrderPipelineBuilder, OrderVariant, Receipt};
pub use crate::payment::{Boleto, Card, Confirmation, PaymentMethod, PaymentPipeline, PaymentPipelineBuilder, Pix};

/*
    Typical use:
    1. Pick a variant: `National`, `International`, `Card`, `Pix` or `Boleto`.
    2. Bind policies through the builder, e.g.
       `OrderPipeline::builder(International).shipping(|v| v + fee).promotion(|v| v - coupon).build()`.
    3. Call `process()`. Orders yield a `Receipt`; payments yield a `Confirmation`
       or `RitualError::PolicyRejection` when the fraud gate blocks the run.
*/
