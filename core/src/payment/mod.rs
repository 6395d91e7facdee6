// ritual/src/payment/mod.rs

//! Payment processing: a six-step skeleton with an exchange policy and a fraud
//! gate, specialized by `Card`, `Pix` and `Boleto`.

pub mod method;
pub mod pipeline;

pub use method::{Boleto, Card, PaymentMethod, Pix};
pub use pipeline::{Confirmation, PaymentPipeline, PaymentPipelineBuilder, PAYMENT_STEPS};
