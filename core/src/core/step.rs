// ritual/src/core/step.rs

//! Defines a single named step within a pipeline skeleton.

/// Definition of a pipeline step.
///
/// Skeleton steps are fixed once the pipeline is built: there is no way to skip,
/// reorder or remove them, which is what keeps every variant of a family on the
/// same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDef {
  pub name: String,
}

impl StepDef {
  pub fn new<S: Into<String>>(name: S) -> Self {
    Self { name: name.into() }
  }
}
