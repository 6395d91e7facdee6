// tests/error_handling_tests.rs
mod common;
use common::*;
use ritual::{ContextData, Pipeline, PipelineControl, RitualError};

#[test]
fn test_pipeline_run_catches_handler_missing() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&["missing"]);
  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx);
  match result.err().unwrap() {
    TestError::Ritual(s) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("missing"));
    }
    other => panic!("Expected TestError::Ritual(HandlerMissing), got {:?}", other),
  }
}

// A pipeline whose error type IS RitualError.
#[test]
fn test_pipeline_with_ritual_error_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, RitualError>::new(&["task"]);

  pipeline.on_root("task", |ctx: ContextData<TestContext>| {
    ctx.write().counter = 1;
    Ok::<PipelineControl, RitualError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(TestContext::default());
  assert!(pipeline.run(ctx.clone()).is_ok());
  assert_eq!(ctx.read().counter, 1);

  let mut failing_pipeline = Pipeline::<TestContext, RitualError>::new(&["fail_task"]);
  failing_pipeline.on_root("fail_task", |_ctx: ContextData<TestContext>| {
    Err::<PipelineControl, _>(RitualError::Internal("Intentional RitualError".to_string()))
  });
  let fail_result = failing_pipeline.run(ContextData::new(TestContext::default()));
  match fail_result.err().unwrap() {
    RitualError::Internal(s) => assert_eq!(s, "Intentional RitualError"),
    other => panic!("Expected RitualError::Internal, got {:?}", other),
  }
}

// Handlers may fail with anyhow; the error lands in RitualError::HandlerError.
#[test]
fn test_anyhow_handler_error_converts() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, RitualError>::new(&["io"]);
  pipeline.on_root("io", |_ctx: ContextData<TestContext>| {
    Err::<PipelineControl, anyhow::Error>(anyhow::anyhow!("external system unavailable"))
  });

  match pipeline.run(ContextData::new(TestContext::default())).unwrap_err() {
    RitualError::HandlerError { source } => assert_eq!(source.to_string(), "external system unavailable"),
    other => panic!("Expected RitualError::HandlerError, got {:?}", other),
  }
}
