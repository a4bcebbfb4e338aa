// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use tracing::Level;
use vitrina_saga::{ContextData, Handler, SagaError, StepControl};

// --- Common Context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub steps_executed: Vec<String>,
  pub compensated: Vec<String>,
  pub should_stop_at: Option<String>,
}

// --- Common Error Type ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Saga framework error: {0}")]
  Saga(String),

  #[error("Test handler failed: {0}")]
  Handler(String),

  #[error("Test compensator failed: {0}")]
  Compensator(String),
}

impl From<SagaError> for TestError {
  fn from(se: SagaError) -> Self {
    TestError::Saga(format!("{:?}", se))
  }
}

// --- Handler creators ---
pub fn create_recording_handler(step_name: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn create_failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = %step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

/// Records the compensated step into the context and into `journal`, which
/// outlives the context so ordering across compensators can be asserted.
pub fn recording_compensator(
  step_name: &'static str,
  journal: Arc<Mutex<Vec<String>>>,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    let journal = journal.clone();
    Box::pin(async move {
      ctx.write().compensated.push(step_name.to_string());
      journal.lock().unwrap().push(step_name.to_string());
      Ok(())
    })
  }
}

// --- Tracing setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
