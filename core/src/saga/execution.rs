// vitrina-saga/src/saga/execution.rs

//! `Saga::run()`: step execution and the compensation pass.

use crate::core::context_data::ContextData;
use crate::core::control::{SagaResult, StepControl};
use crate::error::SagaError;
use crate::saga::definition::Saga;
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// On the first failing handler, the compensators of the steps that already
  /// completed run newest-first, then the handler's error is returned. The
  /// failing step is not compensated. Compensator failures are logged and
  /// otherwise ignored.
  #[instrument(
    name = "Saga::run",
    skip_all,
    fields(
      saga_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<SagaResult, Err> {
    event!(Level::DEBUG, "Saga execution starting.");
    let mut completed: Vec<&str> = Vec::with_capacity(self.steps.len());

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(Level::INFO, "saga_step", step_name = step_name, step_index = step_idx);

      let handlers = match self.on.get(step_name).filter(|h| !h.is_empty()) {
        Some(handlers) => handlers,
        None if step_def.optional => {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        None => {
          event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
          self.compensate(&completed, &ctx_data).await;
          return Err(Err::from(SagaError::HandlerMissing {
            step_name: step_def.name.clone(),
          }));
        }
      };

      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        let handler_span = span!(parent: &step_span, Level::DEBUG, "on_handler", handler_index = handler_idx);
        match handler_fn(ctx_data.clone()).instrument(handler_span).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(parent: &step_span, Level::INFO, "Saga stopped by a step handler.");
            return Ok(SagaResult::Stopped);
          }
          Err(e) => {
            event!(parent: &step_span, Level::ERROR, error = %e, "Step handler failed.");
            self.compensate(&completed, &ctx_data).await;
            return Err(e);
          }
        }
      }

      event!(parent: &step_span, Level::DEBUG, "Step completed.");
      completed.push(step_name);
    }

    event!(Level::DEBUG, "Saga committed.");
    Ok(SagaResult::Committed)
  }

  async fn compensate(&self, completed: &[&str], ctx_data: &ContextData<TData>) {
    for step_name in completed.iter().rev() {
      let Some(compensator) = self.compensators.get(*step_name) else {
        continue;
      };
      let span = span!(Level::WARN, "saga_compensation", step_name = *step_name);
      event!(parent: &span, Level::WARN, "Compensating completed step.");
      if let Err(e) = compensator(ctx_data.clone()).instrument(span.clone()).await {
        event!(parent: &span, Level::ERROR, error = %e, "Compensator failed; continuing with earlier steps.");
      }
    }
  }
}
