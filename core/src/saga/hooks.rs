// vitrina-saga/src/saga/hooks.rs

//! Registration of step handlers and compensators.

use crate::core::context::{Compensator, Handler};
use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::error::SagaError;
use crate::saga::definition::Saga;
use std::future::Future;
use tracing::{event, Level};

impl<TData, Err> Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order.
  ///
  /// The handler may return any error type convertible into the saga's `Err`.
  pub fn on_step<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_handler: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.on.entry(step_name.to_string()).or_default().push(final_handler);
  }

  /// Registers the compensator of `step_name`, run only when `step_name`
  /// completed and a later step failed. A step has at most one compensator;
  /// registering again replaces the previous one.
  pub fn compensate_step<F, UserErr>(
    &mut self,
    step_name: &str,
    compensator_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<(), UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let final_compensator: Compensator<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = compensator_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    if self.compensators.insert(step_name.to_string(), final_compensator).is_some() {
      event!(Level::WARN, %step_name, "Replaced an existing compensator.");
    }
  }
}
