// vitrina-saga/src/registry.rs

//! `SagaRegistry<E>`: a type-keyed registry of sagas. A saga is looked up by
//! the data type of the context it runs on, so each context type maps to at
//! most one saga.

use crate::core::context_data::ContextData;
use crate::core::control::SagaResult;
use crate::error::SagaError;
use crate::saga::definition::Saga;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased runner so sagas over different context types share one map.
#[async_trait]
trait AnySagaRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped saga's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<SagaResult, AppErr>;

  fn step_names(&self) -> Vec<String>;
}

struct SagaRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<StepErr> + From<SagaError> + Send + Sync + 'static,
{
  saga: Arc<Saga<TData, StepErr>>,
  _phantom: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, StepErr, AppErr> AnySagaRunner<AppErr> for SagaRunner<TData, StepErr, AppErr>
where
  TData: 'static + Send + Sync,
  StepErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<StepErr> + From<SagaError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<SagaResult, AppErr> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>();
        event!(Level::ERROR, "Context object type mismatch. Expected {}.", expected_type);
        return Err(AppErr::from(SagaError::TypeMismatch {
          step_name: "registry_dispatch".to_string(),
          expected_type: expected_type.to_string(),
        }));
      }
    };
    self.saga.run(typed_ctx_data).await.map_err(AppErr::from)
  }

  fn step_names(&self) -> Vec<String> {
    self.saga.step_names().into_iter().map(str::to_string).collect()
  }
}

/// Registry of sagas keyed by context data type.
///
/// `AppErr` is what `run` returns; it must absorb both the sagas' step error
/// types and `SagaError` (unknown context type, type mismatch).
pub struct SagaRegistry<AppErr = SagaError>
where
  AppErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn AnySagaRunner<AppErr>>>>,
}

impl<AppErr> SagaRegistry<AppErr>
where
  AppErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `saga` for its context data type `TData`, replacing any saga
  /// previously registered for that type.
  pub fn register_saga<TData, StepErr>(&self, saga: Saga<TData, StepErr>)
  where
    TData: 'static + Send + Sync,
    StepErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
    AppErr: From<StepErr>,
  {
    event!(
      Level::DEBUG,
      tdata_type = %std::any::type_name::<TData>(),
      steps = ?saga.step_names(),
      "Registering saga."
    );
    let runner = SagaRunner::<TData, StepErr, AppErr> {
      saga: Arc::new(saga),
      _phantom: PhantomData,
    };
    self.registry.write().insert(TypeId::of::<TData>(), Arc::new(runner));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Step names of the saga registered for `TData`, if any.
  pub fn step_names_for<TData: 'static>(&self) -> Option<Vec<String>> {
    self.registry.read().get(&TypeId::of::<TData>()).map(|runner| runner.step_names())
  }

  /// Runs the saga registered for `TData` against `ctx_data`.
  #[instrument(name = "SagaRegistry::run", skip_all, fields(tdata_type = %std::any::type_name::<TData>()))]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<SagaResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.registry.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, "No saga registered for TData type {}.", type_name);
      AppErr::from(SagaError::ConfigurationError {
        step_name: "SagaRegistry::run".to_string(),
        message: format!("No saga registered for TData type {}", type_name),
      })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for SagaRegistry<AppErr>
where
  AppErr: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
