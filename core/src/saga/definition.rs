// vitrina-saga/src/saga/definition.rs

//! `Saga<TData, Err>` definition and structural modification.

use crate::core::context::{Compensator, Handler};
use crate::core::step::StepDef;
use crate::error::SagaError;
use std::collections::HashMap;

/// An ordered set of named steps run against a `ContextData<TData>`.
///
/// `Err` is the error type returned by handlers and compensators. It must be
/// constructible from `SagaError` so framework failures (a non-optional step
/// without handlers, for instance) surface through the same type.
pub struct Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) compensators: HashMap<String, Compensator<TData, Err>>,
}

impl<TData, Err> Saga<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<SagaError> + Send + Sync + 'static,
{
  /// Creates a saga from `(step_name, optional)` pairs, in execution order.
  pub fn new(step_defs: &[(&str, bool)]) -> Self {
    let mut saga = Self {
      steps: Vec::with_capacity(step_defs.len()),
      on: HashMap::new(),
      compensators: HashMap::new(),
    };
    for (name, optional) in step_defs {
      saga.ensure_step_not_exists(name);
      saga.steps.push(StepDef::new(*name, *optional));
    }
    saga
  }

  /// Panics if the step is unknown. A typo in a step name is a setup bug, not a runtime error.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Saga setup error: Step '{}' not found in saga definition.", step_name);
    }
  }

  fn ensure_step_not_exists(&self, step_name: &str) {
    if self.steps.iter().any(|s| s.name == step_name) {
      panic!("Saga setup error: Step '{}' already exists in saga definition.", step_name);
    }
  }

  fn position_of(&self, step_name: &str) -> usize {
    self.ensure_step_exists(step_name);
    self.steps.iter().position(|s| s.name == step_name).unwrap_or(self.steps.len())
  }

  pub fn insert_before_step<S: Into<String>>(&mut self, existing_step_name: &str, new_step_name: S, optional: bool) {
    let idx = self.position_of(existing_step_name);
    let name: String = new_step_name.into();
    self.ensure_step_not_exists(&name);
    self.steps.insert(idx, StepDef::new(name, optional));
  }

  pub fn insert_after_step<S: Into<String>>(&mut self, existing_step_name: &str, new_step_name: S, optional: bool) {
    let idx = self.position_of(existing_step_name);
    let name: String = new_step_name.into();
    self.ensure_step_not_exists(&name);
    self.steps.insert(idx + 1, StepDef::new(name, optional));
  }

  /// Removes a step with its handlers and compensator. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.on.remove(step_name);
      self.compensators.remove(step_name);
    }
  }

  /// Panics if `step_name` is not part of the saga.
  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.position_of(step_name);
    if let Some(step) = self.steps.get_mut(idx) {
      step.optional = optional;
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_compensator(&self, step_name: &str) -> bool {
    self.compensators.contains_key(step_name)
  }
}
