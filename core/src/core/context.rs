// vitrina-saga/src/core/context.rs

//! Boxed handler types stored by a `Saga`.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler: takes a clone of the saga context and resolves to a
/// `StepControl` or the saga's error type.
///
/// Handlers acquire `.read()`/`.write()` guards on the context to exchange
/// state with other steps and must drop them before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>> + Send + Sync,
>;

/// A compensator: undoes the effect of a completed step after a later step
/// failed. Its error is logged by the saga and never returned to the caller.
pub type Compensator<TData, Err> =
  Box<dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<(), Err>> + Send>> + Send + Sync>;
