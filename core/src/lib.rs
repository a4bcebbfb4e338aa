// src/lib.rs

//! vitrina-saga: a small asynchronous saga engine.
//!
//! A saga is an ordered list of named steps run against a shared context:
//!  - Each step has one or more async `on` handlers.
//!  - A step may register a compensator that undoes its effect.
//!  - When a later step fails, the compensators of the steps that already
//!    completed run in reverse order, then the original error is returned.
//!  - Handlers can halt the saga early with `StepControl::Stop`.
//!  - A type-keyed registry runs the saga registered for a context type.

pub mod core;
pub mod error;
pub mod registry;
pub mod saga;

// --- Re-exports for the Public API ---

pub use crate::core::context::{Compensator, Handler};
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{SagaResult, StepControl};
pub use crate::core::step::StepDef;

pub use crate::saga::definition::Saga;

pub use crate::error::{SagaError, SagaErrorResult};

pub use crate::registry::SagaRegistry;

/*
    Typical use:
    1. Define the data struct `MyData` the saga operates on.
    2. `let mut saga = Saga::<MyData, MyError>::new(&[("reserve", false), ("commit", false)]);`
    3. `saga.on_step("reserve", |ctx| Box::pin(async move { ... }))` for every step.
    4. `saga.compensate_step("reserve", |ctx| Box::pin(async move { ... }))` for the
       steps whose effect must be undone if a later step fails.
    5. Register it: `registry.register_saga(saga)`.
    6. `registry.run(ContextData::new(my_data)).await` and read results back out of
       the context.
*/
