// vitrina-saga/src/saga/mod.rs

//! The `Saga<TData, Err>` type: construction, handler registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Saga;
