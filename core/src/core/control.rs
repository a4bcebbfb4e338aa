// vitrina-saga/src/core/control.rs

//! Signals for controlling saga flow and the outcome of a saga run.

/// Signal from a step handler indicating whether the saga should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Continue with the remaining handlers of this step and the next steps.
  Continue,
  /// Halt the saga. No further handlers run and nothing is compensated.
  Stop,
}

/// Outcome of a saga run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaResult {
  /// Every non-skipped step ran to completion.
  Committed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}
