// vitrina-saga/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SagaError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in step handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Type mismatch during context downcast (expected {expected_type}, step: '{step_name}')")]
  TypeMismatch { step_name: String, expected_type: String },

  #[error("Configuration error for step '{step_name}': {message}")]
  ConfigurationError { step_name: String, message: String },

  #[error("Internal saga error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for SagaError {
  fn from(err: AnyhowError) -> Self {
    SagaError::HandlerError { source: err }
  }
}

pub type SagaErrorResult<T, E = SagaError> = std::result::Result<T, E>;
