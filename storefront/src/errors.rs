// vitrina/storefront/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use vitrina_saga::SagaError;

/// Every failure a request can end with. The `Display` text of the 4xx and
/// store variants is what the caller sees in the `error` field.
#[derive(Debug, Error)]
pub enum AppError {
  /// Carries the method the endpoint does accept.
  #[error("Método no permitido. Use {0}.")]
  MethodNotAllowed(&'static str),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  UnsupportedMediaType(String),

  #[error("Error en Storage: {0}")]
  StorageWriteFailed(String),

  #[error("Error en DB: {0}")]
  DatabaseWriteFailed(String),

  #[error("{0}")]
  ReadFailed(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Saga Error: {source}")]
  Saga {
    #[from]
    source: SagaError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(format!("{:#}", err))
  }
}

impl AppError {
  /// Message placed in the response body. Internal variants are not echoed
  /// back to the caller.
  pub fn client_message(&self) -> String {
    match self {
      AppError::Config(_) | AppError::Saga { .. } | AppError::Internal(_) => "Error interno del servidor.".to_string(),
      other => other.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      // The admin front-end only distinguishes 4xx from 5xx, so a rejected
      // image type is reported like any other malformed upload.
      AppError::BadRequest(_) | AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
      AppError::StorageWriteFailed(_)
      | AppError::DatabaseWriteFailed(_)
      | AppError::ReadFailed(_)
      | AppError::Config(_)
      | AppError::Saga { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let mut builder = HttpResponse::build(status);
    if let AppError::MethodNotAllowed(allowed) = self {
      builder.insert_header((header::ALLOW, *allowed));
    }
    builder.json(json!({ "error": self.client_message() }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
