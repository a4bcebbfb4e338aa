// vitrina/storefront/src/web/handlers/mod.rs

use crate::errors::AppError;
use crate::services::credentials::PASSWORD_HEADER;
use actix_web::HttpRequest;

pub mod auth_handlers;
pub mod delete_handlers;
pub mod health_handlers;
pub mod product_handlers;
pub mod upload_handlers;

/// Value of the admin password header. Empty or non-UTF-8 values count as absent.
pub fn password_header(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(PASSWORD_HEADER)
    .and_then(|v| v.to_str().ok())
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

pub async fn method_not_allowed_post() -> Result<actix_web::HttpResponse, AppError> {
  Err(AppError::MethodNotAllowed("POST"))
}

pub async fn method_not_allowed_get() -> Result<actix_web::HttpResponse, AppError> {
  Err(AppError::MethodNotAllowed("GET"))
}
