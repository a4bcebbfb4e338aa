// vitrina/storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use super::password_header;
use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_HEADER_MESSAGE: &str = "Falta el encabezado de contraseña.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Credenciales inválidas.";

/// Lets the admin page check a password before showing the panel.
#[instrument(name = "handler::auth", skip_all)]
pub async fn auth_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  let supplied = password_header(&req).ok_or_else(|| AppError::BadRequest(MISSING_HEADER_MESSAGE.to_string()))?;

  if !app_state.credentials.verify(&supplied) {
    return Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()));
  }
  info!("Admin authenticated.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Autenticación exitosa." })))
}
