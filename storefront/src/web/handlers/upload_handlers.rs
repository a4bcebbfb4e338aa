// vitrina/storefront/src/web/handlers/upload_handlers.rs

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::future::join;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::password_header;
use crate::errors::AppError;
use crate::sagas::request_body::RequestBody;
use crate::sagas::upload_saga::run_upload;
use crate::state::AppState;

/// Multipart product upload. The payload is streamed into the saga and is
/// only read once the password has been accepted; `MAX_UPLOAD_BYTES` is
/// enforced while parsing.
#[instrument(name = "handler::upload", skip_all)]
pub async fn upload_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let content_type = req
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(str::to_string);

  let (body, feeder) = RequestBody::channel();
  let (outcome, ()) = join(
    run_upload(app_state.get_ref(), password_header(&req), content_type, body),
    feeder.forward(payload),
  )
  .await;
  match outcome.result {
    Ok(product) => {
      info!(id = product.id, state = ?outcome.state, "Product uploaded.");
      Ok(HttpResponse::Ok().json(json!({
        "message": "Producto subido y registrado exitosamente.",
        "titulo": product.titulo,
        "id": product.id,
      })))
    }
    Err(app_err) => {
      warn!(state = ?outcome.state, error = %app_err, "Upload failed.");
      Err(app_err)
    }
  }
}
