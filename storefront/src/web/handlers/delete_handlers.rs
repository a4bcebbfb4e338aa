// vitrina/storefront/src/web/handlers/delete_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use futures_util::future::join;
use serde_json::json;
use tracing::{info, instrument};

use super::password_header;
use crate::errors::AppError;
use crate::sagas::delete_saga::run_delete;
use crate::sagas::request_body::RequestBody;
use crate::state::AppState;

/// Takes the raw payload so nothing is read or parsed before authentication.
#[instrument(name = "handler::delete", skip_all)]
pub async fn delete_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  payload: web::Payload,
) -> Result<HttpResponse, AppError> {
  let (body, feeder) = RequestBody::channel();
  let (result, ()) = join(run_delete(app_state.get_ref(), password_header(&req), body), feeder.forward(payload)).await;
  let id = result?;
  info!(id, "Product deleted.");
  Ok(HttpResponse::Ok().json(json!({ "message": format!("Producto ID {} eliminado.", id) })))
}
