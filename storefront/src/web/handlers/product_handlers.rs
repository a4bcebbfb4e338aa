// vitrina/storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{error, instrument};

use super::password_header;
use crate::errors::AppError;
use crate::models::Projection;
use crate::sagas::common_steps::check_password;
use crate::state::AppState;

const READ_FALLBACK_MESSAGE: &str = "Error al obtener productos. Verifica la política RLS (READ).";

async fn list_products(app_state: &AppState, projection: Projection) -> Result<HttpResponse, AppError> {
  match app_state.catalog.list(projection).await {
    Ok(products) => Ok(HttpResponse::Ok().json(products)),
    Err(e) => {
      error!(error = %e, ?projection, "Catalog listing failed.");
      let message = e.to_string();
      Err(AppError::ReadFailed(if message.is_empty() {
        READ_FALLBACK_MESSAGE.to_string()
      } else {
        message
      }))
    }
  }
}

#[instrument(name = "handler::products_public", skip_all)]
pub async fn list_public_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  list_products(app_state.get_ref(), Projection::Public).await
}

/// Same listing plus `file_path`, which the admin panel needs to delete.
#[instrument(name = "handler::products_admin", skip_all)]
pub async fn list_admin_handler(app_state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
  if app_state.config.admin_list_requires_auth {
    check_password(&app_state.credentials, password_header(&req).as_deref())?;
  }
  list_products(app_state.get_ref(), Projection::Admin).await
}
