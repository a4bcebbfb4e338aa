// vitrina/storefront/src/sagas/delete_saga.rs

//! Product delete: authenticate, validate the body, remove the image (a
//! missing image is fine), delete the row. Nothing is compensated.

use crate::errors::{AppError, Result as AppResult};
use crate::sagas::common_steps::check_password;
use crate::sagas::contexts::{BlobRemoval, DeleteCtxData, DeleteTarget};
use crate::sagas::request_body::RequestBody;
use crate::state::AppState;
use serde::Deserialize;
use tracing::{event, instrument, warn, Level};
use vitrina_saga::{ContextData, Saga, SagaRegistry, SagaResult, StepControl};

pub const DELETE_STEPS: [&str; 4] = ["authenticate", "validate_request", "remove_blob", "delete_record"];

pub const MISSING_PARAMS_MESSAGE: &str = "Faltan parámetros: ID y ruta del archivo (file_path).";
pub const INVALID_JSON_MESSAGE: &str = "Cuerpo JSON inválido.";

/// Upper bound on a delete body; a valid one is a few dozen bytes.
pub const MAX_DELETE_BODY_BYTES: usize = 64 * 1024;

/// `id` arrives as a number from the admin page, but a numeric string is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
  Number(i64),
  Text(String),
}

#[derive(Debug, Deserialize)]
struct DeletePayload {
  #[serde(default)]
  id: Option<IdValue>,
  #[serde(default)]
  file_path: Option<String>,
}

/// Parses and checks the delete body. An `id` of 0 counts as missing.
pub fn parse_delete_target(body: &[u8]) -> AppResult<DeleteTarget> {
  let payload: DeletePayload = serde_json::from_slice(body).map_err(|e| {
    event!(Level::DEBUG, error = %e, "Delete body is not valid JSON.");
    AppError::BadRequest(INVALID_JSON_MESSAGE.to_string())
  })?;

  let id = match payload.id {
    Some(IdValue::Number(id)) => Some(id),
    Some(IdValue::Text(text)) => text.trim().parse::<i64>().ok(),
    None => None,
  }
  .filter(|id| *id != 0);
  let file_path = payload.file_path.filter(|p| !p.trim().is_empty());

  match (id, file_path) {
    (Some(id), Some(file_path)) => Ok(DeleteTarget { id, file_path }),
    _ => Err(AppError::BadRequest(MISSING_PARAMS_MESSAGE.to_string())),
  }
}

pub fn register_delete_saga(registry: &SagaRegistry<AppError>) {
  let step_defs: Vec<(&str, bool)> = DELETE_STEPS.iter().map(|name| (*name, false)).collect();
  let mut saga = Saga::<DeleteCtxData, AppError>::new(&step_defs);

  saga.on_step("authenticate", |ctx_data: ContextData<DeleteCtxData>| async move {
    let guard = ctx_data.read();
    check_password(&guard.app_state.credentials, guard.supplied_password.as_deref())?;
    Ok::<_, AppError>(StepControl::Continue)
  });

  saga.on_step("validate_request", validate_request_step);
  saga.on_step("remove_blob", remove_blob_step);
  saga.on_step("delete_record", delete_record_step);

  registry.register_saga(saga);
  tracing::info!("Delete saga registered.");
}

async fn validate_request_step(ctx_data: ContextData<DeleteCtxData>) -> AppResult<StepControl> {
  let body = ctx_data
    .write()
    .body
    .take()
    .ok_or_else(|| AppError::Internal("validate_request ran without a request body".to_string()))?;
  let bytes = body.collect(MAX_DELETE_BODY_BYTES).await?;
  let target = parse_delete_target(&bytes)?;
  event!(Level::DEBUG, id = target.id, file_path = %target.file_path, "Delete request validated.");
  ctx_data.write().target = Some(target);
  Ok(StepControl::Continue)
}

fn target_of(ctx_data: &ContextData<DeleteCtxData>) -> AppResult<DeleteTarget> {
  ctx_data
    .read()
    .target
    .clone()
    .ok_or_else(|| AppError::Internal("delete ran without a validated target".to_string()))
}

#[instrument(name = "delete::remove_blob", skip_all)]
async fn remove_blob_step(ctx_data: ContextData<DeleteCtxData>) -> AppResult<StepControl> {
  let target = target_of(&ctx_data)?;
  let objects = ctx_data.read().app_state.objects.clone();

  let removal = match objects.remove(&target.file_path).await {
    Ok(()) => BlobRemoval::Removed,
    Err(e) if e.is_not_found() => {
      event!(Level::INFO, file_path = %target.file_path, "Image already gone; deleting the row anyway.");
      BlobRemoval::AlreadyGone
    }
    Err(e) => {
      warn!(error = %e, file_path = %target.file_path, "Could not remove image; deleting the row anyway.");
      BlobRemoval::Failed(e.to_string())
    }
  };

  ctx_data.write().blob_removal = Some(removal);
  Ok(StepControl::Continue)
}

#[instrument(name = "delete::delete_record", skip_all, err)]
async fn delete_record_step(ctx_data: ContextData<DeleteCtxData>) -> AppResult<StepControl> {
  let target = target_of(&ctx_data)?;
  let catalog = ctx_data.read().app_state.catalog.clone();

  catalog.delete(target.id).await.map_err(|e| {
    event!(Level::ERROR, error = %e, id = target.id, "Catalog delete failed.");
    AppError::DatabaseWriteFailed(e.to_string())
  })?;
  event!(Level::INFO, id = target.id, "Product row deleted.");

  ctx_data.write().deleted_id = Some(target.id);
  Ok(StepControl::Continue)
}

/// Runs the registered delete saga and returns the removed id.
#[instrument(name = "delete::run", skip_all)]
pub async fn run_delete(app_state: &AppState, supplied_password: Option<String>, body: RequestBody) -> AppResult<i64> {
  let ctx_data = ContextData::new(DeleteCtxData::new(app_state.clone(), supplied_password, body));
  match app_state.sagas.run(ctx_data.clone()).await? {
    SagaResult::Committed => ctx_data
      .read()
      .deleted_id
      .ok_or_else(|| AppError::Internal("Delete committed without removing a row.".to_string())),
    SagaResult::Stopped => Err(AppError::Internal("Delete saga stopped before committing.".to_string())),
  }
}
