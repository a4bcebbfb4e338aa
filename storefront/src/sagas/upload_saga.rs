// vitrina/storefront/src/sagas/upload_saga.rs

//! Product upload: authenticate, parse, validate, store the image, write the
//! catalog row. A failed catalog write removes the stored image.

use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewProduct, Product};
use crate::sagas::common_steps::check_password;
use crate::sagas::contexts::{UploadCtxData, UploadState};
use crate::sagas::multipart_form::{boundary_from_content_type, read_product_form};
use crate::sagas::request_body::RequestBody;
use crate::services::storage_key::derive_storage_key;
use crate::state::AppState;
use tracing::{event, instrument, warn, Level};
use vitrina_saga::{ContextData, Saga, SagaRegistry, SagaResult, StepControl};

pub const UPLOAD_STEPS: [&str; 5] = ["authenticate", "parse_form", "validate_form", "store_blob", "write_record"];

pub fn register_upload_saga(registry: &SagaRegistry<AppError>) {
  let step_defs: Vec<(&str, bool)> = UPLOAD_STEPS.iter().map(|name| (*name, false)).collect();
  let mut saga = Saga::<UploadCtxData, AppError>::new(&step_defs);

  saga.on_step("authenticate", authenticate_step);
  saga.on_step("parse_form", parse_form_step);
  saga.on_step("validate_form", validate_form_step);
  saga.on_step("store_blob", store_blob_step);
  saga.on_step("write_record", write_record_step);
  saga.compensate_step("store_blob", remove_stored_blob);

  registry.register_saga(saga);
  tracing::info!("Upload saga registered.");
}

fn enter(ctx_data: &ContextData<UploadCtxData>, state: UploadState) {
  ctx_data.write().state = state;
}

async fn authenticate_step(ctx_data: ContextData<UploadCtxData>) -> AppResult<StepControl> {
  enter(&ctx_data, UploadState::Authenticating);
  let guard = ctx_data.read();
  check_password(&guard.app_state.credentials, guard.supplied_password.as_deref())?;
  Ok(StepControl::Continue)
}

async fn parse_form_step(ctx_data: ContextData<UploadCtxData>) -> AppResult<StepControl> {
  let (body, content_type, limit) = {
    let mut guard = ctx_data.write();
    guard.state = UploadState::Parsing;
    let body = guard
      .body
      .take()
      .ok_or_else(|| AppError::Internal("parse_form ran without a request body".to_string()))?;
    (body, guard.content_type.clone(), guard.app_state.config.max_upload_bytes)
  };

  let boundary = boundary_from_content_type(content_type.as_deref())?;
  let form = read_product_form(body.into_stream(), boundary, limit as u64).await?;

  ctx_data.write().form = Some(form);
  Ok(StepControl::Continue)
}

async fn validate_form_step(ctx_data: ContextData<UploadCtxData>) -> AppResult<StepControl> {
  let mut guard = ctx_data.write();
  guard.state = UploadState::Validating;
  let form = guard.form.take().unwrap_or_default();
  let validated = form.validate()?;
  event!(
    Level::DEBUG,
    titulo = %validated.titulo,
    bytes = validated.image.bytes.len(),
    "Upload form validated."
  );
  guard.validated = Some(validated);
  Ok(StepControl::Continue)
}

#[instrument(name = "upload::store_blob", skip_all, err)]
async fn store_blob_step(ctx_data: ContextData<UploadCtxData>) -> AppResult<StepControl> {
  let (objects, key, bytes, content_type) = {
    let mut guard = ctx_data.write();
    guard.state = UploadState::StoringBlob;
    let validated = guard
      .validated
      .as_ref()
      .ok_or_else(|| AppError::Internal("store_blob ran without a validated form".to_string()))?;
    let key = derive_storage_key(
      &validated.titulo,
      validated.image.filename.as_deref(),
      &validated.image.content_type,
    );
    (
      guard.app_state.objects.clone(),
      key,
      validated.image.bytes.clone(),
      validated.image.content_type.clone(),
    )
  };

  let stored_key = objects.put(&key, bytes, &content_type).await.map_err(|e| {
    event!(Level::ERROR, error = %e, %key, "Object store write failed.");
    AppError::StorageWriteFailed(e.to_string())
  })?;
  let public_url = objects.public_url(&stored_key);
  event!(Level::INFO, key = %stored_key, "Image stored.");

  let mut guard = ctx_data.write();
  guard.storage_key = Some(stored_key);
  guard.public_url = Some(public_url);
  Ok(StepControl::Continue)
}

#[instrument(name = "upload::write_record", skip_all, err)]
async fn write_record_step(ctx_data: ContextData<UploadCtxData>) -> AppResult<StepControl> {
  let (catalog, new_product) = {
    let mut guard = ctx_data.write();
    guard.state = UploadState::WritingRecord;
    let new_product = match (&guard.validated, &guard.storage_key, &guard.public_url) {
      (Some(validated), Some(key), Some(url)) => NewProduct {
        titulo: validated.titulo.clone(),
        descripcion_corta: validated.descripcion_corta.clone(),
        precio: validated.precio,
        imagen_url: url.clone(),
        file_path: key.clone(),
      },
      _ => return Err(AppError::Internal("write_record ran before the image was stored".to_string())),
    };
    (guard.app_state.catalog.clone(), new_product)
  };

  let created = catalog.insert(new_product).await.map_err(|e| {
    event!(Level::ERROR, error = %e, "Catalog insert failed.");
    AppError::DatabaseWriteFailed(e.to_string())
  })?;
  event!(Level::INFO, id = created.id, "Product row written.");

  let mut guard = ctx_data.write();
  guard.created = Some(created);
  guard.state = UploadState::Committed;
  Ok(StepControl::Continue)
}

/// Compensator of `store_blob`. Best effort: the outcome is only logged.
#[instrument(name = "upload::compensate_store_blob", skip_all)]
async fn remove_stored_blob(ctx_data: ContextData<UploadCtxData>) -> AppResult<()> {
  let (objects, key) = {
    let mut guard = ctx_data.write();
    guard.state = UploadState::CompensatingThenFailed;
    (guard.app_state.objects.clone(), guard.storage_key.clone())
  };
  let Some(key) = key else {
    return Ok(());
  };

  match objects.remove(&key).await {
    Ok(()) => event!(Level::INFO, %key, "Removed orphaned image after failed catalog write."),
    Err(e) => warn!(error = %e, %key, "Could not remove orphaned image after failed catalog write."),
  }
  Ok(())
}

/// Final outcome of an upload together with the state the saga ended in.
#[derive(Debug)]
pub struct UploadOutcome {
  pub state: UploadState,
  pub result: AppResult<Product>,
}

/// Runs the registered upload saga for one request.
#[instrument(name = "upload::run", skip_all)]
pub async fn run_upload(
  app_state: &AppState,
  supplied_password: Option<String>,
  content_type: Option<String>,
  body: RequestBody,
) -> UploadOutcome {
  let ctx_data = ContextData::new(UploadCtxData::new(
    app_state.clone(),
    supplied_password,
    content_type,
    body,
  ));
  let run_result = app_state.sagas.run(ctx_data.clone()).await;

  let mut guard = ctx_data.write();
  let result = match run_result {
    Ok(SagaResult::Committed) => guard
      .created
      .clone()
      .ok_or_else(|| AppError::Internal("Upload committed without a created row.".to_string())),
    Ok(SagaResult::Stopped) => Err(AppError::Internal("Upload saga stopped before committing.".to_string())),
    Err(e) => Err(e),
  };
  if result.is_err() && guard.state != UploadState::CompensatingThenFailed {
    guard.state = UploadState::Failed;
  }
  UploadOutcome {
    state: guard.state,
    result,
  }
}
