// vitrina/storefront/src/sagas/contexts.rs

//! Data carried through the upload and delete sagas. Handlers receive these
//! wrapped in `vitrina_saga::ContextData`.

use crate::models::Product;
use crate::sagas::multipart_form::{ProductForm, ValidatedUpload};
use crate::sagas::request_body::RequestBody;
use crate::state::AppState;

/// Where an upload is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
  Idle,
  Authenticating,
  Parsing,
  Validating,
  StoringBlob,
  WritingRecord,
  Committed,
  /// The catalog write failed after the blob was stored; the blob was removed.
  CompensatingThenFailed,
  Failed,
}

pub struct UploadCtxData {
  pub app_state: AppState,
  pub supplied_password: Option<String>,
  pub content_type: Option<String>,
  /// Request body, unread until the parse step takes it.
  pub body: Option<RequestBody>,
  pub form: Option<ProductForm>,
  pub validated: Option<ValidatedUpload>,
  pub storage_key: Option<String>,
  pub public_url: Option<String>,
  pub created: Option<Product>,
  pub state: UploadState,
}

impl UploadCtxData {
  pub fn new(app_state: AppState, supplied_password: Option<String>, content_type: Option<String>, body: RequestBody) -> Self {
    Self {
      app_state,
      supplied_password,
      content_type,
      body: Some(body),
      form: None,
      validated: None,
      storage_key: None,
      public_url: None,
      created: None,
      state: UploadState::Idle,
    }
  }
}

/// Fields of the delete request body once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
  pub id: i64,
  pub file_path: String,
}

/// Result of the blob removal step of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobRemoval {
  Removed,
  AlreadyGone,
  /// Removal failed for another reason; the row is deleted anyway.
  Failed(String),
}

pub struct DeleteCtxData {
  pub app_state: AppState,
  pub supplied_password: Option<String>,
  /// Request body, unread until the request is authenticated.
  pub body: Option<RequestBody>,
  pub target: Option<DeleteTarget>,
  pub blob_removal: Option<BlobRemoval>,
  pub deleted_id: Option<i64>,
}

impl DeleteCtxData {
  pub fn new(app_state: AppState, supplied_password: Option<String>, body: RequestBody) -> Self {
    Self {
      app_state,
      supplied_password,
      body: Some(body),
      target: None,
      blob_removal: None,
      deleted_id: None,
    }
  }
}
