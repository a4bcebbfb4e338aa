// vitrina/storefront/src/sagas/mod.rs

//! Sagas behind the write endpoints, registered once at startup.

use crate::errors::AppError;
use std::sync::Arc;
use vitrina_saga::SagaRegistry;

pub mod common_steps;
pub mod contexts;
pub mod delete_saga;
pub mod multipart_form;
pub mod request_body;
pub mod upload_saga;

pub fn build_saga_registry() -> Arc<SagaRegistry<AppError>> {
  tracing::info!("Registering sagas...");
  let registry = SagaRegistry::<AppError>::new();
  upload_saga::register_upload_saga(&registry);
  delete_saga::register_delete_saga(&registry);
  Arc::new(registry)
}
