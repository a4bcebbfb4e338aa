// vitrina/storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::sagas::build_saga_registry;
use crate::services::credentials::CredentialCheck;
use crate::stores::{CatalogStore, ObjectStore, StoreHandles};
use std::sync::Arc;
use vitrina_saga::SagaRegistry;

/// Process-wide state, built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub credentials: CredentialCheck,
  pub objects: Arc<dyn ObjectStore>,
  pub catalog: Arc<dyn CatalogStore>,
  pub sagas: Arc<SagaRegistry<AppError>>,
}

impl AppState {
  pub fn new(config: AppConfig, stores: StoreHandles) -> Self {
    let credentials = CredentialCheck::new(config.admin_password.clone());
    Self {
      config: Arc::new(config),
      credentials,
      objects: stores.objects,
      catalog: stores.catalog,
      sagas: build_saga_registry(),
    }
  }
}
