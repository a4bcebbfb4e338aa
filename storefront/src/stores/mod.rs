// vitrina/storefront/src/stores/mod.rs

//! Clients for the two external stores: the object store holding product
//! images and the catalog store holding product rows.

pub mod memory;
pub mod pg_catalog;
pub mod supabase;

use crate::config::{AppConfig, StoreBackend};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewProduct, Product, Projection};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Not found: {0}")]
  NotFound(String),

  /// The store answered with an error status. `message` is the store's own text.
  #[error("{message}")]
  Backend { status: u16, message: String },

  #[error("Store request failed: {0}")]
  Transport(String),

  #[error("Unexpected store response: {0}")]
  Decode(String),

  #[error("Store unavailable: {0}")]
  Unavailable(String),
}

impl StoreError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, StoreError::NotFound(_))
  }
}

impl From<reqwest::Error> for StoreError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      StoreError::Decode(err.to_string())
    } else {
      StoreError::Transport(err.to_string())
    }
  }
}

impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    match &err {
      sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
      sqlx::Error::Database(db_err) => StoreError::Backend {
        status: 500,
        message: db_err.message().to_string(),
      },
      sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => StoreError::Decode(err.to_string()),
      _ => StoreError::Transport(err.to_string()),
    }
  }
}

/// Blob storage for product images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
  /// Stores `body` under `key` and returns the key as the store recorded it.
  async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<String>;

  /// Public retrieval URL of `key`. Computed locally; does not check existence.
  fn public_url(&self, key: &str) -> String;

  /// Removes `key`. A missing key yields `StoreError::NotFound`.
  async fn remove(&self, key: &str) -> StoreResult<()>;

  fn backend_name(&self) -> &'static str;
}

/// Relational store for product rows.
#[async_trait]
pub trait CatalogStore: Send + Sync {
  /// Inserts `product` and returns the stored row, including its assigned id.
  async fn insert(&self, product: NewProduct) -> StoreResult<Product>;

  /// Deletes the row with `id`. Deleting an absent id is not an error.
  async fn delete(&self, id: i64) -> StoreResult<()>;

  /// All rows ordered by id descending, restricted to `projection`.
  async fn list(&self, projection: Projection) -> StoreResult<Vec<Product>>;

  fn backend_name(&self) -> &'static str;
}

#[derive(Clone)]
pub struct StoreHandles {
  pub objects: Arc<dyn ObjectStore>,
  pub catalog: Arc<dyn CatalogStore>,
}

/// Builds the store clients selected by `config`. Called once at startup.
pub async fn connect_stores(config: &AppConfig) -> AppResult<StoreHandles> {
  let handles = match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using in-memory stores; data is lost on restart.");
      StoreHandles {
        objects: Arc::new(memory::InMemoryObjectStore::new(&config.app_base_url, &config.storage_bucket)),
        catalog: Arc::new(memory::InMemoryCatalogStore::new()),
      }
    }
    StoreBackend::Supabase => {
      let supabase = config
        .supabase
        .as_ref()
        .ok_or_else(|| AppError::Config("Supabase backend selected without Supabase settings".to_string()))?;
      let http = supabase::build_http_client(config.store_timeout)?;
      let objects: Arc<dyn ObjectStore> = Arc::new(supabase::storage::SupabaseObjectStore::new(
        http.clone(),
        supabase,
        &config.storage_bucket,
      ));
      let catalog: Arc<dyn CatalogStore> = match &config.database_url {
        Some(database_url) => {
          Arc::new(pg_catalog::PgCatalogStore::connect(database_url, &config.catalog_table, config.store_timeout).await?)
        }
        None => Arc::new(supabase::rest::PostgrestCatalogStore::new(http, supabase, &config.catalog_table)),
      };
      StoreHandles { objects, catalog }
    }
  };
  tracing::info!(
    objects = handles.objects.backend_name(),
    catalog = handles.catalog.backend_name(),
    "Store clients ready."
  );
  Ok(handles)
}
