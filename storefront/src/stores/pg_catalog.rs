// vitrina/storefront/src/stores/pg_catalog.rs

use super::{CatalogStore, StoreResult};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewProduct, Product, Projection};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::instrument;

/// Catalog table reached over a direct Postgres connection.
#[derive(Clone)]
pub struct PgCatalogStore {
  pool: PgPool,
  insert_sql: String,
  delete_sql: String,
  list_public_sql: String,
  list_admin_sql: String,
}

impl PgCatalogStore {
  pub async fn connect(database_url: &str, table: &str, acquire_timeout: Duration) -> AppResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(5)
      .acquire_timeout(acquire_timeout)
      .connect(database_url)
      .await
      .map_err(|e| AppError::Config(format!("Failed to connect to the catalog database: {}", e)))?;
    tracing::info!(%table, "Connected to the catalog database.");
    Ok(Self::with_pool(pool, table))
  }

  /// `table` is spliced into SQL and must already be a validated identifier.
  pub fn with_pool(pool: PgPool, table: &str) -> Self {
    Self {
      pool,
      insert_sql: format!(
        "INSERT INTO {} (titulo, descripcion_corta, precio, imagen_url, file_path) VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, titulo, descripcion_corta, precio, imagen_url, file_path",
        table
      ),
      delete_sql: format!("DELETE FROM {} WHERE id = $1", table),
      list_public_sql: format!(
        "SELECT id, titulo, descripcion_corta, precio, imagen_url, NULL::text AS file_path FROM {} ORDER BY id DESC",
        table
      ),
      list_admin_sql: format!(
        "SELECT id, titulo, descripcion_corta, precio, imagen_url, file_path FROM {} ORDER BY id DESC",
        table
      ),
    }
  }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
  #[instrument(name = "CatalogStore::insert", skip_all, err)]
  async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
    let row = sqlx::query_as::<_, Product>(&self.insert_sql)
      .bind(&product.titulo)
      .bind(&product.descripcion_corta)
      .bind(product.precio)
      .bind(&product.imagen_url)
      .bind(&product.file_path)
      .fetch_one(&self.pool)
      .await?;
    Ok(row)
  }

  #[instrument(name = "CatalogStore::delete", skip(self), err)]
  async fn delete(&self, id: i64) -> StoreResult<()> {
    sqlx::query(&self.delete_sql).bind(id).execute(&self.pool).await?;
    Ok(())
  }

  #[instrument(name = "CatalogStore::list", skip(self), err)]
  async fn list(&self, projection: Projection) -> StoreResult<Vec<Product>> {
    let sql = match projection {
      Projection::Public => &self.list_public_sql,
      Projection::Admin => &self.list_admin_sql,
    };
    let rows = sqlx::query_as::<_, Product>(sql).fetch_all(&self.pool).await?;
    Ok(rows)
  }

  fn backend_name(&self) -> &'static str {
    "postgres"
  }
}
