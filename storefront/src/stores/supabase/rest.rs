// vitrina/storefront/src/stores/supabase/rest.rs

use super::{authorize, endpoint, error_from_response};
use crate::config::SupabaseConfig;
use crate::models::{NewProduct, Product, Projection};
use crate::stores::{CatalogStore, StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::{Client, Request, Url};
use tracing::instrument;

/// Catalog table accessed through PostgREST. Listing uses the anon key so it
/// goes through row-level security; writes use the service-role key.
pub struct PostgrestCatalogStore {
  http: Client,
  base: Url,
  table: String,
  anon_key: String,
  service_key: String,
}

impl PostgrestCatalogStore {
  pub fn new(http: Client, config: &SupabaseConfig, table: &str) -> Self {
    Self {
      http,
      base: config.url.clone(),
      table: table.to_string(),
      anon_key: config.anon_key.clone(),
      service_key: config.service_role_key.clone(),
    }
  }

  fn table_url(&self) -> StoreResult<Url> {
    endpoint(&self.base, &["rest", "v1", &self.table])
  }

  /// POST of a one-element array; the created row comes back in the body.
  fn insert_request(&self, product: &NewProduct) -> StoreResult<Request> {
    Ok(
      authorize(self.http.post(self.table_url()?), &self.service_key)
        .header("Prefer", "return=representation")
        .query(&[("select", Projection::Admin.columns())])
        .json(&[product])
        .build()?,
    )
  }

  fn delete_request(&self, id: i64) -> StoreResult<Request> {
    Ok(
      authorize(self.http.delete(self.table_url()?), &self.service_key)
        .query(&[("id", format!("eq.{}", id))])
        .build()?,
    )
  }

  fn list_request(&self, projection: Projection) -> StoreResult<Request> {
    Ok(
      authorize(self.http.get(self.table_url()?), &self.anon_key)
        .query(&[("select", projection.columns()), ("order", "id.desc")])
        .build()?,
    )
  }
}

#[async_trait]
impl CatalogStore for PostgrestCatalogStore {
  #[instrument(name = "CatalogStore::insert", skip(self, product), fields(table = %self.table), err)]
  async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
    let response = self.http.execute(self.insert_request(&product)?).await?;
    if !response.status().is_success() {
      return Err(error_from_response(response).await);
    }

    let mut rows: Vec<Product> = response.json().await?;
    rows
      .pop()
      .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
  }

  #[instrument(name = "CatalogStore::delete", skip(self), fields(table = %self.table), err)]
  async fn delete(&self, id: i64) -> StoreResult<()> {
    let response = self.http.execute(self.delete_request(id)?).await?;
    if !response.status().is_success() {
      return Err(error_from_response(response).await);
    }
    Ok(())
  }

  #[instrument(name = "CatalogStore::list", skip(self), fields(table = %self.table), err)]
  async fn list(&self, projection: Projection) -> StoreResult<Vec<Product>> {
    let response = self.http.execute(self.list_request(projection)?).await?;
    if !response.status().is_success() {
      return Err(error_from_response(response).await);
    }
    let rows: Vec<Product> = response.json().await?;
    Ok(rows.into_iter().map(|row| row.into_projection(projection)).collect())
  }

  fn backend_name(&self) -> &'static str {
    "supabase-postgrest"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::Method;
  use serde_json::Value;

  fn store() -> PostgrestCatalogStore {
    let config = SupabaseConfig {
      url: Url::parse("https://demo.supabase.co").unwrap(),
      anon_key: "anon-key".to_string(),
      service_role_key: "service-key".to_string(),
    };
    PostgrestCatalogStore::new(Client::new(), &config, "productos")
  }

  fn query_pairs(req: &Request) -> Vec<(String, String)> {
    req.url().query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
  }

  #[test]
  fn insert_posts_an_array_and_asks_for_the_row_back() {
    let product = NewProduct {
      titulo: "Filtro".to_string(),
      descripcion_corta: "Filtro de aceite".to_string(),
      precio: 25.5,
      imagen_url: "https://demo.supabase.co/storage/v1/object/public/imagenes_productos/k.jpg".to_string(),
      file_path: "k.jpg".to_string(),
    };
    let req = store().insert_request(&product).unwrap();

    assert_eq!(req.method(), Method::POST);
    assert_eq!(req.url().path(), "/rest/v1/productos");
    assert_eq!(req.headers()["Prefer"], "return=representation");
    assert_eq!(req.headers()["apikey"], "service-key");
    assert_eq!(req.headers()["authorization"], "Bearer service-key");
    assert_eq!(
      query_pairs(&req),
      vec![("select".to_string(), Projection::Admin.columns().to_string())]
    );

    let body: Value = serde_json::from_slice(req.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["titulo"], "Filtro");
    assert_eq!(rows[0]["file_path"], "k.jpg");
    assert!(rows[0].get("id").is_none());
  }

  #[test]
  fn delete_filters_on_the_id() {
    let req = store().delete_request(42).unwrap();
    assert_eq!(req.method(), Method::DELETE);
    assert_eq!(req.url().path(), "/rest/v1/productos");
    assert_eq!(query_pairs(&req), vec![("id".to_string(), "eq.42".to_string())]);
    assert_eq!(req.headers()["apikey"], "service-key");
  }

  #[test]
  fn list_reads_with_the_anon_key_newest_first() {
    let req = store().list_request(Projection::Public).unwrap();
    assert_eq!(req.method(), Method::GET);
    assert_eq!(
      query_pairs(&req),
      vec![
        ("select".to_string(), "id,titulo,descripcion_corta,precio,imagen_url".to_string()),
        ("order".to_string(), "id.desc".to_string()),
      ]
    );
    assert_eq!(req.headers()["apikey"], "anon-key");
    assert_eq!(req.headers()["authorization"], "Bearer anon-key");
    assert!(req.body().is_none());
  }
}
