// vitrina/storefront/src/stores/supabase/storage.rs

use super::{authorize, endpoint, error_from_response};
use crate::config::SupabaseConfig;
use crate::stores::{ObjectStore, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Request, Url};
use tracing::{event, instrument, Level};

/// Supabase Storage bucket accessed with the service-role key.
pub struct SupabaseObjectStore {
  http: Client,
  base: Url,
  bucket: String,
  service_key: String,
}

impl SupabaseObjectStore {
  pub fn new(http: Client, config: &SupabaseConfig, bucket: &str) -> Self {
    Self {
      http,
      base: config.url.clone(),
      bucket: bucket.to_string(),
      service_key: config.service_role_key.clone(),
    }
  }

  fn object_url(&self, key: &str) -> StoreResult<Url> {
    endpoint(&self.base, &["storage", "v1", "object", &self.bucket, key])
  }

  /// Upload without upsert, so an existing key is a conflict.
  fn put_request(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<Request> {
    Ok(
      authorize(self.http.post(self.object_url(key)?), &self.service_key)
        .header(CONTENT_TYPE, content_type)
        .header(CACHE_CONTROL, "max-age=3600")
        .header("x-upsert", "false")
        .body(body)
        .build()?,
    )
  }

  fn remove_request(&self, key: &str) -> StoreResult<Request> {
    Ok(authorize(self.http.delete(self.object_url(key)?), &self.service_key).build()?)
  }
}

#[async_trait]
impl ObjectStore for SupabaseObjectStore {
  #[instrument(name = "ObjectStore::put", skip(self, body), fields(bucket = %self.bucket, bytes = body.len()), err)]
  async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<String> {
    let response = self.http.execute(self.put_request(key, body, content_type)?).await?;

    if !response.status().is_success() {
      return Err(error_from_response(response).await);
    }
    event!(Level::DEBUG, %key, "Blob stored.");
    Ok(key.to_string())
  }

  fn public_url(&self, key: &str) -> String {
    match endpoint(&self.base, &["storage", "v1", "object", "public", &self.bucket, key]) {
      Ok(url) => url.into(),
      // Unreachable with a validated base URL.
      Err(_) => format!(
        "{}/storage/v1/object/public/{}/{}",
        self.base.as_str().trim_end_matches('/'),
        self.bucket,
        key
      ),
    }
  }

  #[instrument(name = "ObjectStore::remove", skip(self), fields(bucket = %self.bucket), err)]
  async fn remove(&self, key: &str) -> StoreResult<()> {
    let response = self.http.execute(self.remove_request(key)?).await?;
    if !response.status().is_success() {
      return Err(error_from_response(response).await);
    }
    Ok(())
  }

  fn backend_name(&self) -> &'static str {
    "supabase-storage"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use reqwest::Method;

  fn store() -> SupabaseObjectStore {
    let config = SupabaseConfig {
      url: Url::parse("https://demo.supabase.co").unwrap(),
      anon_key: "anon-key".to_string(),
      service_role_key: "service-key".to_string(),
    };
    SupabaseObjectStore::new(Client::new(), &config, "imagenes_productos")
  }

  #[test]
  fn put_uploads_without_upsert() {
    let req = store()
      .put_request("1_ab_Filtro.jpg", Bytes::from_static(b"JPEG"), "image/jpeg")
      .unwrap();

    assert_eq!(req.method(), Method::POST);
    assert_eq!(
      req.url().as_str(),
      "https://demo.supabase.co/storage/v1/object/imagenes_productos/1_ab_Filtro.jpg"
    );
    assert_eq!(req.headers()[CONTENT_TYPE], "image/jpeg");
    assert_eq!(req.headers()[CACHE_CONTROL], "max-age=3600");
    assert_eq!(req.headers()["x-upsert"], "false");
    assert_eq!(req.headers()["apikey"], "service-key");
    assert_eq!(req.headers()["authorization"], "Bearer service-key");
    assert_eq!(req.body().and_then(|b| b.as_bytes()), Some(&b"JPEG"[..]));
  }

  #[test]
  fn remove_targets_the_same_object_path() {
    let req = store().remove_request("1_ab_Filtro.jpg").unwrap();
    assert_eq!(req.method(), Method::DELETE);
    assert_eq!(
      req.url().as_str(),
      "https://demo.supabase.co/storage/v1/object/imagenes_productos/1_ab_Filtro.jpg"
    );
    assert_eq!(req.headers()["apikey"], "service-key");
    assert!(req.body().is_none());
  }

  #[test]
  fn public_url_uses_the_public_prefix() {
    assert_eq!(
      store().public_url("1_ab_Filtro.jpg"),
      "https://demo.supabase.co/storage/v1/object/public/imagenes_productos/1_ab_Filtro.jpg"
    );
  }
}
