// vitrina/storefront/src/stores/memory.rs

//! Process-local stores for `STORE_BACKEND=memory` and for tests. Both carry
//! switches that make the next operations fail, and call counters.

use super::{CatalogStore, ObjectStore, StoreError, StoreResult};
use crate::models::{NewProduct, Product, Projection};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

const INJECTED: &str = "injected failure";

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
  pub body: Bytes,
  pub content_type: String,
}

#[derive(Debug)]
pub struct InMemoryObjectStore {
  public_base: String,
  blobs: RwLock<HashMap<String, StoredBlob>>,
  fail_puts: AtomicBool,
  fail_removes: AtomicBool,
  put_calls: AtomicUsize,
  remove_calls: AtomicUsize,
}

impl InMemoryObjectStore {
  pub fn new(base_url: &str, bucket: &str) -> Self {
    Self {
      public_base: format!("{}/storage/v1/object/public/{}", base_url.trim_end_matches('/'), bucket),
      blobs: RwLock::new(HashMap::new()),
      fail_puts: AtomicBool::new(false),
      fail_removes: AtomicBool::new(false),
      put_calls: AtomicUsize::new(0),
      remove_calls: AtomicUsize::new(0),
    }
  }

  pub fn fail_puts(&self, fail: bool) {
    self.fail_puts.store(fail, Ordering::SeqCst);
  }

  /// Makes `remove` fail with a backend error (not a "not found").
  pub fn fail_removes(&self, fail: bool) {
    self.fail_removes.store(fail, Ordering::SeqCst);
  }

  pub fn put_calls(&self) -> usize {
    self.put_calls.load(Ordering::SeqCst)
  }

  pub fn remove_calls(&self) -> usize {
    self.remove_calls.load(Ordering::SeqCst)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.blobs.read().contains_key(key)
  }

  pub fn get(&self, key: &str) -> Option<StoredBlob> {
    self.blobs.read().get(key).cloned()
  }

  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self.blobs.read().keys().cloned().collect();
    keys.sort();
    keys
  }

  pub fn len(&self) -> usize {
    self.blobs.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Stores a blob without counting it as a `put` call.
  pub fn seed(&self, key: &str, body: impl Into<Bytes>, content_type: &str) {
    self.blobs.write().insert(
      key.to_string(),
      StoredBlob {
        body: body.into(),
        content_type: content_type.to_string(),
      },
    );
  }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
  async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<String> {
    self.put_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_puts.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable(INJECTED.to_string()));
    }
    let mut blobs = self.blobs.write();
    if blobs.contains_key(key) {
      return Err(StoreError::Backend {
        status: 409,
        message: "The resource already exists".to_string(),
      });
    }
    blobs.insert(
      key.to_string(),
      StoredBlob {
        body,
        content_type: content_type.to_string(),
      },
    );
    Ok(key.to_string())
  }

  fn public_url(&self, key: &str) -> String {
    format!("{}/{}", self.public_base, key)
  }

  async fn remove(&self, key: &str) -> StoreResult<()> {
    self.remove_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_removes.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable(INJECTED.to_string()));
    }
    match self.blobs.write().remove(key) {
      Some(_) => Ok(()),
      None => Err(StoreError::NotFound(key.to_string())),
    }
  }

  fn backend_name(&self) -> &'static str {
    "memory"
  }
}

#[derive(Debug)]
pub struct InMemoryCatalogStore {
  rows: RwLock<BTreeMap<i64, Product>>,
  next_id: AtomicI64,
  fail_inserts: AtomicBool,
  fail_deletes: AtomicBool,
  fail_lists: AtomicBool,
  insert_calls: AtomicUsize,
  delete_calls: AtomicUsize,
}

impl Default for InMemoryCatalogStore {
  fn default() -> Self {
    Self::new()
  }
}

impl InMemoryCatalogStore {
  pub fn new() -> Self {
    Self {
      rows: RwLock::new(BTreeMap::new()),
      next_id: AtomicI64::new(1),
      fail_inserts: AtomicBool::new(false),
      fail_deletes: AtomicBool::new(false),
      fail_lists: AtomicBool::new(false),
      insert_calls: AtomicUsize::new(0),
      delete_calls: AtomicUsize::new(0),
    }
  }

  pub fn fail_inserts(&self, fail: bool) {
    self.fail_inserts.store(fail, Ordering::SeqCst);
  }

  pub fn fail_deletes(&self, fail: bool) {
    self.fail_deletes.store(fail, Ordering::SeqCst);
  }

  pub fn fail_lists(&self, fail: bool) {
    self.fail_lists.store(fail, Ordering::SeqCst);
  }

  pub fn insert_calls(&self) -> usize {
    self.insert_calls.load(Ordering::SeqCst)
  }

  pub fn delete_calls(&self) -> usize {
    self.delete_calls.load(Ordering::SeqCst)
  }

  pub fn get(&self, id: i64) -> Option<Product> {
    self.rows.read().get(&id).cloned()
  }

  pub fn len(&self) -> usize {
    self.rows.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// True if any row points at `key`.
  pub fn references(&self, key: &str) -> bool {
    self.rows.read().values().any(|row| row.file_path.as_deref() == Some(key))
  }

  /// Inserts a row with a caller-chosen id, bypassing call counters and
  /// failure switches. Later inserts get ids above the highest seeded one.
  pub fn seed(&self, id: i64, product: NewProduct) -> Product {
    let row = product.into_product(id);
    self.rows.write().insert(id, row.clone());
    self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    row
  }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
  async fn insert(&self, product: NewProduct) -> StoreResult<Product> {
    self.insert_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_inserts.load(Ordering::SeqCst) {
      return Err(StoreError::Backend {
        status: 500,
        message: INJECTED.to_string(),
      });
    }
    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    let row = product.into_product(id);
    self.rows.write().insert(id, row.clone());
    Ok(row)
  }

  async fn delete(&self, id: i64) -> StoreResult<()> {
    self.delete_calls.fetch_add(1, Ordering::SeqCst);
    if self.fail_deletes.load(Ordering::SeqCst) {
      return Err(StoreError::Backend {
        status: 500,
        message: INJECTED.to_string(),
      });
    }
    self.rows.write().remove(&id);
    Ok(())
  }

  async fn list(&self, projection: Projection) -> StoreResult<Vec<Product>> {
    if self.fail_lists.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable(INJECTED.to_string()));
    }
    let rows = self.rows.read();
    Ok(rows.values().rev().cloned().map(|row| row.into_projection(projection)).collect())
  }

  fn backend_name(&self) -> &'static str {
    "memory"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn new_product(titulo: &str) -> NewProduct {
    NewProduct {
      titulo: titulo.to_string(),
      descripcion_corta: format!("{} corto", titulo),
      precio: 1.0,
      imagen_url: format!("http://local/{}.png", titulo),
      file_path: format!("{}.png", titulo),
    }
  }

  #[tokio::test]
  async fn remove_of_missing_blob_is_not_found() {
    let store = InMemoryObjectStore::new("http://localhost:8080/", "imagenes_productos");
    let err = store.remove("x.png").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
      store.public_url("a.png"),
      "http://localhost:8080/storage/v1/object/public/imagenes_productos/a.png"
    );
  }

  #[tokio::test]
  async fn ids_increase_past_seeded_rows_and_list_descends() {
    let store = InMemoryCatalogStore::new();
    store.seed(7, new_product("siete"));
    let inserted = store.insert(new_product("ocho")).await.unwrap();
    assert_eq!(inserted.id, 8);

    let ids: Vec<i64> = store.list(Projection::Public).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![8, 7]);
  }
}
