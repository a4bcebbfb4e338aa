// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Level;
use vitrina_storefront::config::AppConfig;
use vitrina_storefront::models::NewProduct;
use vitrina_storefront::stores::memory::{InMemoryCatalogStore, InMemoryObjectStore};
use vitrina_storefront::stores::StoreHandles;
use vitrina_storefront::AppState;

pub const TEST_PASSWORD: &str = "profe123";
pub const PASSWORD_HEADER: &str = "X-Professor-Password";
pub const BOUNDARY: &str = "----vitrinaTestBoundary";

// --- App under test ---
pub struct TestApp {
  pub state: AppState,
  pub objects: Arc<InMemoryObjectStore>,
  pub catalog: Arc<InMemoryCatalogStore>,
}

pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
  let mut vars: HashMap<String, String> = HashMap::from([
    ("STORE_BACKEND".to_string(), "memory".to_string()),
    ("APP_BASE_URL".to_string(), "http://localhost:8080".to_string()),
    ("ADMIN_PASSWORD".to_string(), TEST_PASSWORD.to_string()),
  ]);
  for (key, value) in overrides {
    vars.insert(key.to_string(), value.to_string());
  }
  AppConfig::from_lookup(move |name| vars.get(name).cloned()).expect("test config must load")
}

pub fn test_app() -> TestApp {
  test_app_with(&[])
}

pub fn test_app_with(overrides: &[(&str, &str)]) -> TestApp {
  setup_tracing();
  let config = test_config(overrides);
  let objects = Arc::new(InMemoryObjectStore::new(&config.app_base_url, &config.storage_bucket));
  let catalog = Arc::new(InMemoryCatalogStore::new());
  let state = AppState::new(
    config,
    StoreHandles {
      objects: objects.clone(),
      catalog: catalog.clone(),
    },
  );
  TestApp { state, objects, catalog }
}

pub fn new_product(titulo: &str, file_path: &str) -> NewProduct {
  NewProduct {
    titulo: titulo.to_string(),
    descripcion_corta: format!("{} para motor", titulo),
    precio: 10.0,
    imagen_url: format!("http://localhost:8080/storage/v1/object/public/imagenes_productos/{}", file_path),
    file_path: file_path.to_string(),
  }
}

// --- Multipart bodies ---
pub enum Part<'a> {
  Text(&'a str, &'a str),
  File {
    name: &'a str,
    filename: &'a str,
    content_type: &'a str,
    data: &'a [u8],
  },
}

pub fn multipart_content_type() -> String {
  format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
  let mut body = Vec::new();
  for part in parts {
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match part {
      Part::Text(name, value) => {
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
        body.extend_from_slice(value.as_bytes());
      }
      Part::File {
        name,
        filename,
        content_type,
        data,
      } => {
        body.extend_from_slice(
          format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            name, filename, content_type
          )
          .as_bytes(),
        );
        body.extend_from_slice(data);
      }
    }
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
  body
}

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9];

/// The form used by most upload tests: a JPEG plus the three text fields.
pub fn filtro_form() -> Vec<u8> {
  multipart_body(&[
    Part::File {
      name: "imagen",
      filename: "filtro.jpg",
      content_type: "image/jpeg",
      data: JPEG_BYTES,
    },
    Part::Text("titulo", "Filtro"),
    Part::Text("descripcion_corta", "Filtro de aceite"),
    Part::Text("precio", "25.50"),
  ])
}

// --- Tracing setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
