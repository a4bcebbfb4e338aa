// vitrina/storefront/src/models/product.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog row. `file_path` is the object store key of the product image;
/// it is only populated under the admin projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub titulo: String,
  pub descripcion_corta: String,
  pub precio: f64,
  pub imagen_url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_path: Option<String>,
}

/// Insert payload. The catalog store assigns `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
  pub titulo: String,
  pub descripcion_corta: String,
  pub precio: f64,
  pub imagen_url: String,
  pub file_path: String,
}

impl NewProduct {
  pub fn into_product(self, id: i64) -> Product {
    Product {
      id,
      titulo: self.titulo,
      descripcion_corta: self.descripcion_corta,
      precio: self.precio,
      imagen_url: self.imagen_url,
      file_path: Some(self.file_path),
    }
  }
}

/// Which columns a catalog listing exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
  Public,
  Admin,
}

impl Projection {
  /// Comma separated column list, in the order the front-end renders them.
  pub fn columns(self) -> &'static str {
    match self {
      Projection::Public => "id,titulo,descripcion_corta,precio,imagen_url",
      Projection::Admin => "id,titulo,descripcion_corta,precio,imagen_url,file_path",
    }
  }
}

impl Product {
  /// Drops the fields `projection` does not expose.
  pub fn into_projection(mut self, projection: Projection) -> Self {
    if projection == Projection::Public {
      self.file_path = None;
    }
    self
  }
}
