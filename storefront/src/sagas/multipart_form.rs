// vitrina/storefront/src/sagas/multipart_form.rs

//! Reads the product upload form: one image part plus the `titulo`,
//! `descripcion_corta` and `precio` text fields.

use crate::errors::{AppError, Result as AppResult};
use crate::services::storage_key::is_allowed_image_type;
use crate::sagas::request_body::body_too_large;
use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use multer::{Constraints, Multipart, SizeLimit};
use std::io;
use tracing::{debug, warn};

pub const MISSING_FIELDS_MESSAGE: &str = "Faltan datos: Imagen, Título, Descripción o Precio.";
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Tipo de archivo no permitido. Solo imágenes (JPEG, PNG, WEBP).";

#[derive(Debug, Clone)]
pub struct ImagePart {
  pub bytes: Bytes,
  pub content_type: String,
  pub filename: Option<String>,
}

/// Form contents as received; any field may be missing.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
  pub image: Option<ImagePart>,
  pub titulo: Option<String>,
  pub descripcion_corta: Option<String>,
  pub precio: Option<String>,
}

/// A form with every required field present and `precio` parsed.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
  pub image: ImagePart,
  pub titulo: String,
  pub descripcion_corta: String,
  pub precio: f64,
}

fn form_error(err: multer::Error) -> AppError {
  match err {
    multer::Error::StreamSizeExceeded { limit } => body_too_large(limit),
    other => AppError::BadRequest(format!("Error en el procesamiento del formulario: {}", other)),
  }
}

/// Boundary of a `multipart/form-data` content type.
pub fn boundary_from_content_type(content_type: Option<&str>) -> AppResult<String> {
  let content_type = content_type.ok_or_else(|| {
    AppError::BadRequest("Error en el procesamiento del formulario: falta el encabezado Content-Type.".to_string())
  })?;
  multer::parse_boundary(content_type).map_err(form_error)
}

/// Walks the parts in order as `body` yields them. File chunks are appended
/// as they arrive; a file part outside the image allow-list, or a body larger
/// than `limit` bytes, aborts the read.
pub async fn read_product_form<S>(body: S, boundary: String, limit: u64) -> AppResult<ProductForm>
where
  S: Stream<Item = io::Result<Bytes>> + Send + 'static,
{
  let constraints = Constraints::new().size_limit(SizeLimit::new().whole_stream(limit));
  let mut multipart = Multipart::with_constraints(body, boundary, constraints);
  let mut form = ProductForm::default();

  while let Some(mut field) = multipart.next_field().await.map_err(form_error)? {
    let field_name = field.name().unwrap_or_default().to_string();

    match field.file_name().map(str::to_string) {
      // Browsers send an empty file part when no file was chosen.
      Some(file_name) if file_name.is_empty() => {
        while field.chunk().await.map_err(form_error)?.is_some() {}
        debug!(field = %field_name, "Skipping empty file part.");
      }
      Some(file_name) => {
        let mime = field
          .content_type()
          .map(|m| m.essence_str().to_ascii_lowercase())
          .unwrap_or_default();
        if !is_allowed_image_type(&mime) {
          warn!(field = %field_name, %mime, "Rejected file part with a disallowed content type.");
          return Err(AppError::UnsupportedMediaType(UNSUPPORTED_TYPE_MESSAGE.to_string()));
        }
        if form.image.is_some() {
          return Err(AppError::BadRequest("Solo se permite una imagen por producto.".to_string()));
        }

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(form_error)? {
          buffer.extend_from_slice(&chunk);
        }
        debug!(field = %field_name, %mime, bytes = buffer.len(), "Read image part.");
        form.image = Some(ImagePart {
          bytes: buffer.freeze(),
          content_type: mime,
          filename: Some(file_name),
        });
      }
      None => {
        let value = field.text().await.map_err(form_error)?;
        match field_name.as_str() {
          "titulo" => form.titulo = Some(value),
          "descripcion_corta" => form.descripcion_corta = Some(value),
          "precio" => form.precio = Some(value),
          other => debug!(field = %other, "Ignoring unknown form field."),
        }
      }
    }
  }

  Ok(form)
}

impl ProductForm {
  pub fn validate(self) -> AppResult<ValidatedUpload> {
    let missing = || AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string());
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let image = self.image.filter(|image| !image.bytes.is_empty()).ok_or_else(missing)?;
    let titulo = non_empty(self.titulo).ok_or_else(missing)?;
    let descripcion_corta = non_empty(self.descripcion_corta).ok_or_else(missing)?;
    let precio_raw = non_empty(self.precio).ok_or_else(missing)?;

    let precio = precio_raw
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|p| p.is_finite() && *p >= 0.0)
      .ok_or_else(|| AppError::BadRequest(format!("Precio inválido: '{}'.", precio_raw)))?;

    Ok(ValidatedUpload {
      image,
      titulo,
      descripcion_corta,
      precio,
    })
  }
}
