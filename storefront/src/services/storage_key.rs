// vitrina/storefront/src/services/storage_key.rs

//! Object store keys for uploaded product images:
//! `{unix_millis}_{random8}_{clean_title}.{ext}`.

use chrono::Utc;
use uuid::Uuid;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

const MAX_TITLE_CHARS: usize = 64;

pub fn is_allowed_image_type(mime: &str) -> bool {
  ALLOWED_IMAGE_TYPES.iter().any(|allowed| allowed.eq_ignore_ascii_case(mime))
}

pub fn extension_for_mime(mime: &str) -> &'static str {
  match mime.to_ascii_lowercase().as_str() {
    "image/jpeg" => "jpg",
    "image/png" => "png",
    "image/webp" => "webp",
    _ => "bin",
  }
}

/// Replaces every character that is not an ASCII letter or digit with `_`.
pub fn sanitize_title(titulo: &str) -> String {
  let cleaned: String = titulo
    .chars()
    .take(MAX_TITLE_CHARS)
    .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
    .collect();
  if cleaned.is_empty() {
    "producto".to_string()
  } else {
    cleaned
  }
}

/// Extension of `filename` reduced to lowercase ASCII alphanumerics, or the
/// one implied by `mime` when the name has none.
pub fn file_extension(filename: Option<&str>, mime: &str) -> String {
  let from_name = filename
    .and_then(|name| name.rsplit_once('.'))
    .map(|(_, ext)| {
      ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect::<String>()
    })
    .filter(|ext| !ext.is_empty());
  from_name.unwrap_or_else(|| extension_for_mime(mime).to_string())
}

pub fn derive_storage_key(titulo: &str, filename: Option<&str>, mime: &str) -> String {
  derive_storage_key_at(Utc::now().timestamp_millis(), Uuid::new_v4(), titulo, filename, mime)
}

pub fn derive_storage_key_at(unix_millis: i64, nonce: Uuid, titulo: &str, filename: Option<&str>, mime: &str) -> String {
  let simple = nonce.simple().to_string();
  let random8 = &simple[..8];
  format!(
    "{}_{}_{}.{}",
    unix_millis,
    random8,
    sanitize_title(titulo),
    file_extension(filename, mime)
  )
}
