// vitrina/storefront/src/stores/supabase/mod.rs

//! Supabase REST clients: Storage for blobs, PostgREST for catalog rows.

pub mod rest;
pub mod storage;

use super::{StoreError, StoreResult};
use crate::errors::{AppError, Result as AppResult};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;
use std::time::Duration;

/// Shared HTTP client for every Supabase call. `timeout` bounds each request.
pub fn build_http_client(timeout: Duration) -> AppResult<Client> {
  Client::builder()
    .timeout(timeout)
    .user_agent(concat!("vitrina-storefront/", env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Adds the `apikey` and bearer headers Supabase expects for `key`.
pub(crate) fn authorize(builder: RequestBuilder, key: &str) -> RequestBuilder {
  builder.header("apikey", key).bearer_auth(key)
}

/// `base` with `segments` appended to its path, each percent-encoded.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> StoreResult<Url> {
  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|_| StoreError::Unavailable(format!("'{}' cannot be used as a base URL", base)))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}

/// Converts a non-success response into a `StoreError`, reading the store's
/// own message out of the JSON body when there is one.
pub(crate) async fn error_from_response(response: Response) -> StoreError {
  let status = response.status();
  let text = match response.text().await {
    Ok(text) => text,
    Err(e) => return StoreError::from(e),
  };
  error_from_parts(status.as_u16(), &text)
}

pub(crate) fn error_from_parts(status: u16, body: &str) -> StoreError {
  let parsed: Option<Value> = serde_json::from_str(body).ok();
  let field = |name: &str| {
    parsed.as_ref().and_then(|v| match v.get(name) {
      Some(Value::String(s)) => Some(s.clone()),
      Some(Value::Number(n)) => Some(n.to_string()),
      _ => None,
    })
  };

  let message = field("message")
    .or_else(|| field("error"))
    .unwrap_or_else(|| if body.is_empty() { format!("HTTP {}", status) } else { body.to_string() });

  // Storage reports a missing object either with a real 404 or with a 400
  // whose body carries `statusCode: "404"`.
  let not_found = status == 404
    || field("statusCode").as_deref() == Some("404")
    || field("error").is_some_and(|e| e.eq_ignore_ascii_case("not_found") || e.eq_ignore_ascii_case("not found"));

  if not_found {
    StoreError::NotFound(message)
  } else {
    StoreError::Backend { status, message }
  }
}
