// vitrina/storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use reqwest::Url;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which implementation backs the object and catalog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  /// Hosted Supabase project: Storage API for blobs, PostgREST (or Postgres
  /// when `DATABASE_URL` is set) for the catalog.
  Supabase,
  /// Process-local stores. Nothing survives a restart.
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "supabase" => Ok(StoreBackend::Supabase),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'supabase' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Clone)]
pub struct SupabaseConfig {
  pub url: Url,
  /// Read-only key, subject to row-level security.
  pub anon_key: String,
  /// Privileged key used for every write and delete.
  pub service_role_key: String,
}

impl fmt::Debug for SupabaseConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SupabaseConfig")
      .field("url", &self.url.as_str())
      .field("anon_key", &"[REDACTED]")
      .field("service_role_key", &"[REDACTED]")
      .finish()
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub app_base_url: String,

  pub store_backend: StoreBackend,
  pub supabase: Option<SupabaseConfig>,
  pub database_url: Option<String>,
  pub storage_bucket: String,
  pub catalog_table: String,
  pub store_timeout: Duration,

  /// Shared admin secret. `None` denies every credential check.
  pub admin_password: Option<String>,
  pub admin_list_requires_auth: bool,

  pub max_upload_bytes: usize,
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("app_base_url", &self.app_base_url)
      .field("store_backend", &self.store_backend)
      .field("supabase", &self.supabase)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("storage_bucket", &self.storage_bucket)
      .field("catalog_table", &self.catalog_table)
      .field("store_timeout", &self.store_timeout)
      .field("admin_password_set", &self.admin_password.is_some())
      .field("admin_list_requires_auth", &self.admin_list_requires_auth)
      .field("max_upload_bytes", &self.max_upload_bytes)
      .finish()
  }
}

const DEFAULT_BUCKET: &str = "imagenes_productos";
const DEFAULT_TABLE: &str = "productos";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 30;

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from `lookup`. Empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| lookup(var_name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let require = |var_name: &str| {
      get_env(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or("SERVER_PORT", get_env("SERVER_PORT"), 8080u16)?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

    let store_backend = match get_env("STORE_BACKEND") {
      Some(raw) => raw.parse::<StoreBackend>()?,
      None => StoreBackend::Supabase,
    };

    let supabase = match store_backend {
      StoreBackend::Supabase => {
        let raw_url = require("SUPABASE_URL")?;
        let url = Url::parse(&raw_url).map_err(|e| AppError::Config(format!("Invalid SUPABASE_URL: {}", e)))?;
        if url.cannot_be_a_base() {
          return Err(AppError::Config("Invalid SUPABASE_URL: not a base URL".to_string()));
        }
        Some(SupabaseConfig {
          url,
          anon_key: require("SUPABASE_ANON_KEY")?,
          service_role_key: require("SUPABASE_SERVICE_ROLE_KEY")?,
        })
      }
      StoreBackend::Memory => None,
    };

    let storage_bucket = get_env("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string());
    if storage_bucket.contains('/') {
      return Err(AppError::Config(format!("Invalid STORAGE_BUCKET '{}'", storage_bucket)));
    }
    let catalog_table = get_env("CATALOG_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
    if !is_sql_identifier(&catalog_table) {
      return Err(AppError::Config(format!(
        "Invalid CATALOG_TABLE '{}': expected a plain SQL identifier",
        catalog_table
      )));
    }

    let store_timeout = Duration::from_secs(parse_or(
      "STORE_TIMEOUT_SECS",
      get_env("STORE_TIMEOUT_SECS"),
      DEFAULT_STORE_TIMEOUT_SECS,
    )?);
    let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", get_env("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?;
    let admin_list_requires_auth = parse_or(
      "ADMIN_LIST_REQUIRES_AUTH",
      get_env("ADMIN_LIST_REQUIRES_AUTH"),
      false,
    )?;

    let admin_password = get_env("ADMIN_PASSWORD");
    if admin_password.is_none() {
      tracing::error!("ADMIN_PASSWORD is not configured; every admin request will be denied.");
    }

    let config = Self {
      server_host,
      server_port,
      app_base_url,
      store_backend,
      supabase,
      database_url: get_env("DATABASE_URL"),
      storage_bucket,
      catalog_table,
      store_timeout,
      admin_password,
      admin_list_requires_auth,
      max_upload_bytes,
    };
    tracing::info!(backend = ?config.store_backend, "Application configuration loaded successfully.");
    tracing::debug!(config = ?config, "Loaded config details");
    Ok(config)
  }
}

fn parse_or<T>(var_name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: fmt::Display,
{
  match raw {
    Some(value) => value
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, value, e))),
    None => Ok(default),
  }
}

fn is_sql_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(first) if first.is_ascii_alphabetic() || first == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
    _ => false,
  }
}
