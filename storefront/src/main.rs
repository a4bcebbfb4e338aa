// vitrina/storefront/src/main.rs

use anyhow::Context;
use actix_web::{App, HttpServer};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use vitrina_storefront::stores::connect_stores;
use vitrina_storefront::web::configure_app_routes;
use vitrina_storefront::{AppConfig, AppState};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Load .env before the subscriber reads RUST_LOG and LOG_FORMAT.
  dotenvy::dotenv().ok();
  init_tracing();
  tracing::info!("Starting storefront server...");

  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  let stores = connect_stores(&app_config).await.context("Failed to initialize store clients")?;

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  let app_state = AppState::new(app_config, stores);
  tracing::info!(
    sagas = ?app_state.sagas.step_names_for::<vitrina_storefront::sagas::contexts::UploadCtxData>(),
    "Upload saga ready."
  );

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes(app_state.clone()))
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("Server terminated with an error")?;

  Ok(())
}
