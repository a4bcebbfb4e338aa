// vitrina/storefront/src/web/routes.rs

use actix_web::web;

use crate::state::AppState;
use crate::web::handlers::{
  auth_handlers, delete_handlers, health_handlers, method_not_allowed_get, method_not_allowed_post, product_handlers,
  upload_handlers,
};

/// Registers shared state and every `/api` route. Each resource answers any
/// other method with 405 and an `Allow` header.
pub fn configure_app_routes(app_state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
  move |cfg: &mut web::ServiceConfig| {
    cfg
      .app_data(web::Data::new(app_state))
      .service(
        web::scope("/api")
          .service(
            web::resource("/health")
              .route(web::get().to(health_handlers::health_check_handler))
              .default_service(web::to(method_not_allowed_get)),
          )
          .service(
            web::resource("/auth")
              .route(web::post().to(auth_handlers::auth_handler))
              .default_service(web::to(method_not_allowed_post)),
          )
          .service(
            web::resource("/upload")
              .route(web::post().to(upload_handlers::upload_handler))
              .default_service(web::to(method_not_allowed_post)),
          )
          .service(
            web::resource("/delete")
              .route(web::post().to(delete_handlers::delete_handler))
              .default_service(web::to(method_not_allowed_post)),
          )
          .service(
            web::resource("/products-public")
              .route(web::get().to(product_handlers::list_public_handler))
              .default_service(web::to(method_not_allowed_get)),
          )
          .service(
            web::resource("/products-admin")
              .route(web::get().to(product_handlers::list_admin_handler))
              .default_service(web::to(method_not_allowed_get)),
          ),
      );
  }
}
