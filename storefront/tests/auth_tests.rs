// tests/auth_tests.rs
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use common::*;
use serde_json::{json, Value};
use vitrina_storefront::web::configure_app_routes;

#[actix_web::test]
async fn test_auth_without_header_is_a_bad_request() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::post().uri("/api/auth").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "error": "Falta el encabezado de contraseña." }));
}

#[actix_web::test]
async fn test_auth_with_wrong_password_is_unauthorized() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::post()
    .uri("/api/auth")
    .insert_header((PASSWORD_HEADER, "adivina"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Credenciales inválidas.");
}

#[actix_web::test]
async fn test_auth_with_correct_password_succeeds() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::post()
    .uri("/api/auth")
    .insert_header((PASSWORD_HEADER, TEST_PASSWORD))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Autenticación exitosa.");
}

#[actix_web::test]
async fn test_auth_denies_everything_without_configured_password() {
  let t = test_app_with(&[("ADMIN_PASSWORD", "")]);
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::post()
    .uri("/api/auth")
    .insert_header((PASSWORD_HEADER, TEST_PASSWORD))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_auth_rejects_other_methods() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::get()
    .uri("/api/auth")
    .insert_header((PASSWORD_HEADER, TEST_PASSWORD))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Método no permitido. Use POST.");
}
