// tests/delete_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::*;
use serde_json::{json, Value};
use vitrina_storefront::web::configure_app_routes;

fn delete_request(password: Option<&str>, body: &str) -> test::TestRequest {
  let req = test::TestRequest::post()
    .uri("/api/delete")
    .insert_header(("Content-Type", "application/json"))
    .set_payload(body.to_string());
  match password {
    Some(password) => req.insert_header((PASSWORD_HEADER, password)),
    None => req,
  }
}

#[actix_web::test]
async fn test_delete_removes_blob_and_row() {
  let t = test_app();
  t.catalog.seed(3, new_product("Bujia", "3_bujia.png"));
  t.objects.seed("3_bujia.png", &b"PNG"[..], "image/png");
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = delete_request(Some(TEST_PASSWORD), r#"{"id": 3, "file_path": "3_bujia.png"}"#).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "message": "Producto ID 3 eliminado." }));

  assert!(t.catalog.get(3).is_none());
  assert!(!t.objects.contains("3_bujia.png"));
}

#[actix_web::test]
async fn test_delete_with_blob_already_gone_still_deletes_the_row() {
  let t = test_app();
  t.catalog.seed(7, new_product("Filtro", "x.png"));
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = delete_request(Some(TEST_PASSWORD), r#"{"id": 7, "file_path": "x.png"}"#).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(t.objects.remove_calls(), 1);
  assert!(t.catalog.get(7).is_none());
}

#[actix_web::test]
async fn test_delete_continues_past_other_storage_errors() {
  let t = test_app();
  t.catalog.seed(4, new_product("Correa", "4_correa.webp"));
  t.objects.seed("4_correa.webp", &b"WEBP"[..], "image/webp");
  t.objects.fail_removes(true);
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = delete_request(Some(TEST_PASSWORD), r#"{"id": 4, "file_path": "4_correa.webp"}"#).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(t.catalog.get(4).is_none());
  assert!(t.objects.contains("4_correa.webp"));
}

#[actix_web::test]
async fn test_delete_catalog_failure_is_a_server_error() {
  let t = test_app();
  t.catalog.seed(5, new_product("Aceite", "5_aceite.png"));
  t.catalog.fail_deletes(true);
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = delete_request(Some(TEST_PASSWORD), r#"{"id": 5, "file_path": "5_aceite.png"}"#).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Error en DB: injected failure");
  assert!(t.catalog.get(5).is_some());
}

#[actix_web::test]
async fn test_delete_requires_password_before_reading_the_body() {
  let t = test_app();
  t.catalog.seed(6, new_product("Freno", "6_freno.png"));
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  for password in [None, Some("incorrecta")] {
    let req = delete_request(password, "esto no es json").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Acceso no autorizado.");
  }
  assert_eq!(t.objects.remove_calls(), 0);
  assert_eq!(t.catalog.delete_calls(), 0);
}

#[actix_web::test]
async fn test_delete_with_missing_parameters_is_a_bad_request() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = delete_request(Some(TEST_PASSWORD), r#"{"id": 7}"#).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Faltan parámetros: ID y ruta del archivo (file_path).");

  let req = delete_request(Some(TEST_PASSWORD), "{not json").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  assert_eq!(t.objects.remove_calls(), 0);
  assert_eq!(t.catalog.delete_calls(), 0);
}

#[actix_web::test]
async fn test_oversized_delete_body_is_refused_after_authentication() {
  let t = test_app();
  t.catalog.seed(6, new_product("Freno", "6_freno.png"));
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;
  let padding = " ".repeat(128 * 1024);
  let oversized = format!(r#"{{"id": 6, "file_path": "6_freno.png"}}{}"#, padding);

  let resp = test::call_service(&app, delete_request(None, &oversized).to_request()).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = test::call_service(&app, delete_request(Some(TEST_PASSWORD), &oversized).to_request()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "El cuerpo de la solicitud excede el límite de 65536 bytes.");

  assert_eq!(t.objects.remove_calls(), 0);
  assert_eq!(t.catalog.delete_calls(), 0);
}

#[actix_web::test]
async fn test_delete_rejects_get() {
  let t = test_app();
  let app = test::init_service(App::new().configure(configure_app_routes(t.state.clone()))).await;

  let req = test::TestRequest::get()
    .uri("/api/delete")
    .insert_header((PASSWORD_HEADER, TEST_PASSWORD))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  assert_eq!(t.catalog.delete_calls(), 0);
}
