use actix_web::test;
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_profile_and_dialect() {
    let app = create_test_app(build_test_state().await).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["profile"], "default");
    assert_eq!(body["dialect"], "sqlite");
    assert_eq!(body["engine"], "sqlite");
    assert_eq!(body["migrations"], "init_scripts");
    assert!(body.get("db_error").is_none());
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn request_id_is_echoed_when_valid() {
    let app = create_test_app(build_test_state().await).await;
    let id = "5f0c6f3e-8a4e-4c4b-9a57-0d1f9b7c2a11";

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), id);

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("x-request-id", "not-a-uuid"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_ne!(resp.headers().get("x-request-id").unwrap(), "not-a-uuid");
}
