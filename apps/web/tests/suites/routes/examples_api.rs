use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn lists_seeded_examples_in_id_order() {
    let app = create_test_app(build_test_state().await).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/examples").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(body[1]["description"], "Second example row; has a semicolon");
    assert!(body[2]["description"].is_null());
}

#[actix_web::test]
async fn create_read_update_delete() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/examples")
        .set_json(json!({ "name": "  delta ", "description": "fourth" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "delta");
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/examples/{id}"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&location).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    let req = test::TestRequest::put()
        .uri(&location)
        .set_json(json!({ "name": "delta", "description": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert!(updated["description"].is_null());

    let resp = test::call_service(&app, test::TestRequest::delete().uri(&location).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&location).to_request()).await;
    assert_problem(resp, 404, "EXAMPLE_NOT_FOUND").await;
}

#[actix_web::test]
async fn missing_rows_are_not_found() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::put()
        .uri("/api/examples/9999")
        .set_json(json!({ "name": "nobody" }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 404, "EXAMPLE_NOT_FOUND").await;

    let req = test::TestRequest::delete().uri("/api/examples/9999").to_request();
    assert_problem(test::call_service(&app, req).await, 404, "EXAMPLE_NOT_FOUND").await;
}

#[actix_web::test]
async fn invalid_input_is_rejected() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/examples")
        .set_json(json!({ "name": "   " }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "EXAMPLE_NAME_REQUIRED").await;

    let req = test::TestRequest::post()
        .uri("/api/examples")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_problem(test::call_service(&app, req).await, 400, "INVALID_JSON").await;

    let req = test::TestRequest::get().uri("/api/examples/abc").to_request();
    assert_problem(test::call_service(&app, req).await, 400, "INVALID_ID").await;
}

#[actix_web::test]
async fn failed_write_leaves_no_trace() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/examples")
        .set_json(json!({ "name": "x".repeat(300) }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, 422, "EXAMPLE_NAME_TOO_LONG").await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/examples").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}
