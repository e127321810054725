#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary that pulls in `mod common`
#[ctor::ctor]
fn init_logging() {
    web_test_support::test_logging::init();
}

/// Assert a ProblemDetails body with the given status and code.
pub async fn assert_problem(resp: ServiceResponse<BoxBody>, expected_status: u16, expected_code: &str) {
    assert_eq!(resp.status().as_u16(), expected_status);
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "application/problem+json");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"].as_u64(), Some(u64::from(expected_status)));
    assert_eq!(body["code"].as_str(), Some(expected_code));
    assert!(body["title"].is_string());
    assert!(body["detail"].is_string());
}
