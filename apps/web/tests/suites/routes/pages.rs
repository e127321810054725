use actix_web::http::StatusCode;
use actix_web::test;

use crate::common::assert_problem;
use crate::support::{build_test_state, create_test_app};

async fn get_html(uri: &str) -> (StatusCode, String) {
    let app = create_test_app(build_test_state().await).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = resp.status();
    if status.is_success() {
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
    }
    let body = test::read_body(resp).await;
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_web::test]
async fn root_renders_index_view() {
    let (status, body) = get_html("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("There are <strong>3</strong> examples stored."));
    assert!(body.contains("profile <code>default</code>"));
    assert!(!body.contains("${"));
}

#[actix_web::test]
async fn list_renders_one_escaped_row_per_example() {
    let (status, body) = get_html("/examples").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 3);
    assert!(body.contains(r#"<a href="/examples/1">alpha</a>"#));
    assert!(body.contains("<title>Examples (3)</title>"));
}

#[actix_web::test]
async fn detail_uses_explicit_view() {
    let (status, body) = get_html("/examples/2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>beta</h1>"));
    assert!(body.contains("Second example row; has a semicolon"));
}

#[actix_web::test]
async fn user_content_is_escaped() {
    let state = build_test_state().await;
    let created = state
        .examples
        .create(
            state.db(),
            serde_json::from_value(serde_json::json!({
                "name": "<script>alert(1)</script>",
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    let app = create_test_app(state).await;

    let uri = format!("/examples/{}", created.id);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[actix_web::test]
async fn unknown_page_falls_through_to_fallback_resolver() {
    let (status, body) = get_html("/about").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("served by the fallback resolver"));
}

#[actix_web::test]
async fn page_with_no_template_anywhere_is_not_found() {
    let app = create_test_app(build_test_state().await).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_problem(resp, 404, "VIEW_NOT_FOUND").await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/examples/4242").to_request()).await;
    assert_problem(resp, 404, "EXAMPLE_NOT_FOUND").await;
}
