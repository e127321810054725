use actix_web::http::{header, StatusCode};
use actix_web::test;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn serves_stylesheet_with_css_content_type() {
    let app = create_test_app(build_test_state().await).await;

    let req = test::TestRequest::get().uri("/resources/css/site.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/css"), "got {content_type}");
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("font-family"));
}

#[actix_web::test]
async fn missing_resource_is_not_found() {
    let app = create_test_app(build_test_state().await).await;
    let req = test::TestRequest::get().uri("/resources/css/none.css").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Directories are never listed.
    let req = test::TestRequest::get().uri("/resources/css").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn traversal_outside_resources_is_refused() {
    let app = create_test_app(build_test_state().await).await;

    for uri in ["/resources/../view/index.html", "/resources/css/../../view/index.html"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error(), "{uri} -> {}", resp.status());
        let body = test::read_body(resp).await;
        assert!(
            !String::from_utf8_lossy(&body).contains("<title>Examples</title>"),
            "{uri} leaked a template"
        );
    }
}

#[actix_web::test]
async fn hidden_files_are_refused() {
    let app = create_test_app(build_test_state().await).await;
    let req = test::TestRequest::get().uri("/resources/.env").to_request();
    assert!(test::call_service(&app, req).await.status().is_client_error());
}
