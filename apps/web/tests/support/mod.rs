#![allow(dead_code)]

use std::path::PathBuf;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use db_infra::DeploymentProfile;
use example_web::config::web::WebConfig;
use example_web::{build_state, routes, AppState, RequestTrace, StructuredLogger};

/// The checked-in templates and static files.
pub fn web_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web")
}

/// Fresh, seeded embedded database per call; nothing is shared between tests.
pub async fn build_test_state() -> AppState {
    build_state()
        .with_profile(DeploymentProfile::Default)
        .with_web(WebConfig::default().with_web_root(web_root()))
        .build()
        .await
        .unwrap_or_else(|e| panic!("build test state: {e}"))
}

/// The production route table and middleware around `state`.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let resources_dir = state.resources_dir.clone();
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure(resources_dir)),
    )
    .await
}
