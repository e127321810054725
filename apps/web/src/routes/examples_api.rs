//! JSON CRUD over examples. Every call runs in its own transaction.

use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::repos::examples::ExampleInput;
use crate::state::app_state::AppState;

async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let repo = app_state.examples.clone();
    let examples = app_state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.list(txn).await }))
        .await?;
    Ok(HttpResponse::Ok().json(examples))
}

async fn get_one(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let repo = app_state.examples.clone();
    let example = app_state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.require(txn, id).await }))
        .await?;
    Ok(HttpResponse::Ok().json(example))
}

async fn create(
    app_state: web::Data<AppState>,
    body: web::Json<ExampleInput>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    let repo = app_state.examples.clone();
    let example = app_state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.create(txn, input).await }))
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/examples/{}", example.id)))
        .json(example))
}

async fn update(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ExampleInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner();
    let repo = app_state.examples.clone();
    let example = app_state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.update(txn, id, input).await }))
        .await?;
    Ok(HttpResponse::Ok().json(example))
}

async fn delete(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let repo = app_state.examples.clone();
    app_state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.delete(txn, id).await }))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request("INVALID_JSON", err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request("INVALID_ID", err.to_string()).into()
    }))
    .route("", web::get().to(list))
    .route("", web::post().to(create))
    .route("/{id}", web::get().to(get_one))
    .route("/{id}", web::put().to(update))
    .route("/{id}", web::delete().to(delete));
}
