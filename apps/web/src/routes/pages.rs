//! Server-rendered pages. Handlers that do not pick a view let the
//! translator derive one from the request path.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::views::{render_each, render_view, ModelAndView};

const ROW_VIEW: &str = "examples/row";
const SHOW_VIEW: &str = "examples/show";

fn to_model<T: Serialize>(value: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::internal("view model must serialize to an object")),
        Err(e) => Err(AppError::internal(format!("view model serialization failed: {e}"))),
    }
}

async fn html(app_state: &AppState, mav: ModelAndView) -> Result<HttpResponse, AppError> {
    let body = render_view(&app_state.views, &mav).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn translated(app_state: &AppState, req: &HttpRequest) -> ModelAndView {
    ModelAndView::new(app_state.translator.view_name(req.path()))
        .with("profile", app_state.profile.to_string())
        .with("dialect", app_state.dialect().to_string())
}

async fn index(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let count = app_state.examples.count(app_state.db()).await?;
    let mav = translated(&app_state, &req).with("example_count", count);
    html(&app_state, mav).await
}

async fn list(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let examples = app_state.examples.list(app_state.db()).await?;
    let rows = examples
        .iter()
        .map(to_model)
        .collect::<Result<Vec<_>, _>>()?;
    let rows_html = render_each(&app_state.views, ROW_VIEW, rows).await?;

    let mav = translated(&app_state, &req)
        .with("example_count", examples.len())
        .with("rows", rows_html);
    html(&app_state, mav).await
}

async fn show(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let example = app_state
        .examples
        .require(app_state.db(), path.into_inner())
        .await?;
    let mav = ModelAndView::new(SHOW_VIEW)
        .with("profile", app_state.profile.to_string())
        .with("example", Value::Object(to_model(&example)?));
    html(&app_state, mav).await
}

/// Pages with no data of their own, e.g. `/about`.
async fn static_page(
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    html(&app_state, translated(&app_state, &req)).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/examples", web::get().to(list))
        .route("/examples/{id}", web::get().to(show))
        .route("/{page}", web::get().to(static_page));
}
