use actix_web::{web, HttpResponse};
use db_infra::DeploymentProfile;
use migration::get_latest_migration_version;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    profile: String,
    dialect: String,
    engine: String,
    target: String,
    db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let db = app_state.db();
    let check = Statement::from_string(db.get_database_backend(), "SELECT 1 AS health_check");
    let (db_status, db_error, migrations) = match db.query_one(check).await {
        Ok(_) => {
            // The embedded database is built from init scripts, never migrated.
            let migrations = if app_state.profile == DeploymentProfile::Default {
                "init_scripts".to_string()
            } else {
                match get_latest_migration_version(db).await {
                    Ok(Some(version)) => version,
                    Ok(None) => "no_migrations".to_string(),
                    Err(_) => "unknown".to_string(),
                }
            };
            ("ok".to_string(), None, migrations)
        }
        Err(e) => (
            "error".to_string(),
            Some(format!("DB query failed: {e}")),
            "unknown".to_string(),
        ),
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        app_version,
        profile: app_state.profile.to_string(),
        dialect: app_state.dialect().to_string(),
        engine: app_state.descriptor.engine.to_string(),
        target: app_state.descriptor.target.clone(),
        db: db_status,
        db_error,
        migrations,
        time,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
