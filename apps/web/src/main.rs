use actix_web::{web, App, HttpServer};
use clap::Parser;
use db_infra::{ConnectionParameters, DeploymentProfile, PoolSettings};
use example_web::config::web::WebConfig;
use example_web::infra::state::build_state;
use example_web::middleware::{RequestTrace, StructuredLogger};
use example_web::{routes, telemetry, AppError};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "example-web", about = "Profile-bound example web application")]
struct Args {
    /// Deployment profile: default, postgresql or mysql. Falls back to APP_PROFILE.
    #[arg(long)]
    profile: Option<String>,

    /// Listen address (overrides WEB_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides WEB_PORT)
    #[arg(long)]
    port: Option<u16>,
}

async fn startup(args: Args) -> Result<(web::Data<example_web::AppState>, WebConfig), AppError> {
    let profile = DeploymentProfile::resolve(args.profile.as_deref())?;

    let mut web_config = WebConfig::from_env()?;
    if let Some(host) = args.host {
        web_config.host = host;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }

    let state = build_state()
        .with_profile(profile)
        .with_params(ConnectionParameters::from_env())
        .with_pool(PoolSettings::from_env()?)
        .with_web(web_config.clone())
        .process_wide()
        .build()
        .await?;

    Ok((web::Data::new(state), web_config))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let (data, web_config) = match startup(Args::parse()).await {
        Ok(ready) => ready,
        Err(e) => {
            error!("startup=failed error={e}");
            std::process::exit(1);
        }
    };

    info!(
        "startup=listening host={} port={} profile={}",
        web_config.host, web_config.port, data.profile
    );

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure(data.resources_dir.clone()))
    })
    .bind((web_config.host.as_str(), web_config.port))?
    .run()
    .await
}
