use std::path::PathBuf;

use actix_web::web;

pub mod examples_api;
pub mod health;
pub mod pages;
pub mod resources;

/// Every route the application serves. `main.rs` and the integration tests
/// both go through here so they exercise the same paths.
///
/// Static files are mounted ahead of the `/{page}` catch-all.
pub fn configure(resources_dir: PathBuf) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.configure(health::configure_routes)
            .service(resources::files(&resources_dir))
            .service(web::scope("/api/examples").configure(examples_api::configure_routes))
            .configure(pages::configure_routes);
    }
}
