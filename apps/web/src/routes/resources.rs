use std::path::Path;

use actix_files::Files;

pub const RESOURCES_URL_PREFIX: &str = "/resources";

/// Files below `resources_dir`, mounted at [`RESOURCES_URL_PREFIX`].
/// Directory listings stay off, so a directory request is a 404.
pub fn files(resources_dir: &Path) -> Files {
    Files::new(RESOURCES_URL_PREFIX, resources_dir).prefer_utf8(true)
}
