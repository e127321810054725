use std::env;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const HOST_ENV: &str = "WEB_HOST";
pub const PORT_ENV: &str = "WEB_PORT";
pub const ROOT_ENV: &str = "WEB_ROOT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ROOT: &str = "web";

/// Listener address and the directory holding templates and static files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub web_root: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            web_root: PathBuf::from(DEFAULT_ROOT),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let host = non_blank(HOST_ENV).unwrap_or(defaults.host);
        let port = match non_blank(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("{PORT_ENV} must be a valid port number, got '{raw}'"))
            })?,
            None => defaults.port,
        };
        let web_root = non_blank(ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.web_root);
        Ok(Self {
            host,
            port,
            web_root,
        })
    }

    pub fn with_web_root(mut self, web_root: impl AsRef<Path>) -> Self {
        self.web_root = web_root.as_ref().to_path_buf();
        self
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.web_root.join("resources")
    }
}

fn non_blank(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
