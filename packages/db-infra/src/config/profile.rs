use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::DbInfraError;

/// Environment variable consulted when no launch argument names a profile.
pub const PROFILE_ENV_VAR: &str = "APP_PROFILE";

/// Deployment profile selecting which external resources the process binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentProfile {
    /// Local development: disposable in-process database seeded from scripts
    Default,
    /// Pooled PostgreSQL server
    PostgreSql,
    /// Pooled MySQL server
    MySql,
}

impl DeploymentProfile {
    pub const ALL: [DeploymentProfile; 3] = [
        DeploymentProfile::Default,
        DeploymentProfile::PostgreSql,
        DeploymentProfile::MySql,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DeploymentProfile::Default => "default",
            DeploymentProfile::PostgreSql => "postgresql",
            DeploymentProfile::MySql => "mysql",
        }
    }

    /// Whether the profile talks to an external database server.
    pub fn is_server(self) -> bool {
        !matches!(self, DeploymentProfile::Default)
    }

    /// Resolve the active profile from an explicit launch argument, falling back
    /// to `APP_PROFILE`. Neither being set is an error.
    pub fn resolve(arg: Option<&str>) -> Result<Self, DbInfraError> {
        if let Some(raw) = arg {
            return raw.parse();
        }
        match env::var(PROFILE_ENV_VAR) {
            Ok(raw) => raw.parse(),
            Err(_) => Err(DbInfraError::config(format!(
                "no deployment profile selected; set {PROFILE_ENV_VAR} or pass --profile (one of: default, postgresql, mysql)"
            ))),
        }
    }
}

impl fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentProfile {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(DeploymentProfile::Default),
            "postgresql" => Ok(DeploymentProfile::PostgreSql),
            "mysql" => Ok(DeploymentProfile::MySql),
            "" => Err(DbInfraError::config(
                "deployment profile is empty (expected one of: default, postgresql, mysql)",
            )),
            other => Err(DbInfraError::config(format!(
                "unknown deployment profile '{other}' (expected one of: default, postgresql, mysql)"
            ))),
        }
    }
}
