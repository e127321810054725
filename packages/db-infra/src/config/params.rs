use std::collections::BTreeMap;
use std::env;
use std::fmt;

use crate::config::profile::DeploymentProfile;
use crate::error::DbInfraError;

pub const SERVER_NAME: &str = "db.servername";
pub const DATABASE_NAME: &str = "db.databasename";
pub const USER: &str = "db.user";
pub const PASSWORD: &str = "db.password";
pub const URL: &str = "db.url";
pub const DRIVER_CLASS: &str = "db.driverClass";
pub const USERNAME: &str = "db.username";

/// Every parameter name the binder understands, in a stable order.
pub const KNOWN_KEYS: [&str; 7] = [
    SERVER_NAME,
    DATABASE_NAME,
    USER,
    PASSWORD,
    URL,
    DRIVER_CLASS,
    USERNAME,
];

/// Parameters that must be present for the given profile.
pub fn required_keys(profile: DeploymentProfile) -> &'static [&'static str] {
    match profile {
        DeploymentProfile::Default => &[],
        DeploymentProfile::PostgreSql => &[SERVER_NAME, DATABASE_NAME, USER, PASSWORD],
        DeploymentProfile::MySql => &[URL, USERNAME, PASSWORD],
    }
}

/// Environment variable backing a parameter name: `db.driverClass` -> `DB_DRIVERCLASS`.
pub fn env_var_name(key: &str) -> String {
    key.replace('.', "_").to_ascii_uppercase()
}

/// Immutable name -> value mapping handed to the binder.
///
/// Blank values are dropped on insertion so that "set but empty" and "unset"
/// are indistinguishable to the required-parameter check.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionParameters {
    values: BTreeMap<String, String>,
}

impl ConnectionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |params, (k, v)| params.with(k, v))
    }

    /// Read every known parameter from the process environment.
    /// This is the single configuration-reading boundary; call it once at startup.
    pub fn from_env() -> Self {
        let mut params = Self::new();
        for key in KNOWN_KEYS {
            if let Ok(value) = env::var(env_var_name(key)) {
                params = params.with(key, value);
            }
        }
        params
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.values.insert(key.into(), trimmed.to_string());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails with every missing name listed, not just the first.
    pub fn ensure_present(&self, keys: &[&str]) -> Result<(), DbInfraError> {
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| self.get(k).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        let vars: Vec<String> = missing.iter().map(|k| env_var_name(k)).collect();
        Err(DbInfraError::config(format!(
            "missing required connection parameter(s): {} (env: {})",
            missing.join(", "),
            vars.join(", ")
        )))
    }

    /// Fetch a parameter that `ensure_present` has already vouched for.
    pub(crate) fn required(&self, key: &str) -> Result<&str, DbInfraError> {
        self.get(key).ok_or_else(|| {
            DbInfraError::config(format!(
                "missing required connection parameter: {key} (env: {})",
                env_var_name(key)
            ))
        })
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in &self.values {
            if k == PASSWORD {
                map.entry(k, &"***");
            } else {
                map.entry(k, v);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    fn env_var_names_follow_parameter_names() {
        assert_eq!(env_var_name(SERVER_NAME), "DB_SERVERNAME");
        assert_eq!(env_var_name(DRIVER_CLASS), "DB_DRIVERCLASS");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let params = ConnectionParameters::new()
            .with(USER, "  ")
            .with(PASSWORD, " secret ");
        assert_eq!(params.get(USER), None);
        assert_eq!(params.get(PASSWORD), Some("secret"));
    }

    #[test]
    fn ensure_present_lists_every_missing_name() {
        let params = ConnectionParameters::from_pairs([(SERVER_NAME, "db.local")]);
        let err = params
            .ensure_present(required_keys(DeploymentProfile::PostgreSql))
            .unwrap_err();
        let msg = err.to_string();
        assert!(err.is_config());
        assert!(msg.contains(DATABASE_NAME));
        assert!(msg.contains(USER));
        assert!(msg.contains("DB_PASSWORD"));
        assert!(!msg.contains(SERVER_NAME));
    }

    #[test]
    fn default_profile_requires_nothing() {
        assert!(ConnectionParameters::new()
            .ensure_present(required_keys(DeploymentProfile::Default))
            .is_ok());
    }

    #[test]
    fn debug_output_masks_password() {
        let params = ConnectionParameters::from_pairs([(USER, "app"), (PASSWORD, "hunter2")]);
        let debug = format!("{params:?}");
        assert!(debug.contains("app"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn from_env_reads_known_keys_only() {
        env::set_var("DB_URL", "mysql://localhost/example");
        env::set_var("DB_USERNAME", "example");
        env::set_var("DB_UNRELATED", "ignored");

        let params = ConnectionParameters::from_env();
        assert_eq!(params.get(URL), Some("mysql://localhost/example"));
        assert_eq!(params.get(USERNAME), Some("example"));
        assert_eq!(params.get("db.unrelated"), None);

        env::remove_var("DB_URL");
        env::remove_var("DB_USERNAME");
        env::remove_var("DB_UNRELATED");
    }
}
