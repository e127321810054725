use std::env;
use std::time::Duration;

use crate::error::DbInfraError;

const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_IDLE_TIMEOUT_MS: u64 = 30_000;

/// Sizing handed to the sqlx pool for server profiles.
///
/// Pool behaviour itself belongs to sqlx; these values are only passed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub pool_min: u32,
    pub pool_max: u32,
    pub acquire_timeout_ms: u64,
    pub idle_timeout_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_min: 0,
            pool_max: default_pool_max(),
            acquire_timeout_ms: DEFAULT_ACQUIRE_TIMEOUT_MS,
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
        }
    }
}

fn default_pool_max() -> u32 {
    let cpus = u32::try_from(num_cpus::get()).unwrap_or(1);
    cpus.saturating_mul(2).max(2)
}

impl PoolSettings {
    /// Read `DB_POOL_MIN`, `DB_POOL_MAX`, `DB_ACQUIRE_TIMEOUT_MS` and
    /// `DB_IDLE_TIMEOUT_MS`, keeping defaults for anything unset.
    pub fn from_env() -> Result<Self, DbInfraError> {
        let defaults = Self::default();
        let settings = Self {
            pool_min: parse_var("DB_POOL_MIN")?.unwrap_or(defaults.pool_min),
            pool_max: parse_var("DB_POOL_MAX")?.unwrap_or(defaults.pool_max),
            acquire_timeout_ms: parse_var("DB_ACQUIRE_TIMEOUT_MS")?
                .unwrap_or(defaults.acquire_timeout_ms),
            idle_timeout_ms: parse_var("DB_IDLE_TIMEOUT_MS")?.unwrap_or(defaults.idle_timeout_ms),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), DbInfraError> {
        if self.pool_max == 0 {
            return Err(DbInfraError::config("DB_POOL_MAX must be at least 1"));
        }
        if self.pool_min > self.pool_max {
            return Err(DbInfraError::config(format!(
                "DB_POOL_MIN ({}) must not exceed DB_POOL_MAX ({})",
                self.pool_min, self.pool_max
            )));
        }
        if self.acquire_timeout_ms == 0 {
            return Err(DbInfraError::config(
                "DB_ACQUIRE_TIMEOUT_MS must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    /// `None` when idle reaping is disabled (`DB_IDLE_TIMEOUT_MS=0`).
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_ms > 0).then(|| Duration::from_millis(self.idle_timeout_ms))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, DbInfraError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            DbInfraError::config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}
