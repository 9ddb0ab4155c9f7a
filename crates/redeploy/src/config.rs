//! Rebuild configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use redeploy_core::compose::is_safe_service_name;

/// Deployment checkout that holds the compose file.
pub const DEFAULT_WORKDIR: &str = "/home/nut/loyalty-app";

/// Compose service rebuilt when `REDEPLOY_SERVICE` is unset.
pub const DEFAULT_SERVICE: &str = "user-service";

/// Seconds to wait after `up -d` before querying status.
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 3;

/// Number of log lines shown at the end of a rebuild.
pub const DEFAULT_LOG_TAIL: u32 = 10;

pub const DEFAULT_COMPOSE_BIN: &str = "docker-compose";

/// Errors raised while loading or validating [`RebuildConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Invalid service name {0:?}: use 1-128 characters from [A-Za-z0-9._-]")]
    InvalidServiceName(String),

    #[error("Working directory must be an absolute path, got {0}")]
    RelativeWorkdir(PathBuf),

    #[error("Compose binary must not be empty")]
    EmptyComposeBin,

    #[error("Log tail must be at least 1 line")]
    ZeroLogTail,
}

/// Everything the rebuild needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildConfig {
    /// Directory every compose command runs in.
    pub working_dir: PathBuf,
    /// Compose service to rebuild.
    pub service: String,
    /// Fixed pause between starting the service and querying it.
    pub startup_delay: Duration,
    /// Lines passed to `logs --tail`.
    pub log_tail: u32,
    /// Compose executable, e.g. `docker-compose` or `docker compose`.
    pub compose_bin: String,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKDIR),
            service: DEFAULT_SERVICE.to_string(),
            startup_delay: Duration::from_secs(DEFAULT_STARTUP_DELAY_SECS),
            log_tail: DEFAULT_LOG_TAIL,
            compose_bin: DEFAULT_COMPOSE_BIN.to_string(),
        }
    }
}

impl RebuildConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `REDEPLOY_WORKDIR`            | `/home/nut/loyalty-app` |
    /// | `REDEPLOY_SERVICE`            | `user-service`          |
    /// | `REDEPLOY_STARTUP_DELAY_SECS` | `3`                     |
    /// | `REDEPLOY_LOG_TAIL`           | `10`                    |
    /// | `REDEPLOY_COMPOSE_BIN`        | `docker-compose`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let working_dir = lookup("REDEPLOY_WORKDIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.working_dir);

        let service = lookup("REDEPLOY_SERVICE").unwrap_or(defaults.service);

        let startup_delay = match lookup("REDEPLOY_STARTUP_DELAY_SECS") {
            Some(raw) => Duration::from_secs(parse_number("REDEPLOY_STARTUP_DELAY_SECS", &raw)?),
            None => defaults.startup_delay,
        };

        let log_tail = match lookup("REDEPLOY_LOG_TAIL") {
            Some(raw) => parse_number("REDEPLOY_LOG_TAIL", &raw)?,
            None => defaults.log_tail,
        };

        let compose_bin = lookup("REDEPLOY_COMPOSE_BIN").unwrap_or(defaults.compose_bin);

        let config = Self {
            working_dir,
            service,
            startup_delay,
            log_tail,
            compose_bin,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot be safely turned into shell commands.
    ///
    /// Does not check that the service exists in the compose file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_safe_service_name(&self.service) {
            return Err(ConfigError::InvalidServiceName(self.service.clone()));
        }
        if !self.working_dir.is_absolute() {
            return Err(ConfigError::RelativeWorkdir(self.working_dir.clone()));
        }
        if self.compose_bin.trim().is_empty() {
            return Err(ConfigError::EmptyComposeBin);
        }
        if self.log_tail == 0 {
            return Err(ConfigError::ZeroLogTail);
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
