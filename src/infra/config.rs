//! Centralized configuration (environment variables + defaults).

use crate::domain::status::DEFAULT_WARNING_DAYS;
use crate::storage::roster::IdentityScheme;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Which sheet implementation backs the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub sheet_name: String,
    pub warning_days: u32,
    pub identity: IdentityScheme,
    pub extended_schema: bool,
    pub bind_addr: String,
    /// Periodic status sweep in the API server; `None` disables it.
    pub sweep_interval: Option<Duration>,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend = match get("ROSTER_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => BackendKind::Memory,
            "postgres" => BackendKind::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing {
                    name: "DATABASE_URL",
                })?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name: "ROSTER_BACKEND",
                    value: other.to_string(),
                    reason: "expected 'memory' or 'postgres'".to_string(),
                })
            }
        };

        let identity = match get("ROSTER_ID_SCHEME").as_deref().unwrap_or("monotonic") {
            "monotonic" => IdentityScheme::Monotonic,
            "row_count" => IdentityScheme::RowCount,
            other => {
                return Err(ConfigError::Invalid {
                    name: "ROSTER_ID_SCHEME",
                    value: other.to_string(),
                    reason: "expected 'monotonic' or 'row_count'".to_string(),
                })
            }
        };

        let warning_days = match get("ROSTER_WARNING_DAYS") {
            Some(v) => parse_number::<u32>("ROSTER_WARNING_DAYS", &v)?,
            None => DEFAULT_WARNING_DAYS,
        };

        let extended_schema = match get("ROSTER_EXTENDED_SCHEMA") {
            Some(v) => parse_bool("ROSTER_EXTENDED_SCHEMA", &v)?,
            None => false,
        };

        let sweep_interval = match get("ROSTER_SWEEP_INTERVAL_SECS") {
            Some(v) => match parse_number::<u64>("ROSTER_SWEEP_INTERVAL_SECS", &v)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        Ok(Self {
            backend,
            sheet_name: get("ROSTER_SHEET").unwrap_or_else(|| "CrewAssignments".to_string()),
            warning_days,
            identity,
            extended_schema,
            bind_addr: get("API_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            sweep_interval,
        })
    }
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.backend, BackendKind::Memory);
        assert_eq!(cfg.sheet_name, "CrewAssignments");
        assert_eq!(cfg.warning_days, 7);
        assert_eq!(cfg.identity, IdentityScheme::Monotonic);
        assert!(!cfg.extended_schema);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.sweep_interval, None);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_eq!(
            config(&[("ROSTER_BACKEND", "postgres")]).unwrap_err(),
            ConfigError::Missing {
                name: "DATABASE_URL"
            }
        );
        let cfg = config(&[
            ("ROSTER_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/roster"),
        ])
        .unwrap();
        assert!(matches!(cfg.backend, BackendKind::Postgres { .. }));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = config(&[("ROSTER_WARNING_DAYS", "soon")]).unwrap_err();
        assert!(err.to_string().starts_with("ROSTER_WARNING_DAYS has invalid value 'soon'"));
        assert!(config(&[("ROSTER_ID_SCHEME", "uuid")]).is_err());
        assert!(config(&[("ROSTER_EXTENDED_SCHEMA", "maybe")]).is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config(&[
            ("ROSTER_WARNING_DAYS", "14"),
            ("ROSTER_ID_SCHEME", "row_count"),
            ("ROSTER_EXTENDED_SCHEMA", "true"),
            ("ROSTER_SWEEP_INTERVAL_SECS", "3600"),
            ("ROSTER_SHEET", "Fleet"),
        ])
        .unwrap();
        assert_eq!(cfg.warning_days, 14);
        assert_eq!(cfg.identity, IdentityScheme::RowCount);
        assert!(cfg.extended_schema);
        assert_eq!(cfg.sweep_interval, Some(Duration::from_secs(3600)));
        assert_eq!(cfg.sheet_name, "Fleet");
    }
}
