//! Server settings read from the environment.

use std::net::SocketAddr;

use moodmingle_core::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
pub const DEFAULT_SESSION_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Browser origin allowed to call the API with credentials.
    pub cors_origin: Option<String>,
    pub session_days: i64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let bind_addr = lookup("MOODMINGLE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "MOODMINGLE_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?;

        let session_days = match lookup("MOODMINGLE_SESSION_DAYS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "MOODMINGLE_SESSION_DAYS".to_string(),
                        reason: format!("expected a positive number of days, got {:?}", raw),
                    })
                }
            },
            None => DEFAULT_SESSION_DAYS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin: lookup("MOODMINGLE_CORS_ORIGIN").filter(|v| !v.trim().is_empty()),
            session_days,
        })
    }
}
