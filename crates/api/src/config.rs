use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Read a variable, falling back to `default` when unset.
pub(crate) fn env_or(var: &'static str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Read a required, non-empty variable.
pub(crate) fn env_required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Read and parse a variable, falling back to `default` when unset.
pub(crate) fn env_parse<T: std::str::FromStr>(
    var: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = env_or(var, default);
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Present only when both `SEED_ADMIN_EMAIL` and `SEED_ADMIN_PASSWORD` are set.
    pub seed_admin: Option<SeedAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `DATABASE_URL`         | required                   |
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SEED_ADMIN_EMAIL`     | unset                      |
    /// | `SEED_ADMIN_PASSWORD`  | unset                      |
    /// | `SEED_ADMIN_NAME`      | `Administrator`            |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env_required("DATABASE_URL")?;
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_parse("PORT", "3000")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", "30")?;

        let seed_admin = match (
            std::env::var("SEED_ADMIN_EMAIL"),
            std::env::var("SEED_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(SeedAdmin {
                    email,
                    password,
                    full_name: env_or("SEED_ADMIN_NAME", "Administrator"),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env()?,
            seed_admin,
        })
    }

    /// `HOST:PORT` as a socket address. `HOST` must be an IP literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            var: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
