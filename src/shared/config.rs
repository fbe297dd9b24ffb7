use std::env;
use thiserror::Error;

use crate::auth::adapter::outgoing::jwt::JwtConfig;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HasherKind {
    Bcrypt { cost: u32 },
    Argon2,
}

/// Credentials for the administrator created at start-up when absent.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub page_size: u64,
    pub client_url: String,
    pub password_hasher: HasherKind,
    pub access_policy: Option<String>,
    pub run_migrations: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    /// Loads `.env.{RUST_ENV}` (falling back to `.env`) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let env_file = format!(".env.{}", environment);
        if dotenvy::from_filename(&env_file).is_err() {
            dotenvy::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let environment = get("RUST_ENV").unwrap_or_else(|| "development".to_string());
        let database_url = required("DATABASE_URL")?;
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", get("PORT"), 8080u16)?;

        let jwt_secret = required("JWT_SECRET")?;
        let jwt_expiry = parse_or("JWT_EXPIRY", get("JWT_EXPIRY"), 86_400i64)?;
        let jwt = JwtConfig::new(jwt_secret, jwt_expiry)?;

        let page_size = parse_or(
            "PAGE_SIZE",
            get("PAGE_SIZE").or_else(|| get("DATA_FETCH_PAGE_LIMIT")),
            DEFAULT_PAGE_SIZE,
        )?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "PAGE_SIZE",
                reason: "must be at least 1".to_string(),
            });
        }

        let password_hasher = match get("PASSWORD_HASHER").as_deref().map(str::trim) {
            None | Some("") | Some("bcrypt") => HasherKind::Bcrypt {
                cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), DEFAULT_BCRYPT_COST)?,
            },
            Some("argon2") => HasherKind::Argon2,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PASSWORD_HASHER",
                    reason: format!("expected bcrypt or argon2, got '{other}'"),
                })
            }
        };

        let bootstrap_admin = match (
            get("ADMIN_USERNAME"),
            get("ADMIN_EMAIL"),
            get("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(BootstrapAdmin {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_USERNAME",
                    reason: "ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"
                        .to_string(),
                })
            }
        };

        Ok(Self {
            environment,
            database_url,
            host,
            port,
            jwt,
            page_size,
            client_url: get("CLIENT_URL").unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
            password_hasher,
            access_policy: get("ACCESS_POLICY").filter(|p| !p.trim().is_empty()),
            run_migrations: parse_or("RUN_MIGRATIONS", get("RUN_MIGRATIONS"), true)?,
            bootstrap_admin,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
