//! Startup configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `sqlite` (default) | `memory`
//! - `DATABASE_URL`: sqlx SQLite URL, required when `STORAGE_MODE=sqlite`
//! - `HOST`: bind address (default: `127.0.0.1`)
//! - `PORT`: listen port (default: `3000`)
//! - `CORS_ALLOW_ORIGINS`: comma-separated origins (default: `http://localhost:5173`)
//! - `CORS_ALLOW_HEADERS`: comma-separated headers (default: `Origin,Content-Type,Accept`)
//! - `STORE_TIMEOUT_MS`: per store round trip deadline (default: `5000`)
//!
//! Everything is read once. Any invalid value is a `ConfigError`, which the
//! binary treats as fatal.

use std::{env, net::IpAddr, time::Duration};

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::service::DEFAULT_STORE_TIMEOUT;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ALLOW_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_ALLOW_HEADERS: &str = "Origin,Content-Type,Accept";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown STORAGE_MODE '{0}' (expected 'sqlite' or 'memory')")]
    InvalidStorageMode(String),

    #[error("DATABASE_URL must be set when STORAGE_MODE=sqlite")]
    MissingDatabaseUrl,

    #[error("invalid {name} '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Backend selected for the item store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Sqlite { url: String },
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub host: IpAddr,
    pub port: u16,
    pub cors_allow_origins: Vec<HeaderValue>,
    pub cors_allow_headers: Vec<HeaderName>,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty or
    /// whitespace-only values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mode = var("STORAGE_MODE").map(|mode| mode.to_lowercase());
        let storage = match mode.as_deref() {
            None | Some("sqlite") => Storage::Sqlite {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?,
            },
            Some("memory" | "in_memory") => Storage::Memory,
            Some(other) => return Err(ConfigError::InvalidStorageMode(other.to_string())),
        };

        let host = parse_value("HOST", var("HOST").as_deref().unwrap_or(DEFAULT_HOST))?;
        let port = match var("PORT") {
            Some(value) => parse_value("PORT", &value)?,
            None => DEFAULT_PORT,
        };
        let store_timeout = match var("STORE_TIMEOUT_MS") {
            Some(value) => Duration::from_millis(parse_value("STORE_TIMEOUT_MS", &value)?),
            None => DEFAULT_STORE_TIMEOUT,
        };

        let cors_allow_origins = split_list(var("CORS_ALLOW_ORIGINS"), DEFAULT_ALLOW_ORIGINS)
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOW_ORIGINS",
                    value: origin.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let cors_allow_headers = split_list(var("CORS_ALLOW_HEADERS"), DEFAULT_ALLOW_HEADERS)
            .into_iter()
            .map(|header| {
                HeaderName::from_bytes(header.as_bytes())
                    .map_err(|_| ConfigError::InvalidValue {
                        name: "CORS_ALLOW_HEADERS",
                        value: header.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            storage,
            host,
            port,
            cors_allow_origins,
            cors_allow_headers,
            store_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        match self.host {
            IpAddr::V4(host) => format!("{host}:{}", self.port),
            IpAddr::V6(host) => format!("[{host}]:{}", self.port),
        }
    }

    /// A lone `*` in either list means "any"; tower-http refuses wildcards
    /// inside explicit lists.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins = if self.cors_allow_origins.iter().any(|o| o == "*") {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(self.cors_allow_origins.clone())
        };
        let headers = if self.cors_allow_headers.iter().any(|h| h == "*") {
            AllowHeaders::any()
        } else {
            AllowHeaders::list(self.cors_allow_headers.clone())
        };
        CorsLayer::new()
            .allow_origin(origins)
            .allow_headers(headers)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

fn split_list(value: Option<String>, default: &str) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or(default)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
