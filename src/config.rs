// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `BACKEND_API_URL` | Booking backend base URL | `http://localhost:5000/api` |
//! | `BACKEND_TIMEOUT_SECS` | Backend request timeout | `10` |
//! | `ACCESS_TOKEN_COOKIE` | Name of the access token cookie | `accessToken` |
//! | `STATIC_DIR` | Built front-end assets (with `index.html`) | `./dist` |
//! | `TLS_CERT_PATH` | PEM certificate chain; TLS is enabled with `TLS_KEY_PATH` | unset |
//! | `TLS_KEY_PATH` | PEM private key | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const BACKEND_API_URL_ENV: &str = "BACKEND_API_URL";
pub const BACKEND_TIMEOUT_ENV: &str = "BACKEND_TIMEOUT_SECS";
pub const ACCESS_TOKEN_COOKIE_ENV: &str = "ACCESS_TOKEN_COOKIE";
pub const STATIC_DIR_ENV: &str = "STATIC_DIR";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const DEFAULT_STATIC_DIR: &str = "./dist";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not valid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files for serving HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend_api_url: String,
    pub backend_timeout: Duration,
    pub access_token_cookie: String,
    pub static_dir: PathBuf,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let ip: IpAddr = host.parse().map_err(|e: AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            reason: e.to_string(),
        })?;
        let bind_addr = SocketAddr::new(ip, port);

        let backend_api_url =
            get(BACKEND_API_URL_ENV).unwrap_or_else(|| DEFAULT_BACKEND_API_URL.to_string());
        let parsed = Url::parse(&backend_api_url).map_err(|e| ConfigError::Invalid {
            name: BACKEND_API_URL_ENV,
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                name: BACKEND_API_URL_ENV,
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let backend_timeout = match get(BACKEND_TIMEOUT_ENV) {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: BACKEND_TIMEOUT_ENV,
                reason: e.to_string(),
            })?),
            None => Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected 'json' or 'pretty', got {other:?}"),
                })
            }
        };

        Ok(Self {
            bind_addr,
            backend_api_url,
            backend_timeout,
            access_token_cookie: get(ACCESS_TOKEN_COOKIE_ENV)
                .unwrap_or_else(|| DEFAULT_ACCESS_TOKEN_COOKIE.to_string()),
            static_dir: get(STATIC_DIR_ENV)
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            tls,
            log_format,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            backend_api_url: DEFAULT_BACKEND_API_URL.to_string(),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
            access_token_cookie: DEFAULT_ACCESS_TOKEN_COOKIE.to_string(),
            static_dir: DEFAULT_STATIC_DIR.into(),
            tls: None,
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(load(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8443"),
            ("BACKEND_API_URL", "https://api.example.com/api"),
            ("BACKEND_TIMEOUT_SECS", "3"),
            ("ACCESS_TOKEN_COOKIE", "token"),
            ("LOG_FORMAT", "JSON"),
            ("TLS_CERT_PATH", "/certs/cert.pem"),
            ("TLS_KEY_PATH", "/certs/key.pem"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8443");
        assert_eq!(config.backend_api_url, "https://api.example.com/api");
        assert_eq!(config.backend_timeout, Duration::from_secs(3));
        assert_eq!(config.access_token_cookie, "token");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.tls.unwrap().key, PathBuf::from("/certs/key.pem"));
    }

    #[test]
    fn ipv6_host_binds() {
        let config = load(&[("HOST", "::"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.bind_addr.to_string(), "[::]:8080");

        let config = load(&[("HOST", "::1")]).unwrap();
        assert!(config.bind_addr.is_ipv6());
        assert!(matches!(
            load(&[("HOST", "localhost")]),
            Err(ConfigError::Invalid { name: "HOST", .. })
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("PORT", "  "), ("ACCESS_TOKEN_COOKIE", "")]).unwrap();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.access_token_cookie, DEFAULT_ACCESS_TOKEN_COOKIE);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("BACKEND_API_URL", "ftp://files.example.com")]),
            Err(ConfigError::Invalid { name: "BACKEND_API_URL", .. })
        ));
        assert!(matches!(
            load(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { name: "LOG_FORMAT", .. })
        ));
    }

    #[test]
    fn tls_requires_both_paths() {
        assert_eq!(
            load(&[("TLS_CERT_PATH", "/certs/cert.pem")]).unwrap_err(),
            ConfigError::Incomplete(TLS_CERT_PATH_ENV, TLS_KEY_PATH_ENV)
        );
    }
}
