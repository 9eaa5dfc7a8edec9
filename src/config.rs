// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup and is
//! read-only afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `AUTH0_DOMAIN` | Auth0 tenant domain (token issuer) | Required |
//! | `AUTH0_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH0_ALGORITHMS` | Comma-separated accepted signing algorithms | `RS256` |
//! | `AUTH0_JWKS_URL` | Override for the JWKS endpoint | `https://{domain}/.well-known/jwks.json` |
//! | `JWKS_TIMEOUT_SECS` | JWKS fetch timeout | `10` |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache TTL, `0` disables caching | `0` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance | `60` |
//! | `SEED_DEMO_DRINK` | Insert the demo `water` drink at startup | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::auth::gate::{DEFAULT_JWKS_TIMEOUT, DEFAULT_LEEWAY_SECS};
use crate::auth::AuthConfig;
use crate::logging::LogFormat;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const AUTH0_AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";
pub const AUTH0_ALGORITHMS_ENV: &str = "AUTH0_ALGORITHMS";
pub const AUTH0_JWKS_URL_ENV: &str = "AUTH0_JWKS_URL";
pub const JWKS_TIMEOUT_ENV: &str = "JWKS_TIMEOUT_SECS";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const SEED_DEMO_DRINK_ENV: &str = "SEED_DEMO_DRINK";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub seed_demo_drink: bool,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::invalid(HOST_ENV, &host, "expected an IP address"))?;
        let port = match var(PORT_ENV) {
            Some(port) => port
                .parse()
                .map_err(|_| ConfigError::invalid(PORT_ENV, &port, "expected a port number"))?,
            None => DEFAULT_PORT,
        };

        let domain = var(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let domain = validate_domain(&domain)?;
        let audience = var(AUTH0_AUDIENCE_ENV).ok_or(ConfigError::Missing(AUTH0_AUDIENCE_ENV))?;

        let mut auth = AuthConfig::new(domain, audience)
            .with_leeway(parse_secs(JWT_LEEWAY_ENV, var(JWT_LEEWAY_ENV))?.unwrap_or(DEFAULT_LEEWAY_SECS))
            .with_jwks_timeout(
                parse_secs(JWKS_TIMEOUT_ENV, var(JWKS_TIMEOUT_ENV))?
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_JWKS_TIMEOUT),
            )
            .with_jwks_cache_ttl(Duration::from_secs(
                parse_secs(JWKS_CACHE_TTL_ENV, var(JWKS_CACHE_TTL_ENV))?.unwrap_or(0),
            ));

        if let Some(algorithms) = var(AUTH0_ALGORITHMS_ENV) {
            auth = auth.with_algorithms(parse_algorithms(&algorithms)?);
        }
        if let Some(jwks_url) = var(AUTH0_JWKS_URL_ENV) {
            validate_jwks_url(&jwks_url)?;
            auth = auth.with_jwks_url(jwks_url);
        }

        let seed_demo_drink = match var(SEED_DEMO_DRINK_ENV) {
            Some(value) => parse_flag(SEED_DEMO_DRINK_ENV, &value)?,
            None => false,
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(value) => LogFormat::from_str(&value)
                .map_err(|reason| ConfigError::invalid(LOG_FORMAT_ENV, &value, reason))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            auth,
            seed_demo_drink,
            log_format,
        })
    }
}

/// The issuer is built as `https://{domain}/`, so the domain must be a bare host.
///
/// Returns the host as the URL parser normalises it (lowercase), matching the
/// `iss` Auth0 puts in its tokens.
fn validate_domain(domain: &str) -> Result<String, ConfigError> {
    let url = Url::parse(&format!("https://{domain}/"))
        .map_err(|e| ConfigError::invalid(AUTH0_DOMAIN_ENV, domain, e.to_string()))?;

    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(domain) && url.port().is_none() => {
            Ok(host.to_string())
        }
        _ => Err(ConfigError::invalid(
            AUTH0_DOMAIN_ENV,
            domain,
            "expected a bare host name without scheme, port or path",
        )),
    }
}

fn validate_jwks_url(jwks_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(jwks_url)
        .map_err(|e| ConfigError::invalid(AUTH0_JWKS_URL_ENV, jwks_url, e.to_string()))?;
    if !matches!(url.scheme(), "https" | "http") {
        return Err(ConfigError::invalid(
            AUTH0_JWKS_URL_ENV,
            jwks_url,
            "expected an http(s) URL",
        ));
    }
    Ok(())
}

/// Keys in a JWKS are RSA, so only RSA-family algorithms are accepted.
fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let algorithm = Algorithm::from_str(name)
            .map_err(|_| ConfigError::invalid(AUTH0_ALGORITHMS_ENV, value, format!("unknown algorithm {name}")))?;
        if !matches!(
            algorithm,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512
        ) {
            return Err(ConfigError::invalid(
                AUTH0_ALGORITHMS_ENV,
                value,
                format!("{name} is not an RSA algorithm"),
            ));
        }
        algorithms.push(algorithm);
    }

    if algorithms.is_empty() {
        return Err(ConfigError::invalid(AUTH0_ALGORITHMS_ENV, value, "no algorithms listed"));
    }
    Ok(algorithms)
}

fn parse_secs(name: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    value
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::invalid(name, &value, "expected whole seconds"))
        })
        .transpose()
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::invalid(name, value, "expected true or false")),
    }
}
