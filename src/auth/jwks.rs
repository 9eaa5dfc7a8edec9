// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching.
//!
//! The baseline behaviour is one HTTPS read of
//! `https://{domain}/.well-known/jwks.json` per verification. A TTL cache can
//! be switched on with [`JwksFetcher::with_cache_ttl`]; the cache lock is
//! never held while the endpoint is being read.

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, PublicKeyUse};
use tokio::sync::RwLock;

/// Key-set fetch failure. Not an auth decision: the request cannot be judged.
#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("failed to build JWKS HTTP client: {0}")]
    Client(String),
    #[error("JWKS endpoint unreachable: {0}")]
    Transport(String),
    #[error("HTTP {0} from JWKS endpoint")]
    Status(u16),
    #[error("malformed JWKS document: {0}")]
    Malformed(String),
}

/// A published key set. Only the standard plural `keys` field is read.
pub type KeySet = JwkSet;

/// Minimal RSA key record built from a matching [`Jwk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    pub kid: String,
    pub usage: Option<PublicKeyUse>,
    /// Base64url modulus
    pub n: String,
    /// Base64url exponent
    pub e: String,
}

impl RsaKey {
    /// Reduce `jwk` to the fields needed for RS* verification.
    ///
    /// `None` when the key has no `kid` or is not an RSA key.
    pub fn from_jwk(jwk: &Jwk) -> Option<Self> {
        match &jwk.algorithm {
            AlgorithmParameters::RSA(rsa) => Some(Self {
                kid: jwk.common.key_id.clone()?,
                usage: jwk.common.public_key_use.clone(),
                n: rsa.n.clone(),
                e: rsa.e.clone(),
            }),
            _ => None,
        }
    }

    /// Keys published for encryption must not verify signatures.
    pub fn signs(&self) -> bool {
        !matches!(self.usage, Some(PublicKeyUse::Encryption))
    }
}

/// JWKS cache entry.
struct CacheEntry {
    key_set: KeySet,
    fetched_at: Instant,
}

/// Fetches the issuer's key set.
///
/// Cloning is cheap and clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct JwksFetcher {
    /// JWKS URL
    jwks_url: String,
    /// Cache TTL; `None` fetches on every call
    cache_ttl: Option<Duration>,
    cache: Arc<RwLock<Option<CacheEntry>>>,
    client: reqwest::Client,
}

impl JwksFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JwksError::Client(e.to_string()))?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            cache_ttl: None,
            cache: Arc::new(RwLock::new(None)),
            client,
        })
    }

    /// Enable caching for `ttl`. A zero TTL leaves caching off.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Current key set, from cache when enabled and fresh.
    pub async fn key_set(&self) -> Result<KeySet, JwksError> {
        let Some(ttl) = self.cache_ttl else {
            return self.fetch_key_set().await;
        };

        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if entry.fetched_at.elapsed() < ttl {
                    return Ok(entry.key_set.clone());
                }
            }
        }

        let key_set = self.fetch_key_set().await?;

        let mut cache = self.cache.write().await;
        *cache = Some(CacheEntry {
            key_set: key_set.clone(),
            fetched_at: Instant::now(),
        });

        Ok(key_set)
    }

    /// Read the key set from the endpoint, bypassing any cache.
    pub async fn fetch_key_set(&self) -> Result<KeySet, JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| JwksError::Transport(e.to_string()))?;
        let key_set: KeySet =
            serde_json::from_slice(&body).map_err(|e| JwksError::Malformed(e.to_string()))?;

        tracing::debug!(url = %self.jwks_url, keys = key_set.keys.len(), "Fetched JWKS");
        Ok(key_set)
    }
}
