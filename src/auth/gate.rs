// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The auth gate: extract, fetch key set, verify, check permission.
//!
//! [`AuthGate::authorize`] runs the chain for one request and returns the
//! verified [`Claims`]. [`AuthGate::guard`] is the interceptor form: it takes
//! the next operation and only invokes it when every step succeeded.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::Algorithm;
use serde::Serialize;

use super::extractor::bearer_token;
use super::jwks::{JwksError, JwksFetcher};
use super::permissions::check_permissions;
use super::verifier::verify_token;
use super::{AuthError, Claims};

/// Default clock skew tolerance (60 seconds).
pub const DEFAULT_LEEWAY_SECS: u64 = 60;

/// Default key-set fetch timeout.
pub const DEFAULT_JWKS_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication configuration, fixed at start-up.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Auth0 tenant domain, e.g. `dev-abc.us.auth0.com`
    pub domain: String,
    /// Expected `aud`
    pub audience: String,
    /// Accepted signing algorithms
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerance for `exp` and `nbf`
    pub leeway_secs: u64,
    /// Key-set endpoint; defaults to the tenant's well-known URL
    pub jwks_url: String,
    pub jwks_timeout: Duration,
    /// `None` fetches the key set on every verification
    pub jwks_cache_ttl: Option<Duration>,
}

impl AuthConfig {
    /// Create a configuration for `domain` and `audience` with RS256 only.
    pub fn new(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            jwks_url: format!("https://{domain}/.well-known/jwks.json"),
            domain,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            leeway_secs: DEFAULT_LEEWAY_SECS,
            jwks_timeout: DEFAULT_JWKS_TIMEOUT,
            jwks_cache_ttl: None,
        }
    }

    /// Expected `iss`: `https://{domain}/`.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    pub fn with_jwks_timeout(mut self, timeout: Duration) -> Self {
        self.jwks_timeout = timeout;
        self
    }

    pub fn with_jwks_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }
}

/// Why the gate refused to run the guarded operation.
#[derive(Debug, thiserror::Error)]
pub enum GateRejection {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    KeySet(#[from] JwksError),
}

#[derive(Serialize)]
struct UnavailableBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            GateRejection::Auth(err) => err.into_response(),
            GateRejection::KeySet(_) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = Json(UnavailableBody {
                    success: false,
                    error: status.as_u16(),
                    message: "authentication service unavailable",
                });
                (status, body).into_response()
            }
        }
    }
}

/// Composes the auth steps around permission-gated operations.
///
/// Holds only read-only configuration and the key-set fetcher; every
/// request is judged independently.
#[derive(Clone)]
pub struct AuthGate {
    config: Arc<AuthConfig>,
    jwks: JwksFetcher,
}

impl AuthGate {
    pub fn new(config: AuthConfig) -> Result<Self, JwksError> {
        let mut jwks = JwksFetcher::new(config.jwks_url.clone(), config.jwks_timeout)?;
        if let Some(ttl) = config.jwks_cache_ttl {
            jwks = jwks.with_cache_ttl(ttl);
        }

        Ok(Self {
            config: Arc::new(config),
            jwks,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn jwks(&self) -> &JwksFetcher {
        &self.jwks
    }

    /// Run the full chain for one request and return its verified claims.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, GateRejection> {
        let result = self.run_chain(headers, permission).await;

        match &result {
            Ok(claims) => tracing::debug!(
                permission,
                subject = claims.subject().unwrap_or("unknown"),
                "Request authorized"
            ),
            Err(GateRejection::Auth(err)) => tracing::warn!(
                permission,
                code = err.error_code(),
                status = err.status_code().as_u16(),
                "Request rejected: {err}"
            ),
            Err(GateRejection::KeySet(err)) => {
                tracing::error!(permission, error = %err, "Key set unavailable")
            }
        }

        result
    }

    async fn run_chain(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, GateRejection> {
        let token = bearer_token(headers)?;
        let key_set = self.jwks.key_set().await?;
        let claims = verify_token(token, &key_set, &self.config)?;
        check_permissions(permission, &claims)?;
        Ok(claims)
    }

    /// Authorize, then hand the claims to `next`.
    ///
    /// `next` is not called at all when any step fails.
    pub async fn guard<F, Fut, T>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        next: F,
    ) -> Result<T, GateRejection>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(next(claims).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::{ClaimsFault, HeaderFault};
    use crate::test_support::{
        bearer_headers, claims_for, mount_jwks, sign_token, test_auth_config, TEST_KID,
    };
    use axum::body::to_bytes;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn gate_with_jwks(expected_fetches: u64) -> (AuthGate, MockServer) {
        let server = MockServer::start().await;
        mount_jwks(&server, expected_fetches).await;
        let gate = AuthGate::new(test_auth_config(&server)).unwrap();
        (gate, server)
    }

    #[test]
    fn config_derives_issuer_and_jwks_url() {
        let config = AuthConfig::new("dev-9xo5gdfc.us.auth0.com", "coffee");
        assert_eq!(config.issuer(), "https://dev-9xo5gdfc.us.auth0.com/");
        assert_eq!(
            config.jwks_url,
            "https://dev-9xo5gdfc.us.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(config.algorithms, vec![Algorithm::RS256]);
        assert!(config.jwks_cache_ttl.is_none());
    }

    #[tokio::test]
    async fn guard_invokes_operation_with_claims() {
        let (gate, _server) = gate_with_jwks(1).await;
        let token = sign_token(&claims_for(&["get:drinks-detail"]), Some(TEST_KID));

        let subject = gate
            .guard(&bearer_headers(&token), "get:drinks-detail", |claims| async move {
                claims.subject().map(str::to_owned)
            })
            .await
            .expect("authorized");

        assert_eq!(subject.as_deref(), Some("auth0|barista"));
    }

    #[tokio::test]
    async fn guard_skips_operation_on_missing_permission() {
        let (gate, _server) = gate_with_jwks(1).await;
        let token = sign_token(&claims_for(&["get:drinks-detail"]), Some(TEST_KID));
        let calls = AtomicUsize::new(0);

        let result = gate
            .guard(&bearer_headers(&token), "delete:drinks", |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(matches!(result, Err(GateRejection::Auth(AuthError::Unauthorized))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bad_scheme_fails_before_any_fetch() {
        let (gate, _server) = gate_with_jwks(0).await;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc123"));

        let result = gate.authorize(&headers, "get:drinks-detail").await;
        assert!(matches!(
            result,
            Err(GateRejection::Auth(AuthError::InvalidHeader(
                HeaderFault::MissingBearerPrefix
            )))
        ));
    }

    #[tokio::test]
    async fn missing_permissions_claim_is_rejected() {
        let (gate, _server) = gate_with_jwks(1).await;
        let mut claims = claims_for(&[]);
        claims.as_object_mut().unwrap().remove("permissions");
        let token = sign_token(&claims, Some(TEST_KID));

        let result = gate.authorize(&bearer_headers(&token), "post:drinks").await;
        assert!(matches!(
            result,
            Err(GateRejection::Auth(AuthError::InvalidClaims(
                ClaimsFault::MissingPermissions
            )))
        ));
    }

    #[tokio::test]
    async fn unreachable_key_set_is_a_500() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let gate = AuthGate::new(test_auth_config(&server)).unwrap();
        let token = sign_token(&claims_for(&["post:drinks"]), Some(TEST_KID));

        let rejection = gate
            .authorize(&bearer_headers(&token), "post:drinks")
            .await
            .unwrap_err();
        assert!(matches!(rejection, GateRejection::KeySet(JwksError::Status(500))));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "authentication service unavailable");
    }

    #[tokio::test]
    async fn cached_key_set_is_reused_across_requests() {
        let server = MockServer::start().await;
        mount_jwks(&server, 1).await;
        let config = test_auth_config(&server).with_jwks_cache_ttl(Duration::from_secs(300));
        let gate = AuthGate::new(config).unwrap();
        let token = sign_token(&claims_for(&["patch:drinks"]), Some(TEST_KID));

        for _ in 0..3 {
            gate.authorize(&bearer_headers(&token), "patch:drinks")
                .await
                .expect("authorized");
        }
    }
}
