// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests: a fixed RSA signing key, its published
//! JWKS entry and helpers to mint tokens against a wiremock tenant.

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::AuthConfig;

pub const TEST_DOMAIN: &str = "coffee-test.us.auth0.com";
pub const TEST_AUDIENCE: &str = "coffee";
pub const TEST_KID: &str = "coffee-test-key-1";

const SIGNING_KEY_PEM: &str = include_str!("auth/testdata/signing_key.pem");
const FOREIGN_KEY_PEM: &str = include_str!("auth/testdata/foreign_key.pem");

/// Base64url modulus of `signing_key.pem`.
const SIGNING_KEY_N: &str = "tYmTOZ_Wmp6Ijj_CU6p48-egS_Y6DlIfIev2r5uCYuxuFldOjbqCXmG8uN3aHdJ4vEiRZs2kKaTHi8ocKiNWc6ohIN64oll2uG6WV7Ff4hnBzZ5SCYPZOgnM-XUNaslEEObHocao92IA2KQcT7hmRCSGA7LMyR2hJpWsOoTt1yG7R4hwBCHgjecZ0OsEkFE8yuZ1UqYQhk5qpjd02a5o1gQdcYX-JDjrXuc7ZNKbi8YJbcE5yg5li0777QROliV2c9vKtxABzVY3jiFQqpBWF2nccVLzPATNmBq_ZTCKtih0caXRMsQEAo8Ef7bjQpOY8NWibb7qgmCxAakFmHFQuw";
const SIGNING_KEY_E: &str = "AQAB";

pub fn now() -> i64 {
    get_current_timestamp() as i64
}

/// JWKS document publishing the test signing key.
pub fn jwks_document() -> Value {
    json!({
        "keys": [{
            "alg": "RS256",
            "kty": "RSA",
            "use": "sig",
            "kid": TEST_KID,
            "n": SIGNING_KEY_N,
            "e": SIGNING_KEY_E,
            "x5t": "ignored",
        }]
    })
}

/// Valid claims for the test tenant granting `permissions`.
pub fn claims_for(permissions: &[&str]) -> Value {
    json!({
        "iss": format!("https://{TEST_DOMAIN}/"),
        "sub": "auth0|barista",
        "aud": TEST_AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

fn sign_with(pem: &str, claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_owned);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("test key parses");
    encode(&header, claims, &key).expect("token encodes")
}

/// Sign `claims` with the published test key.
pub fn sign_token(claims: &Value, kid: Option<&str>) -> String {
    sign_with(SIGNING_KEY_PEM, claims, kid)
}

/// Sign `claims` with a key that is not in the JWKS, claiming `kid`.
pub fn sign_with_foreign_key(claims: &Value, kid: &str) -> String {
    sign_with(FOREIGN_KEY_PEM, claims, Some(kid))
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("token is header-safe"),
    );
    headers
}

/// Serve [`jwks_document`] and expect exactly `expected_fetches` reads.
pub async fn mount_jwks(server: &MockServer, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/.well-known/jwks.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks_document()))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

/// Test tenant config whose key set is served by `server`.
pub fn test_auth_config(server: &MockServer) -> AuthConfig {
    AuthConfig::new(TEST_DOMAIN, TEST_AUDIENCE)
        .with_jwks_url(format!("{}/.well-known/jwks.json", server.uri()))
}
