// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification against a fetched key set.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use super::error::{ClaimsFault, HeaderFault};
use super::gate::AuthConfig;
use super::jwks::{KeySet, RsaKey};
use super::{AuthError, Claims};

/// Verify `token` with the key named by its `kid` and return its claims.
///
/// Checks, in order: header decodes and names a `kid`; the key set has that
/// `kid` as an RSA signing key; signature under one of the configured
/// algorithms; then `exp`, `nbf`, `aud` and `iss`.
pub fn verify_token(token: &str, key_set: &KeySet, config: &AuthConfig) -> Result<Claims, AuthError> {
    let header =
        decode_header(token).map_err(|_| AuthError::InvalidHeader(HeaderFault::MalformedTokenHeader))?;

    let kid = header
        .kid
        .ok_or(AuthError::InvalidHeader(HeaderFault::MissingKeyId))?;

    let jwk = key_set
        .find(&kid)
        .ok_or(AuthError::InvalidHeader(HeaderFault::NoMatchingKey))?;
    let rsa_key = RsaKey::from_jwk(jwk)
        .filter(RsaKey::signs)
        .ok_or(AuthError::InvalidHeader(HeaderFault::UnparseableToken))?;

    let decoding_key = DecodingKey::from_rsa_components(&rsa_key.n, &rsa_key.e)
        .map_err(|_| AuthError::InvalidHeader(HeaderFault::UnparseableToken))?;

    let token_data = decode::<Map<String, Value>>(token, &decoding_key, &validation(config))
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => {
                AuthError::InvalidClaims(ClaimsFault::AudienceOrIssuer)
            }
            _ => AuthError::InvalidHeader(HeaderFault::UnparseableToken),
        })?;

    Ok(Claims::from_verified(token_data.claims))
}

fn validation(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    if !config.algorithms.is_empty() {
        validation.algorithms = config.algorithms.clone();
    }
    validation.leeway = config.leeway_secs;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "aud", "iss"]);
    validation.set_audience(&[&config.audience]);
    validation.set_issuer(&[config.issuer()]);
    validation
}
