// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and the `Authorized` axum extractor.
//!
//! Use `Authorized<P>` in handlers to require permission `P`:
//!
//! ```rust,ignore
//! async fn create_drink(
//!     Authorized { claims, .. }: Authorized<PostDrinks>,
//!     State(state): State<AppState>,
//! ) -> impl IntoResponse {
//!     // claims grant "post:drinks"
//! }
//! ```

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::error::HeaderFault;
use super::gate::{AuthGate, GateRejection};
use super::permissions::Permission;
use super::{AuthError, Claims};

/// Pull the bearer token out of the `Authorization` header.
///
/// The header must be exactly two whitespace-separated parts, the first of
/// which is `bearer` in any case.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader(HeaderFault::NotBearerToken))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::AuthorizationHeaderMissing)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeader(HeaderFault::MissingBearerPrefix));
    }

    let token = parts
        .next()
        .ok_or(AuthError::InvalidHeader(HeaderFault::TokenNotFound))?;

    if parts.next().is_some() {
        return Err(AuthError::InvalidHeader(HeaderFault::NotBearerToken));
    }

    Ok(token)
}

/// Extractor for requests whose token grants permission `P`.
///
/// Rejects with the gate's JSON error before the handler body runs.
pub struct Authorized<P: Permission> {
    pub claims: Claims,
    _permission: PhantomData<fn() -> P>,
}

impl<P: Permission> Authorized<P> {
    /// Wrap claims without going through the gate. Test-only.
    #[cfg(test)]
    pub(crate) fn assume(claims: Claims) -> Self {
        Self {
            claims,
            _permission: PhantomData,
        }
    }
}

impl<S, P> FromRequestParts<S> for Authorized<P>
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
    P: Permission,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        let claims = gate.authorize(&parts.headers, P::NAME).await?;

        Ok(Authorized {
            claims,
            _permission: PhantomData,
        })
    }
}
