// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why an authorization header or token header was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    /// Scheme is not `bearer` (case-insensitive)
    MissingBearerPrefix,
    /// Scheme present but nothing after it
    TokenNotFound,
    /// More than two whitespace-separated parts, or not valid text
    NotBearerToken,
    /// Token header could not be decoded at all
    MalformedTokenHeader,
    /// Token header carries no `kid`
    MissingKeyId,
    /// No key in the fetched set has the token's `kid`
    NoMatchingKey,
    /// Signature, algorithm or key material rejected during verification
    UnparseableToken,
}

impl HeaderFault {
    fn description(self) -> &'static str {
        match self {
            HeaderFault::MissingBearerPrefix => {
                "Authorization header must contain \"Bearer\" prefix."
            }
            HeaderFault::TokenNotFound => "Token not found.",
            HeaderFault::NotBearerToken => "Authorization header must be bearer token.",
            HeaderFault::MalformedTokenHeader => "Unable to decode the token header.",
            HeaderFault::MissingKeyId => {
                "Authorization header from token does not contain a kid."
            }
            HeaderFault::NoMatchingKey => "No key with matching kid found.",
            HeaderFault::UnparseableToken => "Unable to parse authentication token.",
        }
    }

    fn status_code(self) -> StatusCode {
        match self {
            HeaderFault::NoMatchingKey | HeaderFault::UnparseableToken => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Why the claim set of a verified (or verifying) token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsFault {
    /// Audience, issuer or a time-based claim did not validate
    AudienceOrIssuer,
    /// Verified claims have no `permissions` entry
    MissingPermissions,
}

impl ClaimsFault {
    fn description(self) -> &'static str {
        match self {
            ClaimsFault::AudienceOrIssuer => "Invalid claims provided; check audience and issuer.",
            ClaimsFault::MissingPermissions => "Permissions not present in provided JWT.",
        }
    }

    fn status_code(self) -> StatusCode {
        match self {
            ClaimsFault::AudienceOrIssuer => StatusCode::UNAUTHORIZED,
            ClaimsFault::MissingPermissions => StatusCode::BAD_REQUEST,
        }
    }
}

/// Authentication error type.
///
/// Every variant is terminal for the request. The gate converts it into a
/// JSON body carrying the machine-readable code, the description and the
/// HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is expected.")]
    AuthorizationHeaderMissing,
    /// Authorization header or token header is unusable
    #[error("{}", .0.description())]
    InvalidHeader(HeaderFault),
    /// Claim validation failed
    #[error("{}", .0.description())]
    InvalidClaims(ClaimsFault),
    /// Signature is valid but `exp` has passed
    #[error("Token expired.")]
    TokenExpired,
    /// Required permission is not granted
    #[error("Permission not found among accesses.")]
    Unauthorized,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    code: &'static str,
    message: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::TokenExpired => "token_expired",
            AuthError::Unauthorized => "unauthorized",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AuthorizationHeaderMissing | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidHeader(fault) => fault.status_code(),
            AuthError::InvalidClaims(fault) => fault.status_code(),
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            code: self.error_code(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
