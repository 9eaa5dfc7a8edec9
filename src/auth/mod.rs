// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 bearer-token authentication and permission checks for the drinks API.
//!
//! ## Auth Flow
//!
//! 1. Frontend (Ionic) logs the user in with Auth0
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server, per request:
//!    - extracts the token from the header
//!    - fetches the tenant JWKS from `https://{domain}/.well-known/jwks.json`
//!    - verifies signature (RS256), expiry, issuer and audience
//!    - checks the endpoint's permission against the `permissions` claim
//!    - hands the verified [`Claims`] to the handler
//!
//! Any failing step ends the request with an [`AuthError`] JSON body.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod jwks;
pub mod permissions;
pub mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use extractor::{bearer_token, Authorized};
pub use gate::{AuthConfig, AuthGate, GateRejection};
pub use jwks::JwksFetcher;
pub use permissions::{DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission, PostDrinks};
