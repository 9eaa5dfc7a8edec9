// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop API - Drinks Menu Service
//!
//! Public drink listing plus menu management gated by Auth0 bearer tokens.
//! Tokens are RS256 JWTs verified against the tenant's published JWKS and
//! must carry the permission each write route names.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Bearer token extraction, JWKS verification, permission checks
//! - `config` - Environment configuration
//! - `store` - In-memory drink storage

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
