// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified JWT claims.

use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the claim carrying the caller's granted permission strings.
pub const PERMISSIONS_CLAIM: &str = "permissions";

/// Claim set of a token whose signature, issuer, audience and expiry have
/// been verified.
///
/// No `Deserialize` impl and no public constructor: outside the `auth`
/// module a `Claims` only comes from
/// [`verify_token`](super::verifier::verify_token).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub(super) fn from_verified(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Build claims without verification. Test-only.
    #[cfg(test)]
    pub(crate) fn unverified(claims: Value) -> Self {
        match claims {
            Value::Object(map) => Self(map),
            _ => Self(Map::new()),
        }
    }

    /// Raw claim value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Subject (`sub`) of the token, if present.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// The `permissions` entry as a list of strings.
    ///
    /// Returns `None` when the entry is absent or is not a list. Non-string
    /// list members are skipped.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        let entries = self.get(PERMISSIONS_CLAIM)?.as_array()?;
        Some(entries.iter().filter_map(Value::as_str).collect())
    }
}
