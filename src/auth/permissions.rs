// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission strings and the permission check.
//!
//! Auth0 puts the API permissions granted to the caller in a `permissions`
//! array claim. Each gated endpoint names exactly one permission, expressed
//! as a marker type so handlers declare it in their signature:
//!
//! ```rust,ignore
//! async fn create_drink(Authorized { claims, .. }: Authorized<PostDrinks>) { /* ... */ }
//! ```

use super::error::ClaimsFault;
use super::{AuthError, Claims};

/// A permission string required by an endpoint.
pub trait Permission: 'static {
    const NAME: &'static str;
}

/// `get:drinks-detail`: read the long-form drink list.
pub struct GetDrinksDetail;

/// `post:drinks`: create drinks.
pub struct PostDrinks;

/// `patch:drinks`: edit drinks.
pub struct PatchDrinks;

/// `delete:drinks`: remove drinks.
pub struct DeleteDrinks;

impl Permission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

impl Permission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

impl Permission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

impl Permission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}

/// Check that `claims` grant `permission`.
///
/// A missing (or non-list) `permissions` entry is reported separately from a
/// list that simply lacks the permission.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::InvalidClaims(ClaimsFault::MissingPermissions))?;

    if granted.contains(&permission) {
        Ok(())
    } else {
        Err(AuthError::Unauthorized)
    }
}
