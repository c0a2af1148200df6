// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles and role requirements for authorization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Dashboard for admins.
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
/// Dashboard for staff members.
pub const EMPLOYEE_DASHBOARD_PATH: &str = "/employee/dashboard";
/// Generic dashboard for customers and anything unrecognised.
pub const USER_DASHBOARD_PATH: &str = "/dashboard";

/// User roles as reported by the booking backend.
///
/// ## Roles
///
/// - `Admin` - Platform administrators (content, promos, payments)
/// - `Employee` - Staff handling bookings and consultations
/// - `User` - Customers booking pujas and consultations
/// - `Unknown` - Any role string this gateway does not recognise
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Role {
    /// Platform administrator
    Admin,
    /// Staff member
    Employee,
    /// Customer
    User,
    /// Unrecognised role string
    Unknown,
}

impl Role {
    /// Parse a role name (case-insensitive). Unrecognised names map to `Unknown`.
    pub fn parse(s: &str) -> Role {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "employee" => Role::Employee,
            "user" => Role::User,
            _ => Role::Unknown,
        }
    }

    /// Default landing page for this role.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_DASHBOARD_PATH,
            Role::Employee => EMPLOYEE_DASHBOARD_PATH,
            Role::User | Role::Unknown => USER_DASHBOARD_PATH,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Employee => write!(f, "EMPLOYEE"),
            Role::User => write!(f, "USER"),
            Role::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Error returned when a role requirement names no usable role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleRequirementError {
    #[error("role requirement is empty")]
    Empty,
    #[error("unknown role in requirement: {0}")]
    UnknownRole(String),
}

/// The set of roles allowed into a guarded subtree.
///
/// Never empty and never contains `Role::Unknown`, so an unrecognised
/// session role can never satisfy a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: BTreeSet<Role>,
}

impl RoleRequirement {
    /// Require exactly one role.
    pub fn single(role: Role) -> Result<Self, RoleRequirementError> {
        Self::any_of([role])
    }

    /// Require any one of the given roles.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Result<Self, RoleRequirementError> {
        let mut set = BTreeSet::new();
        for role in roles {
            if role == Role::Unknown {
                return Err(RoleRequirementError::UnknownRole(role.to_string()));
            }
            set.insert(role);
        }
        if set.is_empty() {
            return Err(RoleRequirementError::Empty);
        }
        Ok(Self { roles: set })
    }

    /// Parse a comma separated list of role names (case-insensitive).
    pub fn parse(list: &str) -> Result<Self, RoleRequirementError> {
        let mut roles = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match Role::parse(name) {
                Role::Unknown => return Err(RoleRequirementError::UnknownRole(name.to_string())),
                role => roles.push(role),
            }
        }
        Self::any_of(roles)
    }

    /// Whether `role` is a member of this requirement.
    pub fn admits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }
}
