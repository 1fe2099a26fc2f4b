//! RBAC policy domain types.
//!
//! Mirrors the policy document served by the management API. Built-in
//! entries (`stytch_*`) are system-managed; custom roles and resources
//! belong to the caller.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// The authorization policy of a single project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Built-in role granted to every member.
    #[serde(deserialize_with = "null_as_default")]
    pub stytch_member: Role,
    /// Built-in administrator role.
    #[serde(deserialize_with = "null_as_default")]
    pub stytch_admin: Role,
    /// Built-in resources managed by the platform.
    #[serde(deserialize_with = "null_as_default")]
    pub stytch_resources: Vec<Resource>,
    /// Caller-defined roles.
    #[serde(deserialize_with = "null_as_default")]
    pub custom_roles: Vec<Role>,
    /// Caller-defined resources.
    #[serde(deserialize_with = "null_as_default")]
    pub custom_resources: Vec<Resource>,
}

/// A named role and the permissions it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub role_id: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub permissions: Vec<Permission>,
}

/// Actions a role may perform on one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    pub resource_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub actions: Vec<String>,
}

/// A protected resource and the actions defined on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub resource_id: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub available_actions: Vec<String>,
}

impl Policy {
    /// Returns a copy that keeps the built-in entries and drops every
    /// custom role and resource.
    pub fn without_custom_entries(&self) -> Self {
        Self {
            stytch_member: self.stytch_member.clone(),
            stytch_admin: self.stytch_admin.clone(),
            stytch_resources: self.stytch_resources.clone(),
            custom_roles: Vec::new(),
            custom_resources: Vec::new(),
        }
    }

    /// Whether the policy carries any caller-defined entries.
    pub fn has_custom_entries(&self) -> bool {
        !self.custom_roles.is_empty() || !self.custom_resources.is_empty()
    }
}
