//! Remote RBAC policy client.
//!
//! The handler only sees [`RbacPolicyClient`]; [`ManagementClient`] talks to
//! the management API over HTTPS.

mod error;
mod management;

pub use error::*;
pub use management::*;

use async_trait::async_trait;

use crate::domain::Policy;

/// Read and replace a project's RBAC policy.
#[async_trait]
pub trait RbacPolicyClient: Send + Sync {
    /// Fetch the current policy for a project.
    async fn get(&self, project_id: &str) -> ClientResult<Policy>;

    /// Replace the policy for a project and return what the remote now holds.
    async fn set(&self, project_id: &str, policy: Policy) -> ClientResult<Policy>;
}
