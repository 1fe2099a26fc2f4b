//! Domain types for the RBAC policy adapter.
//!
//! The policy document and the load-balancer envelope it travels in.

mod event;
mod policy;

pub use event::*;
pub use policy::*;

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
