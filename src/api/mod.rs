//! Request handling for the RBAC policy adapter.
//!
//! [`PolicyHandler`] serves target-group events; [`build_router`] exposes
//! the same handler over a local HTTP listener.

mod handler;
mod server;

pub use handler::PolicyHandler;
pub use server::build_router;
