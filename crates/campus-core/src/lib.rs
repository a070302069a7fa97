//! Client library for the campus academic-records API.
//!
//! The session and authorization control plane lives in [`auth`] and
//! [`guard`]; [`api`] provides the token-carrying transport and typed
//! gateways for the five record collections; [`Portal`] wires them together.

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod portal;

pub use api::{ApiClient, ApiError, Resource, ResourceGateway};
pub use auth::{AuthError, Credentials, Identity, Role, RoleSet, SessionStore};
pub use config::Config;
pub use guard::{Decision, NavigationGuard, RouteRequirement, RouteTable};
pub use portal::Portal;
