//! Session and authorization control plane.
//!
//! This module provides:
//! - `SessionStore`: the authenticated identity, its token, and role predicates
//! - `SessionStorage`: durable storage for the persisted session record
//! - `Authenticator`: the credential exchange seam implemented by `ApiClient`
//! - `CredentialStore`: optional OS keychain storage for login passwords
//!
//! The persisted record is two keys, `token` and `user`, always written and
//! deleted together.

pub mod credentials;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod session;
pub mod storage;

pub use credentials::CredentialStore;
pub use error::AuthError;
pub use gateway::Authenticator;
pub use identity::{AuthResponse, Credentials, Identity, Role, RoleSet};
pub use session::{ActiveSession, RestoreOutcome, SessionStore, SessionView};
pub use storage::{FileStorage, KeyringStorage, MemoryStorage, SessionStorage};
