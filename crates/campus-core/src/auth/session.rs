//! In-memory session state and its persisted mirror.

use tracing::{debug, info, warn};

use super::storage::{SessionStorage, IDENTITY_KEY, TOKEN_KEY};
use super::{AuthError, AuthResponse, Authenticator, Credentials, Identity, Role};

/// Read-only view of the session used for admission decisions.
pub trait SessionView {
    fn is_authenticated(&self) -> bool;
    fn has_role(&self, role: Role) -> bool;
}

/// A token together with the identity it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub token: String,
    pub identity: Identity,
}

/// What `SessionStore::restore` found in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    /// One or both keys were missing or unreadable.
    Absent,
    /// The identity record did not deserialize; both keys were deleted.
    Corrupt,
}

/// Owner of "who is logged in".
///
/// The in-memory session is authoritative while the process lives. Storage
/// is written on `establish`, deleted on `clear`, and read only by `restore`.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    active: Option<ActiveSession>,
    last_error: Option<String>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self::with_storage(Box::new(storage))
    }

    pub fn with_storage(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            storage,
            active: None,
            last_error: None,
        }
    }

    /// Replace the current session with the server's authentication result.
    pub fn establish(&mut self, response: AuthResponse) {
        let (token, identity) = response.into_parts();
        self.persist(&token, &identity);
        info!(user_id = identity.id, roles = identity.roles.len(), "Session established");
        self.active = Some(ActiveSession { token, identity });
    }

    /// Drop the session and its persisted record. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            info!("Session cleared");
        }
        self.remove_persisted();
    }

    /// Rebuild the session from storage. Never fails; anything unusable is
    /// treated as no session.
    pub fn restore(&mut self) -> RestoreOutcome {
        self.active = None;

        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => return RestoreOutcome::Absent,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                return RestoreOutcome::Absent;
            }
        };

        let raw_identity = match self.storage.get(IDENTITY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RestoreOutcome::Absent,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted identity");
                return RestoreOutcome::Absent;
            }
        };

        match serde_json::from_str::<Identity>(&raw_identity) {
            Ok(identity) => {
                debug!(user_id = identity.id, "Session restored");
                self.active = Some(ActiveSession { token, identity });
                RestoreOutcome::Restored
            }
            Err(e) => {
                warn!(error = %e, "Persisted identity is corrupt, discarding session");
                self.remove_persisted();
                RestoreOutcome::Corrupt
            }
        }
    }

    /// Authenticate and, on success, establish the session.
    ///
    /// On failure the current session is left untouched. Callers are expected
    /// to serialize login attempts; overlapping calls are not coordinated.
    pub async fn login<A>(
        &mut self,
        gateway: &A,
        credentials: &Credentials,
    ) -> Result<Identity, AuthError>
    where
        A: Authenticator + ?Sized,
    {
        self.last_error = None;

        if !credentials.is_complete() {
            return Err(self.fail(AuthError::AuthenticationFailed(
                "Email and password required".to_string(),
            )));
        }

        match gateway.authenticate(credentials).await {
            Ok(response) => {
                self.establish(response);
                self.identity()
                    .cloned()
                    .ok_or_else(|| AuthError::AuthenticationFailed("Login failed".to_string()))
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(self.fail(e))
            }
        }
    }

    pub fn logout(&mut self) {
        self.clear();
    }

    pub fn session(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.active.as_ref().map(|s| &s.identity)
    }

    pub fn token(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.token.as_str())
    }

    /// Reason for the most recent failed login, cleared by the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.identity().map(|i| i.roles.contains(role)).unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_teacher(&self) -> bool {
        self.has_role(Role::Teacher)
    }

    pub fn is_student(&self) -> bool {
        self.has_role(Role::Student)
    }

    fn fail(&mut self, err: AuthError) -> AuthError {
        self.last_error = Some(err.message().to_string());
        err
    }

    /// Write both keys or neither.
    fn persist(&self, token: &str, identity: &Identity) {
        let serialized = match serde_json::to_string(identity) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize identity, session not persisted");
                return;
            }
        };

        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            warn!(error = %e, "Failed to persist token");
            self.remove_persisted();
            return;
        }
        if let Err(e) = self.storage.set(IDENTITY_KEY, &serialized) {
            warn!(error = %e, "Failed to persist identity");
            self.remove_persisted();
        }
    }

    fn remove_persisted(&self) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(error = %e, key, "Failed to delete persisted session key");
            }
        }
    }
}

impl SessionView for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn has_role(&self, role: Role) -> bool {
        SessionStore::has_role(self, role)
    }
}
