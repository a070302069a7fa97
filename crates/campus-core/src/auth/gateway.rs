use async_trait::async_trait;

use super::{AuthError, AuthResponse, Credentials};

/// Exchanges login credentials for a token and identity. Stateless.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, AuthError>;
}
