//! Application wiring: one session store, one transport, one guard.
//!
//! The `Portal` owns the session for the life of the process. It restores it
//! once at startup, keeps the transport's bearer token in step with it, and
//! admits every navigation before a protected collection is requested.

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::auth::{AuthError, Credentials, Identity, RestoreOutcome, SessionStorage, SessionStore};
use crate::config::Config;
use crate::guard::{Decision, NavigationGuard, RouteTable};

pub struct Portal {
    config: Config,
    session: SessionStore,
    api: ApiClient,
    routes: RouteTable,
    guard: NavigationGuard,
}

impl Portal {
    /// Build from config, using the configured session storage backend.
    pub fn new(config: Config) -> Result<Self> {
        let storage = config.session_storage()?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Box<dyn SessionStorage>) -> Result<Self> {
        let api = ApiClient::with_timeout(&config.api_base_url, config.request_timeout())?;
        let guard = NavigationGuard::new(&config.login_route, &config.landing_route);
        debug!(base_url = %config.api_base_url, "Portal configured");

        Ok(Self {
            config,
            session: SessionStore::with_storage(storage),
            api,
            routes: RouteTable::standard(),
            guard,
        })
    }

    /// Replace the route table.
    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Restore the persisted session. Call once at startup.
    pub fn start(&mut self) -> RestoreOutcome {
        let outcome = self.session.restore();
        self.sync_token();
        info!(?outcome, "Session restore finished");
        outcome
    }

    pub async fn login(&mut self, credentials: Credentials) -> Result<Identity, AuthError> {
        let identity = self.session.login(&self.api, &credentials).await?;
        self.sync_token();
        self.config.last_email = Some(identity.email.clone());
        Ok(identity)
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.sync_token();
    }

    /// Admission decision for `path` against the live session.
    pub fn navigate(&self, path: &str) -> Decision {
        self.guard.admit(&self.routes, path, &self.session)
    }

    /// The transport, but only if `path` is admitted.
    pub fn open(&self, path: &str) -> Result<&ApiClient, Decision> {
        match self.navigate(path) {
            Decision::Allow => Ok(&self.api),
            redirect => Err(redirect),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persist the config, including the last login email.
    pub fn save_config(&self) -> Result<()> {
        self.config.save()
    }

    fn sync_token(&mut self) {
        match self.session.token() {
            Some(token) => self.api.set_token(token.to_string()),
            None => self.api.clear_token(),
        }
    }
}
