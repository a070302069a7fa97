use tracing::debug;

use super::route::{normalize_path, Resolved, RouteRequirement, RouteTable};
use crate::auth::SessionView;

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Redirect(target) => Some(target),
        }
    }
}

/// Admission gate run before every navigation.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    login_route: String,
    landing_route: String,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_ROUTE, DEFAULT_LANDING_ROUTE)
    }
}

impl NavigationGuard {
    pub fn new(login_route: &str, landing_route: &str) -> Self {
        Self {
            login_route: normalize_path(login_route),
            landing_route: normalize_path(landing_route),
        }
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    /// Decide admission for a route requirement. Checks run in a fixed order
    /// and the first one that applies is final:
    ///
    /// 1. auth required, not authenticated: go to login
    /// 2. guest only, authenticated: go to landing
    /// 3. roles declared: allow if any is held, otherwise go to landing
    /// 4. allow
    pub fn evaluate<S>(&self, requirement: &RouteRequirement, session: &S) -> Decision
    where
        S: SessionView + ?Sized,
    {
        if requirement.requires_auth && !session.is_authenticated() {
            return Decision::Redirect(self.login_route.clone());
        }
        if requirement.requires_guest && session.is_authenticated() {
            return Decision::Redirect(self.landing_route.clone());
        }
        if !requirement.roles.is_empty() {
            let permitted = requirement.roles.iter().any(|role| session.has_role(role));
            return if permitted {
                Decision::Allow
            } else {
                Decision::Redirect(self.landing_route.clone())
            };
        }
        Decision::Allow
    }

    /// Resolve `path` in `routes` and evaluate it. Aliases redirect to their
    /// target; undeclared paths are allowed.
    pub fn admit<S>(&self, routes: &RouteTable, path: &str, session: &S) -> Decision
    where
        S: SessionView + ?Sized,
    {
        let decision = match routes.resolve(path) {
            Resolved::Alias(target) => Decision::Redirect(target.to_string()),
            Resolved::Route(route) => self.evaluate(&route.requirement, session),
            Resolved::NotFound => Decision::Allow,
        };
        debug!(path, ?decision, "Navigation evaluated");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, RoleSet};

    struct FakeSession(Option<RoleSet>);

    impl FakeSession {
        fn anonymous() -> Self {
            Self(None)
        }

        fn with_roles(roles: &[Role]) -> Self {
            Self(Some(roles.iter().copied().collect()))
        }
    }

    impl SessionView for FakeSession {
        fn is_authenticated(&self) -> bool {
            self.0.is_some()
        }

        fn has_role(&self, role: Role) -> bool {
            self.0.as_ref().map(|r| r.contains(role)).unwrap_or(false)
        }
    }

    fn login() -> Decision {
        Decision::Redirect(DEFAULT_LOGIN_ROUTE.to_string())
    }

    fn landing() -> Decision {
        Decision::Redirect(DEFAULT_LANDING_ROUTE.to_string())
    }

    #[test]
    fn test_auth_route_without_session_redirects_to_login() {
        let guard = NavigationGuard::default();
        let decision = guard.evaluate(&RouteRequirement::authenticated(), &FakeSession::anonymous());
        assert_eq!(decision, login());
    }

    #[test]
    fn test_guest_route_with_session_redirects_to_landing() {
        let guard = NavigationGuard::default();
        let session = FakeSession::with_roles(&[Role::Student]);
        assert_eq!(guard.evaluate(&RouteRequirement::guest(), &session), landing());
        assert!(guard
            .evaluate(&RouteRequirement::guest(), &FakeSession::anonymous())
            .is_allowed());
    }

    #[test]
    fn test_role_mismatch_redirects_to_landing() {
        let guard = NavigationGuard::default();
        let requirement = RouteRequirement::public().with_roles([Role::Admin]);
        let session = FakeSession::with_roles(&[Role::Student]);
        assert_eq!(guard.evaluate(&requirement, &session), landing());
    }

    #[test]
    fn test_any_matching_role_allows() {
        let guard = NavigationGuard::default();
        let requirement = RouteRequirement::public().with_roles([Role::Admin]);
        let session = FakeSession::with_roles(&[Role::Admin, Role::Teacher]);
        assert_eq!(guard.evaluate(&requirement, &session), Decision::Allow);

        let either = RouteRequirement::authenticated().with_roles([Role::Admin, Role::Teacher]);
        let teacher = FakeSession::with_roles(&[Role::Teacher]);
        assert!(guard.evaluate(&either, &teacher).is_allowed());
    }

    #[test]
    fn test_anonymous_user_on_role_route_without_auth_flag_goes_to_landing() {
        // Without requires_auth the role check still runs, and nobody holds a role.
        let guard = NavigationGuard::default();
        let requirement = RouteRequirement::public().with_roles([Role::Admin]);
        assert_eq!(guard.evaluate(&requirement, &FakeSession::anonymous()), landing());
    }

    #[test]
    fn test_anonymous_user_is_sent_to_login_before_role_check() {
        let guard = NavigationGuard::default();
        let requirement = RouteRequirement::authenticated().with_roles([Role::Admin]);
        assert_eq!(guard.evaluate(&requirement, &FakeSession::anonymous()), login());
    }

    #[test]
    fn test_requires_auth_wins_over_requires_guest() {
        let guard = NavigationGuard::default();
        let both = RouteRequirement {
            requires_auth: true,
            requires_guest: true,
            roles: RoleSet::new(),
        };
        assert_eq!(guard.evaluate(&both, &FakeSession::anonymous()), login());
        assert_eq!(
            guard.evaluate(&both, &FakeSession::with_roles(&[Role::Admin])),
            landing()
        );
    }

    #[test]
    fn test_no_requirement_allows_everyone() {
        let guard = NavigationGuard::default();
        assert!(guard
            .evaluate(&RouteRequirement::public(), &FakeSession::anonymous())
            .is_allowed());
        assert!(guard
            .evaluate(&RouteRequirement::public(), &FakeSession::with_roles(&[]))
            .is_allowed());
    }

    #[test]
    fn test_admit_against_standard_routes() {
        let guard = NavigationGuard::default();
        let routes = RouteTable::standard();
        let student = FakeSession::with_roles(&[Role::Student]);
        let admin = FakeSession::with_roles(&[Role::Admin]);

        assert_eq!(guard.admit(&routes, "/", &student), landing());
        assert_eq!(guard.admit(&routes, "/grades", &FakeSession::anonymous()), login());
        assert_eq!(guard.admit(&routes, "/login", &admin), landing());
        assert_eq!(guard.admit(&routes, "/teachers", &student), landing());
        assert!(guard.admit(&routes, "/teachers", &admin).is_allowed());
        assert!(guard.admit(&routes, "/students", &student).is_allowed());
        assert!(guard
            .admit(&routes, "/missing", &FakeSession::anonymous())
            .is_allowed());
    }

    #[test]
    fn test_custom_routes_are_normalized() {
        let guard = NavigationGuard::new("signin/", "/home/");
        assert_eq!(guard.login_route(), "/signin");
        assert_eq!(guard.landing_route(), "/home");
        assert_eq!(
            guard.evaluate(&RouteRequirement::authenticated(), &FakeSession::anonymous()),
            Decision::Redirect("/signin".to_string())
        );
    }
}
