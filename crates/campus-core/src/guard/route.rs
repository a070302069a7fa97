//! Static route declarations consumed by the navigation guard.

use std::collections::HashMap;

use crate::auth::{Role, RoleSet};

/// Admission requirements declared for a route.
///
/// `requires_auth` and `requires_guest` are not meant to be combined. If a
/// route sets both, `requires_auth` takes precedence because the guard
/// checks it first: an anonymous visitor is sent to login, and an
/// authenticated one passes the guest check untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub requires_auth: bool,
    pub requires_guest: bool,
    /// Empty means any authenticated role.
    pub roles: RoleSet,
}

impl RouteRequirement {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            requires_auth: true,
            ..Self::default()
        }
    }

    pub fn guest() -> Self {
        Self {
            requires_guest: true,
            ..Self::default()
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub requirement: RouteRequirement,
}

/// What a requested path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    Route(&'a Route),
    /// Redirect-only path.
    Alias(&'a str),
    /// Catch-all for undeclared paths; carries no requirement.
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
    aliases: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes of the academic-records client.
    pub fn standard() -> Self {
        Self::new()
            .alias("/", "/dashboard")
            .route("/login", "Login", RouteRequirement::guest())
            .route("/dashboard", "Dashboard", RouteRequirement::authenticated())
            .route("/students", "Students", RouteRequirement::authenticated())
            .route(
                "/teachers",
                "Teachers",
                RouteRequirement::authenticated().with_roles([Role::Admin]),
            )
            .route("/courses", "Courses", RouteRequirement::authenticated())
            .route("/enrollments", "Enrollments", RouteRequirement::authenticated())
            .route("/grades", "Grades", RouteRequirement::authenticated())
    }

    pub fn route(mut self, path: &str, name: &'static str, requirement: RouteRequirement) -> Self {
        self.routes
            .insert(normalize_path(path), Route { name, requirement });
        self
    }

    pub fn alias(mut self, path: &str, target: &str) -> Self {
        self.aliases
            .insert(normalize_path(path), normalize_path(target));
        self
    }

    pub fn get(&self, path: &str) -> Option<&Route> {
        self.routes.get(&normalize_path(path))
    }

    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        let path = normalize_path(path);
        if let Some(target) = self.aliases.get(&path) {
            return Resolved::Alias(target);
        }
        match self.routes.get(&path) {
            Some(route) => Resolved::Route(route),
            None => Resolved::NotFound,
        }
    }

    /// Requirement for a path; undeclared paths have none.
    pub fn requirement(&self, path: &str) -> RouteRequirement {
        self.get(path)
            .map(|r| r.requirement.clone())
            .unwrap_or_default()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

/// Strip query and fragment, drop a trailing slash, ensure a leading slash.
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
