//! Navigation admission control.
//!
//! Every navigation is checked against the target route's declared
//! requirement before any protected resource is requested. The decision is a
//! pure function of the requirement and the current session.

pub mod navigation;
pub mod route;

pub use navigation::{Decision, NavigationGuard, DEFAULT_LANDING_ROUTE, DEFAULT_LOGIN_ROUTE};
pub use route::{normalize_path, Resolved, Route, RouteRequirement, RouteTable};
