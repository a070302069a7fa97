//! REST API client module for the academic-records service.
//!
//! This module provides the `ApiClient` transport, which attaches the
//! session's bearer token, and the generic `ResourceGateway` used for the
//! students, teachers, courses, enrollments, and grades collections.

pub mod client;
pub mod error;
pub mod resource;

pub use client::ApiClient;
pub use error::ApiError;
pub use resource::{
    CourseGateway, EnrollmentGateway, GradeGateway, Resource, ResourceGateway, StudentGateway,
    TeacherGateway,
};
