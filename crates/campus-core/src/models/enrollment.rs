use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{timestamp, CourseSummary, Grade};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i64,
    pub student: EnrolledStudent,
    pub course: CourseSummary,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub enrolled_at: Option<NaiveDateTime>,
    pub status: String,
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Enrollment {
    pub fn status_kind(&self) -> EnrollmentStatus {
        EnrollmentStatus::from_str(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct EnrolledStudent {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub student_id: String,
}

impl EnrolledStudent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
    Other,
}

impl EnrollmentStatus {
    /// Case-insensitive; unrecognized values map to `Other`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "active" => EnrollmentStatus::Active,
            "completed" => EnrollmentStatus::Completed,
            "dropped" => EnrollmentStatus::Dropped,
            _ => EnrollmentStatus::Other,
        }
    }
}

/// Body for creating or changing an enrollment. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Resource for Enrollment {
    const COLLECTION: &'static str = "enrollments";
    type Id = i64;
    type Patch = EnrollmentRequest;
}
