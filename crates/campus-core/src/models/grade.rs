use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{timestamp, CourseSummary};
use crate::api::Resource;

/// Letter grades accepted by the records API, best first.
pub const LETTER_GRADES: [&str; 12] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "F",
];

pub fn is_letter_grade(s: &str) -> bool {
    LETTER_GRADES.contains(&s)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub grade_value: f64,
    #[serde(default)]
    pub letter_grade: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub graded_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub enrollment: Option<GradedEnrollment>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Grade {
    pub fn student_name(&self) -> Option<String> {
        let student = &self.enrollment.as_ref()?.student;
        Some(match student.user {
            Some(ref user) if !user.full_name.is_empty() => user.full_name.clone(),
            _ => format!("{} {}", student.first_name, student.last_name),
        })
    }

    pub fn course_name(&self) -> Option<&str> {
        self.enrollment.as_ref().map(|e| e.course.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GradedEnrollment {
    pub student: GradedStudent,
    pub course: CourseSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GradedStudent {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub user: Option<StudentUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct StudentUser {
    pub id: i64,
    pub full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GradePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_grade: Option<String>,
    #[serde(
        default,
        deserialize_with = "timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub graded_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Resource for Grade {
    const COLLECTION: &'static str = "grades";
    type Id = i64;
    type Patch = GradePatch;
}
