use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{timestamp, EntityRef, TeacherSummary};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub course_code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub credit_hours: Option<u32>,
    #[serde(default)]
    pub teacher: Option<TeacherSummary>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<EntityRef>,
}

impl Resource for Course {
    const COLLECTION: &'static str = "courses";
    type Id = i64;
    type Patch = CoursePatch;
}

/// Course as embedded in enrollments and grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: i64,
    pub course_code: String,
    pub name: String,
    #[serde(default)]
    pub credit_hours: Option<u32>,
}
