//! Data models for academic records.
//!
//! Each of the five collections has an entity type and a patch type. A
//! patch is the partial form used for create and update: fields left as
//! `None` are not sent, so the server keeps their current values.
//!
//! - `Student` / `StudentPatch`
//! - `Teacher` / `TeacherPatch`
//! - `Course` / `CoursePatch`
//! - `Enrollment` / `EnrollmentRequest`
//! - `Grade` / `GradePatch`

pub mod course;
pub mod enrollment;
pub mod grade;
pub mod student;
pub mod teacher;
mod timestamp;

use serde::{Deserialize, Serialize};

pub use course::{Course, CoursePatch, CourseSummary};
pub use enrollment::{EnrolledStudent, Enrollment, EnrollmentRequest, EnrollmentStatus};
pub use grade::{is_letter_grade, GradedEnrollment, GradedStudent, Grade, GradePatch, StudentUser, LETTER_GRADES};
pub use student::{Student, StudentPatch};
pub use teacher::{Teacher, TeacherPatch, TeacherSummary};

/// Reference to another entity by id, as sent in request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EntityRef {
    pub id: i64,
}
