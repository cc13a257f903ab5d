use crate::{CourseGraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog key of a course, e.g. `CS101`. Never empty, never padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CourseGraphError::InvalidInput(
                "course code must not be empty".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CourseCode {
    type Error = CourseGraphError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

/// One row of the course list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub course_code: CourseCode,
    pub course_name: String,
    pub credit_hours: Option<u32>,
    pub avg_gpa: Option<f64>,
}

/// Grade statistics of one instructor for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorStats {
    #[serde(rename = "Instructor")]
    pub instructor: Option<String>,
    #[serde(rename = "Percentage_As")]
    pub percentage_a: Option<f64>,
    #[serde(rename = "Percentage_Bs")]
    pub percentage_b: Option<f64>,
    #[serde(rename = "Percentage_Cs")]
    pub percentage_c: Option<f64>,
    #[serde(rename = "Percentage_Ds")]
    pub percentage_d: Option<f64>,
    #[serde(rename = "Percentage_Fs")]
    pub percentage_f: Option<f64>,
    #[serde(rename = "Total_Students")]
    pub total_students: Option<u32>,
    /// Rounded to two decimals; `None` when a percentage is missing.
    pub gpa: Option<f64>,
}

impl InstructorStats {
    pub fn percentages(&self) -> [Option<f64>; 5] {
        [
            self.percentage_a,
            self.percentage_b,
            self.percentage_c,
            self.percentage_d,
            self.percentage_f,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteItem {
    pub prerequisite_course_code: CourseCode,
    pub requirement_group_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentItem {
    pub concurrent_enrollment_course_code: CourseCode,
}

/// Course fields merged with its instructor, prerequisite and
/// concurrent-enrollment lists.
///
/// `course` is `None` only for the legacy empty-detail response of an unknown
/// course; the three lists are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Option<CourseSummary>,
    #[serde(default)]
    pub instructors: Vec<InstructorStats>,
    #[serde(default)]
    pub prerequisites: Vec<PrerequisiteItem>,
    #[serde(rename = "concurrentEnrollment", default)]
    pub concurrent_enrollment: Vec<ConcurrentItem>,
}

impl CourseDetail {
    pub fn empty() -> Self {
        Self {
            course: None,
            instructors: Vec::new(),
            prerequisites: Vec::new(),
            concurrent_enrollment: Vec::new(),
        }
    }

    pub fn course_code(&self) -> Option<&CourseCode> {
        self.course.as_ref().map(|c| &c.course_code)
    }
}
