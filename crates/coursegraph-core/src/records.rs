//! Catalog rows as stored, and their validated counterparts.
//!
//! `Raw*` structs mirror the catalog tables column for column, with numeric
//! columns left as [`RawValue`]. The `TryFrom` conversions are the only way
//! to obtain the typed records used by aggregation.

use crate::numeric::{parse_count, parse_identifier, parse_percentage, RawValue};
use crate::{gpa, CourseCode, CourseGraphError, Result};
use serde::{Deserialize, Serialize};

/// Tolerance for distributions that should add up to 100%.
pub const DISTRIBUTION_TOLERANCE: f64 = 1.0;

/// Row of `Course_Information`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCourseRow {
    pub course_code: String,
    pub course_name: String,
    #[serde(default)]
    pub credit_hours: Option<RawValue>,
}

/// Row of `course_gpa_by_instructor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGradeRow {
    #[serde(rename = "Course_Code")]
    pub course_code: String,
    #[serde(rename = "Instructor", default)]
    pub instructor: Option<String>,
    #[serde(rename = "Percentage_As", default)]
    pub percentage_a: Option<RawValue>,
    #[serde(rename = "Percentage_Bs", default)]
    pub percentage_b: Option<RawValue>,
    #[serde(rename = "Percentage_Cs", default)]
    pub percentage_c: Option<RawValue>,
    #[serde(rename = "Percentage_Ds", default)]
    pub percentage_d: Option<RawValue>,
    #[serde(rename = "Percentage_Fs", default)]
    pub percentage_f: Option<RawValue>,
    #[serde(rename = "Total_Students", default)]
    pub total_students: Option<RawValue>,
}

/// Row of `Prerequisite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPrerequisiteRow {
    pub course_code: String,
    pub prerequisite_course_code: String,
    pub requirement_group_id: Option<RawValue>,
}

/// Row of `Concurrent_Enrollment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConcurrentRow {
    pub course_code: String,
    pub concurrent_enrollment_course_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    pub credit_hours: Option<u32>,
}

impl TryFrom<RawCourseRow> for Course {
    type Error = CourseGraphError;

    fn try_from(row: RawCourseRow) -> Result<Self> {
        let code = stored_code(&row.course_code)?;
        let credit_hours = parse_count("credit_hours", row.credit_hours.as_ref())
            .map_err(|e| in_course(&code, e))?;
        Ok(Self {
            code,
            name: row.course_name,
            credit_hours,
        })
    }
}

/// A/B/C/D/F percentages of one instructor's students.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GradeDistribution {
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub d: Option<f64>,
    pub f: Option<f64>,
}

impl GradeDistribution {
    pub fn new(a: f64, b: f64, c: f64, d: f64, f: f64) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
            c: Some(c),
            d: Some(d),
            f: Some(f),
        }
    }

    /// All five percentages, or `None` when any is missing.
    pub fn complete(&self) -> Option<[f64; 5]> {
        Some([self.a?, self.b?, self.c?, self.d?, self.f?])
    }

    /// Unrounded GPA. Undefined when any percentage is missing.
    pub fn gpa(&self) -> Option<f64> {
        self.complete().map(gpa::distribution_gpa)
    }

    pub fn total(&self) -> Option<f64> {
        self.complete().map(|p| p.iter().sum())
    }

    /// Whether the percentages add up to 100 within [`DISTRIBUTION_TOLERANCE`].
    /// Incomplete distributions are not judged.
    pub fn is_consistent(&self) -> bool {
        self.total()
            .map_or(true, |t| (t - 100.0).abs() <= DISTRIBUTION_TOLERANCE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructorGradeRecord {
    pub course_code: CourseCode,
    pub instructor: Option<String>,
    pub total_students: Option<u32>,
    pub distribution: GradeDistribution,
}

impl InstructorGradeRecord {
    /// Rows with no students (or an unknown count) never contribute to a GPA.
    pub fn has_students(&self) -> bool {
        self.total_students.is_some_and(|n| n > 0)
    }
}

impl TryFrom<RawGradeRow> for InstructorGradeRecord {
    type Error = CourseGraphError;

    fn try_from(row: RawGradeRow) -> Result<Self> {
        let course_code = stored_code(&row.course_code)?;
        let (distribution, total_students) =
            parse_grade_columns(&row).map_err(|e| in_course(&course_code, e))?;

        Ok(Self {
            course_code,
            instructor: row.instructor.filter(|name| !name.trim().is_empty()),
            total_students,
            distribution,
        })
    }
}

fn parse_grade_columns(row: &RawGradeRow) -> Result<(GradeDistribution, Option<u32>)> {
    let distribution = GradeDistribution {
        a: parse_percentage("Percentage_As", row.percentage_a.as_ref())?,
        b: parse_percentage("Percentage_Bs", row.percentage_b.as_ref())?,
        c: parse_percentage("Percentage_Cs", row.percentage_c.as_ref())?,
        d: parse_percentage("Percentage_Ds", row.percentage_d.as_ref())?,
        f: parse_percentage("Percentage_Fs", row.percentage_f.as_ref())?,
    };
    let students = parse_count("Total_Students", row.total_students.as_ref())?;
    Ok((distribution, students))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrerequisiteEdge {
    pub course_code: CourseCode,
    pub prerequisite: CourseCode,
    pub group_id: i64,
}

impl TryFrom<RawPrerequisiteRow> for PrerequisiteEdge {
    type Error = CourseGraphError;

    fn try_from(row: RawPrerequisiteRow) -> Result<Self> {
        let course_code = stored_code(&row.course_code)?;
        let prerequisite = stored_code(&row.prerequisite_course_code)
            .map_err(|e| in_course(&course_code, e))?;
        let group_id = parse_identifier("requirement_group_id", row.requirement_group_id.as_ref())
            .map_err(|e| in_course(&course_code, e))?;
        Ok(Self {
            course_code,
            prerequisite,
            group_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcurrentEdge {
    pub course_code: CourseCode,
    pub partner: CourseCode,
}

impl TryFrom<RawConcurrentRow> for ConcurrentEdge {
    type Error = CourseGraphError;

    fn try_from(row: RawConcurrentRow) -> Result<Self> {
        let course_code = stored_code(&row.course_code)?;
        let partner = stored_code(&row.concurrent_enrollment_course_code)
            .map_err(|e| in_course(&course_code, e))?;
        Ok(Self {
            course_code,
            partner,
        })
    }
}

/// Course codes read from a store are data, not caller input.
fn stored_code(raw: &str) -> Result<CourseCode> {
    CourseCode::parse(raw).map_err(|e| match e {
        CourseGraphError::InvalidInput(msg) => CourseGraphError::InvalidRecord(msg),
        other => other,
    })
}

/// Prefix a parse error with the course it belongs to.
fn in_course(code: &CourseCode, err: CourseGraphError) -> CourseGraphError {
    match err {
        CourseGraphError::InvalidRecord(msg) => {
            CourseGraphError::InvalidRecord(format!("course {code}: {msg}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade_row(code: &str, a: RawValue, students: RawValue) -> RawGradeRow {
        RawGradeRow {
            course_code: code.to_string(),
            instructor: Some("Smith, Jane".to_string()),
            percentage_a: Some(a),
            percentage_b: Some("15".into()),
            percentage_c: Some(RawValue::Number(5.0)),
            percentage_d: Some("0.00".into()),
            percentage_f: Some(RawValue::Number(0.0)),
            total_students: Some(students),
        }
    }

    #[test]
    fn grade_row_parses_mixed_representations() {
        let record =
            InstructorGradeRecord::try_from(grade_row("CS101", "80".into(), "50".into())).unwrap();
        assert_eq!(record.course_code.as_str(), "CS101");
        assert_eq!(record.total_students, Some(50));
        assert_eq!(record.distribution.gpa(), Some(3.75));
        assert!(record.distribution.is_consistent());
        assert!(record.has_students());
    }

    #[test]
    fn invalid_percentage_names_the_course() {
        let err = InstructorGradeRecord::try_from(grade_row("CS101", "180".into(), "5".into()))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CS101"), "{msg}");
        assert!(msg.contains("Percentage_As"), "{msg}");
    }

    #[test]
    fn missing_percentage_leaves_gpa_undefined() {
        let mut row = grade_row("CS101", "80".into(), "5".into());
        row.percentage_d = None;
        let record = InstructorGradeRecord::try_from(row).unwrap();
        assert_eq!(record.distribution.gpa(), None);
        assert!(record.distribution.is_consistent());
    }

    #[test]
    fn zero_or_missing_students_do_not_count() {
        let zero =
            InstructorGradeRecord::try_from(grade_row("CS101", "80".into(), "0".into())).unwrap();
        assert!(!zero.has_students());

        let mut row = grade_row("CS101", "80".into(), "0".into());
        row.total_students = None;
        assert!(!InstructorGradeRecord::try_from(row).unwrap().has_students());
    }

    #[test]
    fn inconsistent_distribution_is_detected() {
        let dist = GradeDistribution::new(50.0, 10.0, 0.0, 0.0, 0.0);
        assert!(!dist.is_consistent());
        let dist = GradeDistribution::new(33.3, 33.3, 33.3, 0.0, 0.0);
        assert!(dist.is_consistent());
    }

    #[test]
    fn prerequisite_row_requires_group() {
        let row = RawPrerequisiteRow {
            course_code: "CS201".into(),
            prerequisite_course_code: "CS101".into(),
            requirement_group_id: None,
        };
        assert!(PrerequisiteEdge::try_from(row).is_err());

        let row = RawPrerequisiteRow {
            course_code: "CS201".into(),
            prerequisite_course_code: "CS101".into(),
            requirement_group_id: Some(RawValue::Number(1.0)),
        };
        let edge = PrerequisiteEdge::try_from(row).unwrap();
        assert_eq!(edge.group_id, 1);
        assert_eq!(edge.prerequisite.as_str(), "CS101");
    }

    #[test]
    fn course_row_parses_credit_hours() {
        let course = Course::try_from(RawCourseRow {
            course_code: " CS101 ".into(),
            course_name: "Intro".into(),
            credit_hours: Some("4".into()),
        })
        .unwrap();
        assert_eq!(course.code.as_str(), "CS101");
        assert_eq!(course.credit_hours, Some(4));
    }
}
