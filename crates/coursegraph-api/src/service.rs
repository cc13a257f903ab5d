//! Read-side aggregation over a [`CourseStore`].

use coursegraph_core::gpa::{round2, weighted_gpa};
use coursegraph_core::{
    ConcurrentItem, Course, CourseCode, CourseDetail, CourseGraphError, CourseStore,
    CourseSummary, InstructorGradeRecord, InstructorStats, PrerequisiteItem, Result,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn CourseStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        &self.store
    }

    /// Every course with its student-weighted average GPA, ascending by code.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<CourseSummary>> {
        let (courses, grades) =
            tokio::try_join!(self.store.list_courses(), self.store.grade_records(None))?;

        let mut by_course: HashMap<CourseCode, Vec<InstructorGradeRecord>> = HashMap::new();
        for record in grades {
            by_course
                .entry(record.course_code.clone())
                .or_default()
                .push(record);
        }

        let mut summaries: Vec<CourseSummary> = courses
            .into_iter()
            .map(|course| {
                let records = by_course.get(&course.code).map_or(&[][..], Vec::as_slice);
                let avg_gpa = course_average(records);
                summarize(course, avg_gpa)
            })
            .collect();
        summaries.sort_by(|a, b| a.course_code.cmp(&b.course_code));

        debug!(courses = summaries.len(), "listed courses");
        Ok(summaries)
    }

    /// One course with its instructors, prerequisites and concurrent options.
    #[instrument(skip(self), fields(course = %code))]
    pub async fn course_detail(&self, code: &CourseCode) -> Result<CourseDetail> {
        let course = self
            .store
            .find_course(code)
            .await?
            .ok_or_else(|| CourseGraphError::CourseNotFound(code.to_string()))?;

        let (grades, prerequisites, concurrent) = tokio::try_join!(
            self.store.grade_records(Some(code)),
            self.store.prerequisites(code),
            self.store.concurrent_enrollment(code),
        )?;

        let avg_gpa = course_average(&grades);
        let instructors = instructor_stats(grades);

        let mut edges: Vec<(i64, CourseCode)> = prerequisites
            .into_iter()
            .map(|edge| (edge.group_id, edge.prerequisite))
            .collect();
        edges.sort();
        edges.dedup();

        let mut partners: Vec<CourseCode> = concurrent.into_iter().map(|e| e.partner).collect();
        partners.sort();
        partners.dedup();

        debug!(
            instructors = instructors.len(),
            prerequisites = edges.len(),
            concurrent = partners.len(),
            "assembled course detail"
        );

        Ok(CourseDetail {
            course: Some(summarize(course, avg_gpa)),
            instructors,
            prerequisites: edges
                .into_iter()
                .map(|(group_id, code)| PrerequisiteItem {
                    prerequisite_course_code: code,
                    requirement_group_id: group_id,
                })
                .collect(),
            concurrent_enrollment: partners
                .into_iter()
                .map(|code| ConcurrentItem {
                    concurrent_enrollment_course_code: code,
                })
                .collect(),
        })
    }
}

fn summarize(course: Course, avg_gpa: Option<f64>) -> CourseSummary {
    CourseSummary {
        course_code: course.code,
        course_name: course.name,
        credit_hours: course.credit_hours,
        avg_gpa,
    }
}

/// Weighted GPA over rows that have students and a complete distribution.
fn course_average(records: &[InstructorGradeRecord]) -> Option<f64> {
    weighted_gpa(records.iter().filter(|r| r.has_students()).filter_map(|record| {
        if !record.distribution.is_consistent() {
            warn!(
                course = %record.course_code,
                instructor = record.instructor.as_deref().unwrap_or("unknown"),
                total = record.distribution.total().unwrap_or_default(),
                "grade distribution does not add up to 100%"
            );
        }
        let gpa = record.distribution.gpa()?;
        let students = record.total_students?;
        Some((gpa, students))
    }))
}

/// Instructor rows with students, best GPA first and undefined GPAs last.
fn instructor_stats(records: Vec<InstructorGradeRecord>) -> Vec<InstructorStats> {
    let mut stats: Vec<InstructorStats> = records
        .into_iter()
        .filter(InstructorGradeRecord::has_students)
        .map(|record| InstructorStats {
            gpa: record.distribution.gpa().map(round2),
            instructor: record.instructor,
            percentage_a: record.distribution.a,
            percentage_b: record.distribution.b,
            percentage_c: record.distribution.c,
            percentage_d: record.distribution.d,
            percentage_f: record.distribution.f,
            total_students: record.total_students,
        })
        .collect();

    // sort_by is stable, ties keep store order
    stats.sort_by(|a, b| match (a.gpa, b.gpa) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    stats
}
