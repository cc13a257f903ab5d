//! View models for the course list and course detail pages.
//!
//! Everything here is pure: builders take the Query Service output (or the
//! failure that replaced it) and produce display-ready strings.

use crate::client::FetchError;
use coursegraph_core::grouping::{group_prerequisites, with_separators};
use coursegraph_core::{CourseCode, CourseDetail, CourseSummary, InstructorStats};
use url::Url;

pub const LIST_FAILURE: &str = "Failed to fetch courses. Please try again.";
pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_gpa(gpa: Option<f64>) -> String {
    gpa.map_or_else(|| NOT_AVAILABLE.to_string(), |gpa| format!("{gpa:.2}"))
}

pub fn format_percentage(pct: Option<f64>) -> String {
    pct.map_or_else(|| NOT_AVAILABLE.to_string(), |pct| format!("{pct:.1}%"))
}

pub fn format_count(count: Option<u32>) -> String {
    count.map_or_else(|| NOT_AVAILABLE.to_string(), |count| count.to_string())
}

/// Chart label of an instructor: the text before the first comma, untrimmed.
pub fn instructor_label(name: Option<&str>) -> String {
    match name {
        Some(name) => name.split(',').next().unwrap_or(name).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Origin the detail links are resolved against; only the path is kept.
const SITE_ORIGIN: &str = "http://catalog.invalid/";

/// Site-relative link to a course detail page, the code percent-encoded as a
/// single path segment.
pub fn course_href(code: &CourseCode) -> String {
    Url::parse(SITE_ORIGIN)
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut()
                .ok()?
                .clear()
                .extend(["course", code.as_str()]);
            Some(url.path().to_string())
        })
        .unwrap_or_else(|| "/".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseLink {
    pub code: String,
    pub href: String,
}

impl From<&CourseCode> for CourseLink {
    fn from(code: &CourseCode) -> Self {
        Self {
            code: code.to_string(),
            href: course_href(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseRow {
    pub link: CourseLink,
    pub name: String,
    pub credit_hours: String,
    pub gpa: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListPage {
    Loaded(Vec<CourseRow>),
    Failed(String),
}

impl ListPage {
    pub fn build(result: Result<Vec<CourseSummary>, FetchError>) -> Self {
        match result {
            Ok(courses) => ListPage::Loaded(
                courses
                    .iter()
                    .map(|course| CourseRow {
                        link: CourseLink::from(&course.course_code),
                        name: course.course_name.clone(),
                        credit_hours: format_count(course.credit_hours),
                        gpa: format_gpa(course.avg_gpa),
                    })
                    .collect(),
            ),
            Err(err) => ListPage::Failed(err.server_message().unwrap_or(LIST_FAILURE).to_string()),
        }
    }

    pub fn course_count(&self) -> usize {
        match self {
            ListPage::Loaded(rows) => rows.len(),
            ListPage::Failed(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub gpa: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructorRow {
    pub name: String,
    pub gpa: String,
    pub total_students: String,
    pub percentages: [String; 5],
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequirementGroupView {
    pub heading: &'static str,
    pub explanation: &'static str,
    pub courses: Vec<CourseLink>,
    /// Whether an "AND" separator follows this group.
    pub and_follows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub code: String,
    pub name: String,
    pub credit_hours: String,
    pub avg_gpa: String,
    pub chart: Vec<ChartBar>,
    pub instructors: Vec<InstructorRow>,
    pub requirement_groups: Vec<RequirementGroupView>,
    pub concurrent: Vec<CourseLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPage {
    Loaded(Box<DetailView>),
    NotFound,
    Failed(String),
}

impl DetailPage {
    /// Build the page for `requested`. A detail for any other course is a
    /// stale response and is reported as a failure.
    pub fn build(
        requested: &CourseCode,
        result: Result<Option<CourseDetail>, FetchError>,
    ) -> Self {
        let detail = match result {
            Ok(Some(detail)) => detail,
            Ok(None) => return DetailPage::NotFound,
            Err(err) => return DetailPage::failed(&err),
        };

        let Some(course) = detail.course.as_ref() else {
            return DetailPage::NotFound;
        };
        if &course.course_code != requested {
            return DetailPage::failed(&FetchError::Stale {
                requested: requested.to_string(),
                received: course.course_code.to_string(),
            });
        }

        let groups = group_prerequisites(&detail.prerequisites);
        let requirement_groups = with_separators(&groups)
            .map(|(group, and_follows)| {
                let kind = group.kind();
                RequirementGroupView {
                    heading: kind.heading(),
                    explanation: kind.explanation(),
                    courses: group.courses.iter().map(CourseLink::from).collect(),
                    and_follows,
                }
            })
            .collect();

        DetailPage::Loaded(Box::new(DetailView {
            code: course.course_code.to_string(),
            name: course.course_name.clone(),
            credit_hours: format_count(course.credit_hours),
            avg_gpa: format_gpa(course.avg_gpa),
            chart: chart_bars(&detail.instructors),
            instructors: detail.instructors.iter().map(instructor_row).collect(),
            requirement_groups,
            concurrent: detail
                .concurrent_enrollment
                .iter()
                .map(|item| CourseLink::from(&item.concurrent_enrollment_course_code))
                .collect(),
        }))
    }

    fn failed(err: &FetchError) -> Self {
        DetailPage::Failed(format!("Failed to load course details: {err}"))
    }
}

/// Bars for instructors with students and a defined GPA, in input order.
pub fn chart_bars(instructors: &[InstructorStats]) -> Vec<ChartBar> {
    instructors
        .iter()
        .filter(|i| i.total_students.is_some_and(|n| n > 0))
        .filter_map(|i| {
            Some(ChartBar {
                label: instructor_label(i.instructor.as_deref()),
                gpa: i.gpa?,
            })
        })
        .collect()
}

fn instructor_row(stats: &InstructorStats) -> InstructorRow {
    InstructorRow {
        name: stats
            .instructor
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        gpa: format_gpa(stats.gpa),
        total_students: format_count(stats.total_students),
        percentages: stats.percentages().map(format_percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegraph_core::{ConcurrentItem, CourseSummary, PrerequisiteItem};

    fn code(raw: &str) -> CourseCode {
        CourseCode::parse(raw).unwrap()
    }

    fn instructor(name: Option<&str>, gpa: Option<f64>, students: Option<u32>) -> InstructorStats {
        InstructorStats {
            instructor: name.map(str::to_string),
            percentage_a: Some(80.0),
            percentage_b: Some(15.0),
            percentage_c: Some(5.0),
            percentage_d: gpa.map(|_| 0.0),
            percentage_f: Some(0.0),
            total_students: students,
            gpa,
        }
    }

    fn detail(course_code: &str) -> CourseDetail {
        CourseDetail {
            course: Some(CourseSummary {
                course_code: code(course_code),
                course_name: "Algorithms".into(),
                credit_hours: None,
                avg_gpa: Some(3.2),
            }),
            instructors: vec![
                instructor(Some("Hopper, Grace"), Some(3.5), Some(30)),
                instructor(Some("Park, Min"), None, Some(5)),
            ],
            prerequisites: vec![
                PrerequisiteItem {
                    prerequisite_course_code: code("CS102"),
                    requirement_group_id: 1,
                },
                PrerequisiteItem {
                    prerequisite_course_code: code("CS250"),
                    requirement_group_id: 2,
                },
                PrerequisiteItem {
                    prerequisite_course_code: code("MATH151"),
                    requirement_group_id: 2,
                },
            ],
            concurrent_enrollment: vec![ConcurrentItem {
                concurrent_enrollment_course_code: code("MATH151"),
            }],
        }
    }

    #[test]
    fn formats_missing_numbers_as_placeholder() {
        assert_eq!(format_gpa(Some(3.2)), "3.20");
        assert_eq!(format_gpa(None), "N/A");
        assert_eq!(format_percentage(Some(33.333)), "33.3%");
        assert_eq!(format_percentage(None), "N/A");
        assert_eq!(format_count(Some(0)), "0");
        assert_eq!(format_count(None), "N/A");
    }

    #[test]
    fn labels_use_text_before_first_comma() {
        assert_eq!(instructor_label(Some("Smith, Jane")), "Smith");
        assert_eq!(instructor_label(Some("Gauss")), "Gauss");
        assert_eq!(instructor_label(Some("van Dyke , A.")), "van Dyke ");
        assert_eq!(instructor_label(Some(",Anon")), "");
        assert_eq!(instructor_label(None), "N/A");
    }

    #[test]
    fn hrefs_encode_the_code() {
        assert_eq!(course_href(&code("CS101")), "/course/CS101");
        assert_eq!(course_href(&code("CS 1/A")), "/course/CS%201%2FA");
        assert_eq!(course_href(&code("CS#1?x")), "/course/CS%231%3Fx");
        assert_eq!(course_href(&code("100%")), "/course/100%25");
    }

    #[test]
    fn list_failure_prefers_server_message() {
        let page = ListPage::build(Err(FetchError::Status {
            status: 503,
            message: Some("Store unavailable: down".into()),
        }));
        assert_eq!(page, ListPage::Failed("Store unavailable: down".into()));

        let page = ListPage::build(Err(FetchError::Decode("eof".into())));
        assert_eq!(page, ListPage::Failed(LIST_FAILURE.into()));
        assert_eq!(page.course_count(), 0);
    }

    #[test]
    fn detail_groups_prerequisites_and_charts_defined_gpas() {
        let DetailPage::Loaded(view) = DetailPage::build(&code("CS201"), Ok(Some(detail("CS201"))))
        else {
            panic!("expected a loaded page");
        };

        assert_eq!(view.credit_hours, "N/A");
        assert_eq!(view.avg_gpa, "3.20");
        assert_eq!(
            view.chart,
            [ChartBar {
                label: "Hopper".into(),
                gpa: 3.5
            }]
        );
        assert_eq!(view.instructors[1].gpa, "N/A");
        assert_eq!(view.instructors[1].percentages[3], "N/A");
        assert_eq!(view.instructors[0].percentages[0], "80.0%");

        let groups = &view.requirement_groups;
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "Required:");
        assert!(groups[0].and_follows);
        assert_eq!(groups[1].heading, "One of the following:");
        assert_eq!(groups[1].courses[1].href, "/course/MATH151");
        assert!(!groups[1].and_follows);

        assert_eq!(view.concurrent[0].code, "MATH151");
    }

    #[test]
    fn stale_detail_is_a_failure() {
        let page = DetailPage::build(&code("CS101"), Ok(Some(detail("CS201"))));
        let DetailPage::Failed(message) = page else {
            panic!("expected failure");
        };
        assert!(message.starts_with("Failed to load course details:"));
        assert!(message.contains("CS201"));
    }

    #[test]
    fn missing_or_empty_detail_is_not_found() {
        assert_eq!(DetailPage::build(&code("X1"), Ok(None)), DetailPage::NotFound);
        assert_eq!(
            DetailPage::build(&code("X1"), Ok(Some(CourseDetail::empty()))),
            DetailPage::NotFound
        );
    }

    #[test]
    fn zero_student_rows_get_no_bar() {
        let bars = chart_bars(&[
            instructor(Some("A, B"), Some(3.0), Some(0)),
            instructor(Some("C, D"), Some(2.0), None),
            instructor(Some("E, F"), Some(1.0), Some(4)),
        ]);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].label, "E");
    }
}
