use async_trait::async_trait;
use coursegraph_core::{
    ConcurrentEdge, Course, CourseCode, CourseGraphError, CourseStore, InstructorGradeRecord,
    PrerequisiteEdge, RawConcurrentRow, RawCourseRow, RawGradeRow, RawPrerequisiteRow, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// The four catalog tables as JSON arrays of raw rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub courses: Vec<RawCourseRow>,
    #[serde(default)]
    pub grades: Vec<RawGradeRow>,
    #[serde(default)]
    pub prerequisites: Vec<RawPrerequisiteRow>,
    #[serde(default)]
    pub concurrent_enrollment: Vec<RawConcurrentRow>,
}

impl CatalogFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// In-memory catalog used for local runs and tests.
///
/// Every row is validated up front, so a malformed fixture fails at load time
/// instead of on the first request that touches it.
#[derive(Debug, Default)]
pub struct FixtureCourseStore {
    courses: Vec<Course>,
    grades: Vec<InstructorGradeRecord>,
    prerequisites: Vec<PrerequisiteEdge>,
    concurrent: Vec<ConcurrentEdge>,
    closed: AtomicBool,
}

impl FixtureCourseStore {
    pub fn new(
        courses: Vec<Course>,
        grades: Vec<InstructorGradeRecord>,
        prerequisites: Vec<PrerequisiteEdge>,
        concurrent: Vec<ConcurrentEdge>,
    ) -> Self {
        Self {
            courses,
            grades,
            prerequisites,
            concurrent,
            closed: AtomicBool::new(false),
        }
    }

    pub fn from_fixture(fixture: CatalogFixture) -> Result<Self> {
        let courses = fixture
            .courses
            .into_iter()
            .map(Course::try_from)
            .collect::<Result<Vec<_>>>()?;
        let grades = fixture
            .grades
            .into_iter()
            .map(InstructorGradeRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        let prerequisites = fixture
            .prerequisites
            .into_iter()
            .map(PrerequisiteEdge::try_from)
            .collect::<Result<Vec<_>>>()?;
        let concurrent = fixture
            .concurrent_enrollment
            .into_iter()
            .map(ConcurrentEdge::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(courses, grades, prerequisites, concurrent))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_fixture(CatalogFixture::from_json(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(CourseGraphError::StoreUnavailable(
                "fixture store is closed".into(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CourseStore for FixtureCourseStore {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.ensure_open()?;
        let mut courses = self.courses.clone();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }

    async fn find_course(&self, code: &CourseCode) -> Result<Option<Course>> {
        self.ensure_open()?;
        Ok(self.courses.iter().find(|c| &c.code == code).cloned())
    }

    async fn grade_records(&self, code: Option<&CourseCode>) -> Result<Vec<InstructorGradeRecord>> {
        self.ensure_open()?;
        Ok(self
            .grades
            .iter()
            .filter(|g| g.has_students())
            .filter(|g| code.map_or(true, |code| &g.course_code == code))
            .cloned()
            .collect())
    }

    async fn prerequisites(&self, code: &CourseCode) -> Result<Vec<PrerequisiteEdge>> {
        self.ensure_open()?;
        Ok(self
            .prerequisites
            .iter()
            .filter(|p| &p.course_code == code)
            .cloned()
            .collect())
    }

    async fn concurrent_enrollment(&self, code: &CourseCode) -> Result<Vec<ConcurrentEdge>> {
        self.ensure_open()?;
        let mut edges: Vec<_> = self
            .concurrent
            .iter()
            .filter(|c| &c.course_code == code)
            .cloned()
            .collect();
        edges.sort_by(|a, b| a.partner.cmp(&b.partner));
        Ok(edges)
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "courses": [
            {"course_code": "CS102", "course_name": "Data Structures", "credit_hours": "3"},
            {"course_code": "CS101", "course_name": "Intro", "credit_hours": 4}
        ],
        "grades": [
            {"Course_Code": "CS101", "Instructor": "Smith, Jane",
             "Percentage_As": 80, "Percentage_Bs": "15", "Percentage_Cs": 5,
             "Percentage_Ds": 0, "Percentage_Fs": 0, "Total_Students": 50},
            {"Course_Code": "CS101", "Instructor": "Ghost",
             "Percentage_As": 100, "Percentage_Bs": 0, "Percentage_Cs": 0,
             "Percentage_Ds": 0, "Percentage_Fs": 0, "Total_Students": 0}
        ],
        "prerequisites": [
            {"course_code": "CS102", "prerequisite_course_code": "CS101", "requirement_group_id": 1}
        ]
    }"#;

    #[tokio::test]
    async fn loads_and_filters_rows() {
        let store = FixtureCourseStore::from_json(SAMPLE).unwrap();
        let courses = store.list_courses().await.unwrap();
        assert_eq!(courses[0].code.as_str(), "CS101");
        assert_eq!(courses[1].credit_hours, Some(3));

        let grades = store.grade_records(None).await.unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].instructor.as_deref(), Some("Smith, Jane"));

        let cs102 = CourseCode::parse("CS102").unwrap();
        assert_eq!(store.prerequisites(&cs102).await.unwrap().len(), 1);
        assert!(store.concurrent_enrollment(&cs102).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_number_fails_the_load() {
        let json = r#"{"courses": [{"course_code": "CS1", "course_name": "X", "credit_hours": "four"}]}"#;
        let err = FixtureCourseStore::from_json(json).unwrap_err();
        assert!(matches!(err, CourseGraphError::InvalidRecord(_)), "{err}");
    }

    #[tokio::test]
    async fn closed_store_is_unavailable() {
        let store = FixtureCourseStore::from_json(SAMPLE).unwrap();
        store.ping().await.unwrap();
        store.close().await;
        assert!(matches!(
            store.list_courses().await,
            Err(CourseGraphError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let store = FixtureCourseStore::load(file.path()).await.unwrap();
        assert_eq!(store.list_courses().await.unwrap().len(), 2);

        let missing = FixtureCourseStore::load(Path::new("/nonexistent/catalog.json")).await;
        assert!(matches!(missing, Err(CourseGraphError::Io(_))));
    }
}
