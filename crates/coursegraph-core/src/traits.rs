use crate::{ConcurrentEdge, Course, CourseCode, InstructorGradeRecord, PrerequisiteEdge, Result};
use async_trait::async_trait;

/// Read-only access to the catalog tables.
///
/// Implementations return validated records; any row that fails the strict
/// numeric parse fails the whole call. Unreachable backends report
/// `CourseGraphError::StoreUnavailable`.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>>;
    async fn find_course(&self, code: &CourseCode) -> Result<Option<Course>>;
    /// Grade rows of one course, or of every course when `code` is `None`.
    async fn grade_records(&self, code: Option<&CourseCode>) -> Result<Vec<InstructorGradeRecord>>;
    async fn prerequisites(&self, code: &CourseCode) -> Result<Vec<PrerequisiteEdge>>;
    async fn concurrent_enrollment(&self, code: &CourseCode) -> Result<Vec<ConcurrentEdge>>;
    async fn ping(&self) -> Result<()>;
    async fn close(&self);
}
