use axum::http::{header, HeaderValue};
use axum_test::TestServer;
use coursegraph_api::{create_router, AppState, FixtureCourseStore};
use async_trait::async_trait;
use coursegraph_core::{
    ApiConfig, ConcurrentEdge, CorsConfig, Course, CourseCode, CourseDetail, CourseGraphError,
    CourseStore, CourseSummary, InstructorGradeRecord, NotFoundMode, PrerequisiteEdge, Result,
};
use serde_json::{json, Value};
use std::sync::Arc;

const CATALOG: &str = include_str!("../../../fixtures/catalog.json");

fn fixture() -> Arc<FixtureCourseStore> {
    Arc::new(FixtureCourseStore::from_json(CATALOG).expect("fixture"))
}

fn server_with(store: Arc<FixtureCourseStore>, not_found: NotFoundMode) -> TestServer {
    let state = AppState::new(store, ApiConfig { not_found });
    let app = create_router(state, &CorsConfig::default());
    TestServer::new(app).unwrap()
}

fn server() -> TestServer {
    server_with(fixture(), NotFoundMode::Status)
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let resp = server().get("/health").await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn readiness_follows_the_store() {
    let store = fixture();
    let server = server_with(store.clone(), NotFoundMode::Status);

    let resp = server.get("/health/ready").await;
    assert_eq!(resp.status_code(), 200);
    let body: Value = resp.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"]["status"], "healthy");

    store.close().await;
    let resp = server.get("/health/ready").await;
    assert_eq!(resp.status_code(), 503);
    let body: Value = resp.json();
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["store"]["status"], "unhealthy");
    assert!(body["store"]["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(body["store"]["response_time_ms"].is_null());
}

#[tokio::test]
async fn course_list_is_sorted_with_averages() {
    let resp = server().get("/api/courses").await;
    assert_eq!(resp.status_code(), 200);

    let body: Value = resp.json();
    assert_eq!(
        body[0],
        json!({
            "course_code": "CS101",
            "course_name": "Introduction to Programming",
            "credit_hours": 4,
            "avg_gpa": 3.58
        })
    );

    let courses: Vec<CourseSummary> = resp.json();
    let codes: Vec<_> = courses.iter().map(|c| c.course_code.as_str()).collect();
    assert_eq!(codes, ["CS101", "CS102", "CS201", "CS250", "CS301", "MATH151"]);
    assert_eq!(body[3]["credit_hours"], Value::Null);
    assert_eq!(body[4]["avg_gpa"], Value::Null);
}

#[tokio::test]
async fn course_detail_has_wire_shape() {
    let resp = server().get("/api/courses/CS201").await;
    assert_eq!(resp.status_code(), 200);

    let body: Value = resp.json();
    assert_eq!(body["course_code"], "CS201");
    assert_eq!(body["avg_gpa"], 3.22);
    assert_eq!(
        body["instructors"][0],
        json!({
            "Instructor": "Hopper, Grace",
            "Percentage_As": 60.0,
            "Percentage_Bs": 30.0,
            "Percentage_Cs": 10.0,
            "Percentage_Ds": 0.0,
            "Percentage_Fs": 0.0,
            "Total_Students": 30,
            "gpa": 3.5
        })
    );
    assert_eq!(
        body["prerequisites"],
        json!([
            {"prerequisite_course_code": "CS102", "requirement_group_id": 1},
            {"prerequisite_course_code": "CS250", "requirement_group_id": 2},
            {"prerequisite_course_code": "MATH151", "requirement_group_id": 2}
        ])
    );
    assert_eq!(
        body["concurrentEnrollment"],
        json!([{"concurrent_enrollment_course_code": "MATH151"}])
    );
}

#[tokio::test]
async fn detail_lists_are_always_arrays() {
    let body: Value = server().get("/api/courses/CS301").await.json();
    assert_eq!(body["instructors"], json!([]));
    assert_eq!(body["concurrentEnrollment"], json!([]));
    assert_eq!(body["prerequisites"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_course_is_404_by_default() {
    let resp = server().get("/api/courses/NOPE999").await;
    assert_eq!(resp.status_code(), 404);
    let body: Value = resp.json();
    assert_eq!(body["status"], 404);
    assert!(body["error"].as_str().unwrap().contains("NOPE999"));
}

#[tokio::test]
async fn unknown_course_can_return_empty_detail() {
    let server = server_with(fixture(), NotFoundMode::EmptyDetail);
    let resp = server.get("/api/courses/NOPE999").await;
    assert_eq!(resp.status_code(), 200);

    let body: Value = resp.json();
    assert!(body.get("course_code").is_none());
    assert_eq!(
        body,
        json!({"instructors": [], "prerequisites": [], "concurrentEnrollment": []})
    );
}

#[tokio::test]
async fn blank_course_code_is_rejected() {
    let resp = server().get("/api/courses/%20%20").await;
    assert_eq!(resp.status_code(), 400);
}

#[tokio::test]
async fn unavailable_store_is_503() {
    let store = fixture();
    let server = server_with(store.clone(), NotFoundMode::Status);
    store.close().await;

    let resp = server.get("/api/courses").await;
    assert_eq!(resp.status_code(), 503);
    let body: Value = resp.json();
    assert_eq!(body["status"], 503);

    let resp = server.get("/api/courses/CS101").await;
    assert_eq!(resp.status_code(), 503);
}

/// Fails every course listing with a malformed-row error.
struct CorruptCatalog(FixtureCourseStore);

#[async_trait]
impl CourseStore for CorruptCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        Err(CourseGraphError::InvalidRecord(
            "course CS1: credit_hours is not a number".into(),
        ))
    }
    async fn find_course(&self, code: &CourseCode) -> Result<Option<Course>> {
        self.0.find_course(code).await
    }
    async fn grade_records(&self, code: Option<&CourseCode>) -> Result<Vec<InstructorGradeRecord>> {
        self.0.grade_records(code).await
    }
    async fn prerequisites(&self, code: &CourseCode) -> Result<Vec<PrerequisiteEdge>> {
        self.0.prerequisites(code).await
    }
    async fn concurrent_enrollment(&self, code: &CourseCode) -> Result<Vec<ConcurrentEdge>> {
        self.0.concurrent_enrollment(code).await
    }
    async fn ping(&self) -> Result<()> {
        self.0.ping().await
    }
    async fn close(&self) {
        self.0.close().await
    }
}

#[tokio::test]
async fn invalid_stored_data_is_500() {
    let store = CorruptCatalog(FixtureCourseStore::from_json(CATALOG).unwrap());
    let state = AppState::new(Arc::new(store), ApiConfig::default());
    let server = TestServer::new(create_router(state, &CorsConfig::default())).unwrap();

    let resp = server.get("/api/courses").await;
    assert_eq!(resp.status_code(), 500);
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("credit_hours"));
}

#[tokio::test]
async fn every_listed_course_has_a_detail() {
    let server = server();
    let courses: Vec<CourseSummary> = server.get("/api/courses").await.json();
    for summary in courses {
        let path = format!("/api/courses/{}", summary.course_code);
        let detail: CourseDetail = server.get(&path).await.json();
        assert_eq!(detail.course.as_ref(), Some(&summary));
    }
}

#[tokio::test]
async fn cors_allows_the_configured_origin() {
    let resp = server()
        .get("/api/courses")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .await;
    assert_eq!(resp.status_code(), 200);
    let allowed = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("http://localhost:3000"));
    let credentials = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .and_then(|v| v.to_str().ok());
    assert_eq!(credentials, Some("true"));
}
