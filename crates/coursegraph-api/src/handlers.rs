use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use coursegraph_core::{CourseCode, CourseDetail, CourseGraphError, CourseSummary, NotFoundMode};
use tracing::debug;

pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseSummary>>> {
    let courses = state.service.list_courses().await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<CourseDetail>> {
    let code = CourseCode::parse(&code)?;

    match state.service.course_detail(&code).await {
        Ok(detail) => Ok(Json(detail)),
        Err(CourseGraphError::CourseNotFound(_))
            if state.not_found_mode() == NotFoundMode::EmptyDetail =>
        {
            debug!(course = %code, "unknown course, returning empty detail");
            Ok(Json(CourseDetail::empty()))
        }
        Err(err) => Err(ApiError::from(err)),
    }
}
