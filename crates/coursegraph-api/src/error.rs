use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursegraph_core::CourseGraphError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    CourseGraph(#[from] CourseGraphError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::CourseGraph(err) => match err {
                CourseGraphError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                CourseGraphError::CourseNotFound(_) => StatusCode::NOT_FOUND,
                CourseGraphError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (CourseGraphError::StoreUnavailable("down".into()), 503),
            (CourseGraphError::CourseNotFound("CS1".into()), 404),
            (CourseGraphError::InvalidInput("blank".into()), 400),
            (CourseGraphError::InvalidRecord("bad".into()), 500),
            (CourseGraphError::Database("syntax".into()), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status().as_u16(), expected);
        }
    }
}
