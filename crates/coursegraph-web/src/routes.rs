use crate::client::CatalogClient;
use crate::render::{render_detail_page, render_list_page};
use crate::views::{DetailPage, ListPage};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use coursegraph_core::CourseCode;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct WebState {
    pub client: Arc<CatalogClient>,
}

impl WebState {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

pub fn create_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(course_list))
        .route("/course/{code}", get(course_detail))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn course_list(State(state): State<WebState>) -> (StatusCode, Html<String>) {
    let result = state.client.get_courses().await;
    if let Err(e) = &result {
        warn!("Error fetching courses: {}", e);
    }

    let page = ListPage::build(result);
    let status = match page {
        ListPage::Loaded(_) => StatusCode::OK,
        ListPage::Failed(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Html(render_list_page(&page)))
}

pub async fn course_detail(
    State(state): State<WebState>,
    Path(code): Path<String>,
) -> (StatusCode, Html<String>) {
    let page = match CourseCode::parse(&code) {
        Ok(code) => {
            let result = state.client.get_course(&code).await;
            if let Err(e) = &result {
                warn!(course = %code, "Error fetching course details: {}", e);
            }
            DetailPage::build(&code, result)
        }
        Err(_) => DetailPage::NotFound,
    };

    let status = match page {
        DetailPage::Loaded(_) => StatusCode::OK,
        DetailPage::NotFound => StatusCode::NOT_FOUND,
        DetailPage::Failed(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Html(render_detail_page(&page)))
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub api_base_url: String,
}

pub async fn health(State(state): State<WebState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_base_url: state.client.base_url().to_string(),
    })
}
