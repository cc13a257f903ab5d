use crate::{handlers, health, AppState};
use axum::{routing::get, Router};
use coursegraph_core::CorsConfig;
use http::{HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/courses", get(handlers::list_courses))
        .route("/api/courses/{code}", get(handlers::get_course))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)),
        )
}

/// Single-origin, read-only CORS policy.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_credentials(true);

    match HeaderValue::from_str(&cors.allowed_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!(
                "Ignoring invalid CORS origin {:?}: {}",
                cors.allowed_origin, e
            );
            layer
        }
    }
}
