use crate::service::QueryService;
use coursegraph_core::{ApiConfig, CourseStore, NotFoundMode};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueryService>,
    pub api: Arc<ApiConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn CourseStore>, api: ApiConfig) -> Self {
        Self {
            service: Arc::new(QueryService::new(store)),
            api: Arc::new(api),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        self.service.store()
    }

    pub fn not_found_mode(&self) -> NotFoundMode {
        self.api.not_found
    }
}
