use crate::store::FixtureCourseStore;
use crate::AppState;
use coursegraph_core::{ApiConfig, CourseStore, NotFoundMode};
use std::sync::Arc;

pub const CATALOG_FIXTURE: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/catalog.json"));

pub fn fixture_store() -> Arc<dyn CourseStore> {
    Arc::new(FixtureCourseStore::from_json(CATALOG_FIXTURE).expect("catalog fixture parses"))
}

impl AppState {
    /// State over the bundled catalog fixture.
    pub fn new_for_testing(not_found: NotFoundMode) -> Self {
        Self::new(fixture_store(), ApiConfig { not_found })
    }
}
