//! Catalog store backends.

pub mod fixture;
pub mod mysql;

pub use fixture::{CatalogFixture, FixtureCourseStore};
pub use mysql::MySqlCourseStore;

use coursegraph_core::{CourseGraphError, CourseStore, DatabaseBackend, DatabaseConfig, Result};
use std::sync::Arc;
use tracing::info;

/// Open the backend selected by `config.backend`.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn CourseStore>> {
    match config.backend {
        DatabaseBackend::MySql => {
            let store = MySqlCourseStore::connect(config)?;
            Ok(Arc::new(store))
        }
        DatabaseBackend::Fixture => {
            let path = config.fixture_path.as_deref().ok_or_else(|| {
                CourseGraphError::Config("database.fixture_path is not set".into())
            })?;
            let store = FixtureCourseStore::load(path).await?;
            info!("Loaded catalog fixture from {}", path.display());
            Ok(Arc::new(store))
        }
    }
}
