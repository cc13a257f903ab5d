pub mod error;
pub mod handlers;
pub mod health;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use error::*;
pub use routes::*;
pub use server::*;
pub use service::QueryService;
pub use state::*;
pub use store::{open_store, CatalogFixture, FixtureCourseStore, MySqlCourseStore};
