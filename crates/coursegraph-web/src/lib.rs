//! Presentation layer of the CourseGraph catalog: fetches from the Query
//! Service and renders the course list and course detail pages.

pub mod client;
pub mod render;
pub mod routes;
pub mod server;
pub mod views;

pub use client::{CatalogClient, FetchError};
pub use routes::{create_router, WebState};
pub use server::WebServer;
