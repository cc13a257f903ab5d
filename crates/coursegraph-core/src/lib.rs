pub mod config;
pub mod error;
pub mod gpa;
pub mod grouping;
pub mod numeric;
pub mod records;
pub mod telemetry;
pub mod traits;
pub mod types;

pub use config::{
    ApiConfig, ConfigManager, CorsConfig, DatabaseBackend, DatabaseConfig, LogFormat,
    LoggingConfig, NotFoundMode, ServerConfig, Settings, WebConfig,
};
pub use error::*;
pub use grouping::{group_prerequisites, RequirementGroup, RequirementKind};
pub use numeric::RawValue;
pub use records::*;
pub use traits::*;
pub use types::*;
