use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config as cfg;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Prefix of canonical environment overrides, e.g. `COURSEGRAPH__DATABASE__HOST`.
pub const ENV_PREFIX: &str = "COURSEGRAPH";

/// Environment variable names used by earlier deployments of the catalog,
/// mapped to their settings key.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_SSL", "database.ssl"),
    ("PORT", "server.port"),
    ("FRONTEND_URL", "cors.allowed_origin"),
    ("REACT_APP_API_URL", "web.api_base_url"),
    ("API_URL", "web.api_base_url"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3001
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DatabaseBackend {
    #[default]
    #[serde(rename = "mysql")]
    MySql,
    /// Rows loaded from a JSON fixture file into memory.
    #[serde(rename = "fixture")]
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    // Never serialized; only read from config files or the environment.
    #[serde(default, skip_serializing)]
    pub password: Option<SecretString>,
    /// Encrypt the connection. The server certificate is not verified.
    #[serde(default = "DatabaseConfig::default_ssl")]
    pub ssl: bool,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

impl DatabaseConfig {
    fn default_host() -> String {
        "localhost".to_string()
    }

    fn default_port() -> u16 {
        3306
    }

    fn default_ssl() -> bool {
        true
    }

    fn default_max_connections() -> u32 {
        20
    }

    fn default_connect_timeout_secs() -> u64 {
        15
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            host: Self::default_host(),
            port: Self::default_port(),
            name: String::new(),
            user: String::new(),
            password: None,
            ssl: Self::default_ssl(),
            max_connections: Self::default_max_connections(),
            connect_timeout_secs: Self::default_connect_timeout_secs(),
            fixture_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "CorsConfig::default_allowed_origin")]
    pub allowed_origin: String,
}

impl CorsConfig {
    fn default_allowed_origin() -> String {
        "http://localhost:3000".to_string()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: Self::default_allowed_origin(),
        }
    }
}

/// How the detail endpoint answers for a course code that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundMode {
    /// `404` with an error body.
    #[default]
    Status,
    /// `200` with no course fields and empty lists.
    EmptyDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub not_found: NotFoundMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "WebConfig::default_host")]
    pub host: String,
    #[serde(default = "WebConfig::default_port")]
    pub port: u16,
    /// Base URL of the query service, including the `/api` prefix.
    #[serde(default = "WebConfig::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "WebConfig::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl WebConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_api_base_url() -> String {
        "http://localhost:3001/api".to_string()
    }

    fn default_request_timeout_secs() -> u64 {
        15
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            api_base_url: Self::default_api_base_url(),
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            api: ApiConfig::default(),
            web: WebConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    fn default_env() -> String {
        env::var("APP_ENV")
            .ok()
            .or_else(|| env::var("RUST_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    /// Checks shared by every binary.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                other
            ),
        }
    }

    /// Checks for the Query Service: listener, CORS and the store backend.
    pub fn validate_api(&self) -> Result<()> {
        self.validate()?;
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            !self.cors.allowed_origin.trim().is_empty(),
            "cors.allowed_origin cannot be empty"
        );

        match self.database.backend {
            DatabaseBackend::MySql => {
                anyhow::ensure!(
                    !self.database.host.trim().is_empty(),
                    "database.host cannot be empty"
                );
                anyhow::ensure!(
                    !self.database.name.trim().is_empty(),
                    "database.name cannot be empty"
                );
                anyhow::ensure!(
                    self.database.max_connections > 0,
                    "database.max_connections must be > 0"
                );
            }
            DatabaseBackend::Fixture => {
                anyhow::ensure!(
                    self.database.fixture_path.is_some(),
                    "database.fixture_path is required for the fixture backend"
                );
            }
        }
        Ok(())
    }

    /// Checks for the web front end, which never opens a store.
    pub fn validate_web(&self) -> Result<()> {
        self.validate()?;
        anyhow::ensure!(
            !self.web.host.trim().is_empty(),
            "web.host cannot be empty"
        );
        anyhow::ensure!(self.web.port > 0, "web.port must be > 0");
        anyhow::ensure!(
            !self.web.api_base_url.trim().is_empty(),
            "web.api_base_url cannot be empty"
        );
        Ok(())
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    settings: Settings,
    config_dir: PathBuf,
    env: String,
}

impl ConfigManager {
    /// Load settings with the following precedence (lowest first):
    /// 1. `default.toml`, `{env}.toml`, `local.toml` in the config directory
    /// 2. Legacy deployment variables (`DB_HOST`, `PORT`, ...)
    /// 3. `COURSEGRAPH__*` environment variables
    ///
    /// A `.env` file in the working directory is loaded first.
    pub fn new(config_dir: Option<PathBuf>, env_override: Option<String>) -> Result<Self> {
        Self::new_with(config_dir, env_override, |_| {})
    }

    /// Like [`ConfigManager::new`], applying `overrides` (typically command
    /// line flags) before validation.
    pub fn new_with<F>(
        config_dir: Option<PathBuf>,
        env_override: Option<String>,
        overrides: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut Settings),
    {
        Self::load_dotenv();

        let env_name = env_override.unwrap_or_else(Settings::default_env);
        let config_dir = config_dir.unwrap_or_else(Self::default_config_dir);
        let mut settings =
            Self::load_from_sources(&config_dir, &env_name, |key| env::var(key).ok())?;
        overrides(&mut settings);
        settings.validate()?;

        info!(
            "Configuration loaded from {:?} (env: {})",
            config_dir, env_name
        );
        Ok(Self {
            settings,
            config_dir,
            env: env_name,
        })
    }

    /// Wrap already built settings, e.g. in tests.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let env = settings.env.clone();
        Ok(Self {
            settings,
            config_dir: PathBuf::from("."),
            env,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    /// `./config/` when it exists, else the working directory.
    pub fn default_config_dir() -> PathBuf {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            return project_config;
        }
        cwd
    }

    pub fn load_from_sources<F>(config_dir: &Path, env_name: &str, lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(
                cfg::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(Some(Self::legacy_env(&lookup))),
            )
            .add_source(cfg::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let mut settings: Settings = builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        settings.env = env_name.to_string();
        Ok(settings)
    }

    /// Translate legacy variables into the canonical `COURSEGRAPH__` namespace.
    fn legacy_env<F>(lookup: &F) -> HashMap<String, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut mapped = HashMap::new();
        for (name, key) in LEGACY_ENV {
            let Some(value) = lookup(name) else { continue };
            let value = if *name == "DB_SSL" {
                // Anything but an explicit "false" keeps encryption on.
                (value.trim() != "false").to_string()
            } else {
                value
            };
            let canonical = format!(
                "{}__{}",
                ENV_PREFIX,
                key.replace('.', "__").to_uppercase()
            );
            mapped.insert(canonical, value);
        }
        mapped
    }

    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            } else {
                info!("Loaded .env file from current directory");
            }
        }
    }
}
