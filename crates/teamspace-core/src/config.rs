//! Configuration module
//!
//! Environment-driven configuration for the API server: HTTP, record backend,
//! image storage, sessions and logging.

use std::env;
use std::str::FromStr;

const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_IMAGE_SIZE_MB: usize = 1;
const SESSION_TTL_HOURS: i64 = 720;
const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;
const SESSION_COOKIE_NAME: &str = "teamspace-session";
const LOCAL_STORAGE_PATH: &str = "./data/media";
const ALLOWED_IMAGE_CONTENT_TYPES: &str = "image/png,image/jpeg,image/svg+xml";

/// Which record backend the server talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

impl FromStr for DatabaseBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
            "memory" | "in-memory" => Ok(DatabaseBackend::Memory),
            other => Err(anyhow::anyhow!(
                "DATABASE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_backend: DatabaseBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    pub max_image_size_bytes: usize,
    pub allowed_image_content_types: Vec<String>,
    pub session_cookie_name: String,
    pub session_ttl_hours: i64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let database_backend = env::var("DATABASE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let max_image_size_mb = env::var("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let allowed_image_content_types = env::var("ALLOWED_IMAGE_CONTENT_TYPES")
            .unwrap_or_else(|_| ALLOWED_IMAGE_CONTENT_TYPES.to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port,
            environment,
            cors_origins,
            database_backend,
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| LOCAL_STORAGE_PATH.to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/media", server_port)),
            max_image_size_bytes: max_image_size_mb * 1024 * 1024,
            allowed_image_content_types,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| SESSION_COOKIE_NAME.to_string()),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| SESSION_TTL_HOURS.to_string())
                .parse()
                .unwrap_or(SESSION_TTL_HOURS),
            log_format: LogFormat::parse(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Development defaults with the in-memory record backend.
    pub fn development(local_storage_path: impl Into<String>) -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            cors_origins: vec!["*".to_string()],
            database_backend: DatabaseBackend::Memory,
            database_url: None,
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            local_storage_path: local_storage_path.into(),
            local_storage_base_url: format!("http://localhost:{}/media", SERVER_PORT),
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * 1024 * 1024,
            allowed_image_content_types: ALLOWED_IMAGE_CONTENT_TYPES
                .split(',')
                .map(str::to_string)
                .collect(),
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            session_ttl_hours: SESSION_TTL_HOURS,
            log_format: LogFormat::Text,
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_backend == DatabaseBackend::Postgres {
            match self.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when DATABASE_BACKEND=postgres"
                    ))
                }
                Some(url)
                    if !url.starts_with("postgres://") && !url.starts_with("postgresql://") =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ));
                }
                Some(_) => {}
            }
        }

        if self.is_production() && self.database_backend == DatabaseBackend::Memory {
            return Err(anyhow::anyhow!(
                "DATABASE_BACKEND=memory is not allowed in production"
            ));
        }

        if self.session_cookie_name.trim().is_empty() {
            return Err(anyhow::anyhow!("SESSION_COOKIE_NAME cannot be empty"));
        }

        if self.session_ttl_hours <= 0 {
            return Err(anyhow::anyhow!("SESSION_TTL_HOURS must be positive"));
        }

        if self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(anyhow::anyhow!(
                "SESSION_TTL_HOURS must be at most {} (one year)",
                MAX_SESSION_TTL_HOURS
            ));
        }

        if self.max_image_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_SIZE_MB must be at least 1"));
        }

        if self.allowed_image_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_IMAGE_CONTENT_TYPES must list at least one content type"
            ));
        }

        Ok(())
    }
}
