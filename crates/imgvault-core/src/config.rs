//! Configuration module
//!
//! Settings are read from the process environment (after loading `.env` through
//! dotenvy) into [`ServiceConfig`], then wrapped in the cheap-to-clone [`Config`].

use std::env;

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_MINIO_BUCKET,
    DEFAULT_MINIO_PORT,
};
use crate::storage_types::StorageProvider;

const DEFAULT_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_PORT: u16 = 5432;

/// Postgres connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    /// `DATABASE_URL`, used verbatim instead of the individual parts when set.
    pub url_override: Option<String>,
    pub max_connections: u32,
    pub timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        match self.url_override {
            Some(ref url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.name
            ),
        }
    }
}

/// MinIO connection and URL policy.
#[derive(Clone, Debug)]
pub struct MinioConfig {
    pub endpoint: String,
    /// `MINIO_PORT` as configured; `None` means the client falls back to 9000
    /// and public URLs carry no explicit port.
    pub port: Option<u16>,
    pub use_ssl: bool,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// `MINIO_PRIVATE_ACCESS=true` serves direct bucket URLs; anything else
    /// (including unset) serves seven-day presigned URLs.
    pub direct_urls: bool,
}

impl MinioConfig {
    fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// Endpoint the SDK client talks to.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.scheme(),
            self.endpoint,
            self.port.unwrap_or(DEFAULT_MINIO_PORT)
        )
    }

    /// Base of direct object URLs handed to clients.
    pub fn public_base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme(), self.endpoint, port),
            None => format!("{}://{}", self.scheme(), self.endpoint),
        }
    }
}

/// AWS S3 connection settings.
#[derive(Clone, Debug)]
pub struct S3Config {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

/// Full service configuration.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub log_format: String,
    pub database: DatabaseConfig,
    pub storage_provider: StorageProvider,
    pub minio: Option<MinioConfig>,
    pub s3: Option<S3Config>,
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = ServiceConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.inner().environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn log_format(&self) -> &str {
        &self.inner().log_format
    }

    pub fn database(&self) -> &DatabaseConfig {
        &self.inner().database
    }

    pub fn database_url(&self) -> String {
        self.inner().database.url()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().database.max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().database.timeout_seconds
    }

    pub fn storage_provider(&self) -> StorageProvider {
        self.inner().storage_provider
    }

    pub fn minio(&self) -> Option<&MinioConfig> {
        self.inner().minio.as_ref()
    }

    pub fn s3(&self) -> Option<&S3Config> {
        self.inner().s3.as_ref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.inner().allowed_extensions
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl ServiceConfig {
    /// Build the configuration from a key lookup (the process environment in production).
    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match get("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database = DatabaseConfig {
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: get("DB_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_DB_PORT),
            username: get("DB_USERNAME").unwrap_or_else(|| "postgres".to_string()),
            password: get("DB_PASSWORD").unwrap_or_default(),
            name: get("DB_NAME").unwrap_or_else(|| "postgres".to_string()),
            url_override: get("DATABASE_URL").filter(|u| !u.trim().is_empty()),
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            timeout_seconds: get("DB_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let storage_provider = match get("STORAGE_PROVIDER") {
            Some(value) => value.parse::<StorageProvider>()?,
            None => StorageProvider::default(),
        };

        let minio = match (
            get("MINIO_ENDPOINT"),
            get("MINIO_ACCESS_KEY"),
            get("MINIO_SECRET_KEY"),
        ) {
            (Some(endpoint), Some(access_key), Some(secret_key)) => Some(MinioConfig {
                endpoint,
                // Non-numeric values fall back to the client default.
                port: get("MINIO_PORT").and_then(|p| p.trim().parse().ok()),
                use_ssl: get("MINIO_USE_SSL").as_deref() == Some("true"),
                access_key,
                secret_key,
                bucket: get("MINIO_BUCKET")
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| DEFAULT_MINIO_BUCKET.to_string()),
                direct_urls: get("MINIO_PRIVATE_ACCESS").as_deref() == Some("true"),
            }),
            _ => None,
        };

        let s3 = match (
            get("S3_REGION"),
            get("S3_ACCESS_KEY"),
            get("S3_SECRET_KEY"),
            get("S3_BUCKET"),
        ) {
            (Some(region), Some(access_key), Some(secret_key), Some(bucket)) => Some(S3Config {
                region,
                access_key,
                secret_key,
                bucket,
            }),
            _ => None,
        };

        let max_file_size_bytes = get("MAX_FILE_SIZE_BYTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES);

        let allowed_extensions = match get("ALLOWED_EXTENSIONS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        Ok(ServiceConfig {
            server_port,
            environment,
            cors_origins,
            log_format: get("LOG_FORMAT")
                .unwrap_or_else(|| "compact".to_string())
                .to_lowercase(),
            database,
            storage_provider,
            minio,
            s3,
            max_file_size_bytes,
            allowed_extensions,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let url = self.database.url();
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_BYTES must be greater than zero"
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }

        if is_production_name(&self.environment) && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.storage_provider {
            StorageProvider::Minio if self.minio.is_none() => Err(anyhow::anyhow!(
                "STORAGE_PROVIDER=minio requires MINIO_ENDPOINT, MINIO_ACCESS_KEY and MINIO_SECRET_KEY to be set"
            )),
            StorageProvider::S3 if self.s3.is_none() => Err(anyhow::anyhow!(
                "STORAGE_PROVIDER=s3 requires S3_REGION, S3_ACCESS_KEY, S3_SECRET_KEY and S3_BUCKET to be set"
            )),
            _ => Ok(()),
        }
    }
}
