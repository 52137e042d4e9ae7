use std::path::PathBuf;

/// Which listing store backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Single JSON file at the given path.
    File { data_file: PathBuf },
    /// PostgreSQL `properties` table.
    Postgres { database_url: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Listing store backend.
    pub storage: StorageBackend,
    /// Media root; served under `/uploads`.
    pub uploads_dir: PathBuf,
    /// Static site root, served as the fallback for unknown paths.
    pub public_dir: PathBuf,
    /// Absolute prefix for stored media references (e.g. a CDN origin).
    pub media_base_url: Option<String>,
    /// Public site origin used in `sitemap.xml`.
    pub site_url: String,
    /// Shared secret for the admin upload page. `None` locks the page.
    pub admin_pass: Option<String>,
    /// Maximum image parts per request.
    pub max_images: usize,
    /// Maximum video file parts per request.
    pub max_videos: usize,
    /// Request body limit for multipart uploads.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STORAGE_BACKEND`      | `file` (or `postgres`)     |
    /// | `DATA_FILE`            | `data/properties.json`     |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `UPLOADS_DIR`          | `public/uploads`           |
    /// | `PUBLIC_DIR`           | `public`                   |
    /// | `MEDIA_BASE_URL`       | unset                      |
    /// | `SITE_URL`             | `http://localhost:3000`    |
    /// | `ADMIN_PASS`           | unset                      |
    /// | `MAX_IMAGES`           | `20`                       |
    /// | `MAX_VIDEOS`           | `10`                       |
    /// | `MAX_UPLOAD_BYTES`     | `209715200` (200 MiB)      |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values or an unknown `STORAGE_BACKEND`, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_parse("PORT", "3000");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", "30");

        let storage = match env_or("STORAGE_BACKEND", "file").to_ascii_lowercase().as_str() {
            "file" | "json" => StorageBackend::File {
                data_file: env_or("DATA_FILE", "data/properties.json").into(),
            },
            "postgres" | "database" => StorageBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORAGE_BACKEND=postgres"),
            },
            other => panic!("Unknown STORAGE_BACKEND '{other}'. Must be one of: file, postgres"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage,
            uploads_dir: env_or("UPLOADS_DIR", "public/uploads").into(),
            public_dir: env_or("PUBLIC_DIR", "public").into(),
            media_base_url: env_opt("MEDIA_BASE_URL"),
            site_url: env_or("SITE_URL", "http://localhost:3000"),
            admin_pass: env_opt("ADMIN_PASS"),
            max_images: env_parse("MAX_IMAGES", "20"),
            max_videos: env_parse("MAX_VIDEOS", "10"),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", "209715200"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(name: &str, default: &str) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or(name, default)
        .parse()
        .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>()))
}
