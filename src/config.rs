//! Configuration Module
//!
//! Backend selection and connection parameters, loaded from environment
//! variables. Library users normally construct backends directly; this
//! is wiring convenience for the demo binary and for deployments that
//! pick the backend at startup.

use std::env;

// == Backend Kind ==
/// Which storage backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-local table, no durability
    Memory,
    /// Table mirrored to a local JSON file
    File,
    /// Entries delegated to a remote Redis service
    Redis,
    /// Table mirrored to a single S3 object
    S3,
}

impl BackendKind {
    /// Parses a backend name, falling back to `Memory` for anything
    /// unrecognized.
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "redis" => Self::Redis,
            "s3" => Self::S3,
            _ => Self::Memory,
        }
    }
}

/// Construction-time configuration for all backends.
///
/// Only the fields for the selected backend are consulted.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend implementation to construct
    pub backend: BackendKind,
    /// File backend: path of the JSON mirror
    pub file_path: String,
    /// Redis backend: `host:port` of the service
    pub redis_addr: String,
    /// Redis backend: optional AUTH credential
    pub redis_password: Option<String>,
    /// Redis backend: database index
    pub redis_db: i64,
    /// S3 backend: bucket holding the mirror object
    pub s3_bucket: String,
    /// S3 backend: key of the mirror object
    pub s3_object_key: String,
    /// S3 backend: bucket region
    pub s3_region: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory`, `file`, `redis`, or `s3` (default: memory)
    /// - `CACHE_FILE_PATH` - file mirror path (default: cache.json)
    /// - `REDIS_ADDR` - Redis `host:port` (default: 127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - Redis AUTH credential (default: none)
    /// - `REDIS_DB` - Redis database index (default: 0)
    /// - `S3_BUCKET` - S3 bucket name (default: empty)
    /// - `S3_OBJECT_KEY` - S3 mirror object key (default: cache.json)
    /// - `S3_REGION` - S3 bucket region (default: us-east-1)
    pub fn from_env() -> Self {
        Self {
            backend: BackendKind::parse(&env::var("CACHE_BACKEND").unwrap_or_default()),
            file_path: env::var("CACHE_FILE_PATH").unwrap_or_else(|_| "cache.json".to_string()),
            redis_addr: env::var("REDIS_ADDR").unwrap_or_else(|_| "127.0.0.1:6379".to_string()),
            redis_password: env::var("REDIS_PASSWORD").ok(),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            s3_bucket: env::var("S3_BUCKET").unwrap_or_default(),
            s3_object_key: env::var("S3_OBJECT_KEY").unwrap_or_else(|_| "cache.json".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            file_path: "cache.json".to_string(),
            redis_addr: "127.0.0.1:6379".to_string(),
            redis_password: None,
            redis_db: 0,
            s3_bucket: String::new(),
            s3_object_key: "cache.json".to_string(),
            s3_region: "us-east-1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.file_path, "cache.json");
        assert_eq!(config.redis_addr, "127.0.0.1:6379");
        assert_eq!(config.redis_password, None);
        assert_eq!(config.redis_db, 0);
        assert_eq!(config.s3_object_key, "cache.json");
        assert_eq!(config.s3_region, "us-east-1");
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!(BackendKind::parse("memory"), BackendKind::Memory);
        assert_eq!(BackendKind::parse("file"), BackendKind::File);
        assert_eq!(BackendKind::parse("REDIS"), BackendKind::Redis);
        assert_eq!(BackendKind::parse("s3"), BackendKind::S3);
        assert_eq!(BackendKind::parse(""), BackendKind::Memory);
        assert_eq!(BackendKind::parse("bogus"), BackendKind::Memory);
    }
}
