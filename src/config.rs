//! Configuration management for the GROBID parse server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub index: IndexConfig,
    pub grobid: GrobidConfig,
    pub parse: ParseConfig,
    pub disk: DiskConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
}

/// Runtime mode, taken from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn is_debug(self) -> bool {
        self == RunMode::Development
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Optional S3-compatible endpoint (MinIO, LocalStack)
    pub endpoint: Option<String>,
    pub region: String,
    /// Bucket holding the source PDFs, keyed by `<pdf_uuid>.pdf`
    pub pdf_bucket: String,
    /// Bucket receiving gzipped TEI XML, keyed by `<id>.xml.gz`
    pub xml_bucket: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    pub table: String,
    /// Secondary index on `source_pdf_id`
    pub source_index: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrobidConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub health_timeout_secs: u64,
}

impl GrobidConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub max_file_size_mb: u64,
    pub duplicate_check: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskConfig {
    pub path: PathBuf,
    /// Free space percentage below which `/` reports degraded
    pub degraded_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                mode: RunMode::Production,
            },
            storage: StorageConfig {
                endpoint: None,
                region: "us-east-1".to_string(),
                pdf_bucket: "openalex-harvested-pdfs".to_string(),
                xml_bucket: "openalex-harvested-grobid-xml".to_string(),
            },
            index: IndexConfig {
                table: "grobid-xml".to_string(),
                source_index: "by_source_pdf_id".to_string(),
            },
            grobid: GrobidConfig {
                url: "http://grobid:8070".to_string(),
                timeout_secs: 60,
                health_timeout_secs: 5,
            },
            parse: ParseConfig {
                max_file_size_mb: 20,
                duplicate_check: false,
            },
            disk: DiskConfig {
                path: PathBuf::from("/"),
                degraded_percent: 15.0,
            },
        }
    }
}

impl Config {
    /// Build configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);

        let mode = match lookup("APP_ENV").as_deref() {
            Some("development") | Some("dev") => RunMode::Development,
            _ => RunMode::Production,
        };

        Config {
            server: ServerConfig {
                host: string("SERVER_HOST", defaults.server.host),
                port: parsed(&lookup, "SERVER_PORT", defaults.server.port),
                mode,
            },
            storage: StorageConfig {
                endpoint: lookup("S3_ENDPOINT"),
                region: string("AWS_REGION", defaults.storage.region),
                pdf_bucket: string("PDF_BUCKET", defaults.storage.pdf_bucket),
                xml_bucket: string("GROBID_XML_BUCKET", defaults.storage.xml_bucket),
            },
            index: IndexConfig {
                table: string("DYNAMODB_TABLE", defaults.index.table),
                source_index: string("DYNAMODB_SOURCE_INDEX", defaults.index.source_index),
            },
            grobid: GrobidConfig {
                url: string("GROBID_URL", defaults.grobid.url)
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: parsed(&lookup, "GROBID_TIMEOUT_SECS", defaults.grobid.timeout_secs),
                health_timeout_secs: parsed(
                    &lookup,
                    "GROBID_HEALTH_TIMEOUT_SECS",
                    defaults.grobid.health_timeout_secs,
                ),
            },
            parse: ParseConfig {
                max_file_size_mb: parsed(&lookup, "MAX_FILE_SIZE_MB", defaults.parse.max_file_size_mb),
                duplicate_check: parsed(&lookup, "DUPLICATE_CHECK", defaults.parse.duplicate_check),
            },
            disk: DiskConfig {
                path: lookup("DISK_PATH").map(PathBuf::from).unwrap_or(defaults.disk.path),
                degraded_percent: parsed(
                    &lookup,
                    "DISK_DEGRADED_PERCENT",
                    defaults.disk.degraded_percent,
                ),
            },
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}
