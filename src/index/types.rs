//! Record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::xml_key;

/// Metadata for one stored extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Generated id, also the prefix of `s3_key`
    pub id: String,
    /// Lowercased, trimmed caller id
    pub native_id: String,
    pub native_id_namespace: String,
    pub s3_key: String,
    pub source_pdf_id: String,
    pub url: String,
    /// Distinguishes this record layout from older deployments
    pub new_format: bool,
    /// ISO-8601
    pub created_date: String,
    /// Unix seconds
    pub created_timestamp: i64,
}

impl ExtractionRecord {
    pub fn new(
        id: &str,
        source_pdf_id: &str,
        url: &str,
        native_id: &str,
        native_id_namespace: &str,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            native_id: normalize_native_id(native_id),
            native_id_namespace: native_id_namespace.to_string(),
            s3_key: xml_key(id),
            source_pdf_id: source_pdf_id.to_string(),
            url: url.to_string(),
            new_format: true,
            created_date: created.to_rfc3339(),
            created_timestamp: created.timestamp(),
        }
    }
}

/// Case-fold and trim a native id so lookups are case-insensitive
pub fn normalize_native_id(native_id: &str) -> String {
    native_id.trim().to_lowercase()
}
