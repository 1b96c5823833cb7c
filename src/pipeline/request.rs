//! Parse request validation

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Raw `POST /parse` body. Every field is optional here so that missing
/// fields are reported together by [`ParseRequestBody::validate`].
///
/// `pdf_key` is the older name for `pdf_uuid`. When both are sent,
/// `pdf_uuid` wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseRequestBody {
    pub url: Option<String>,
    pub pdf_uuid: Option<String>,
    pub pdf_key: Option<String>,
    pub native_id: Option<String>,
    pub native_id_namespace: Option<String>,
}

/// A request with all required fields present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRequest {
    pub url: String,
    pub pdf_uuid: String,
    pub native_id: String,
    pub native_id_namespace: String,
}

impl ParseRequestBody {
    /// Check that every field is present and non-blank
    pub fn validate(self) -> Result<ParseRequest> {
        // A missing source field is reported under the name the caller used
        let use_key = present(&self.pdf_uuid).is_none()
            && (present(&self.pdf_key).is_some() || (self.pdf_uuid.is_none() && self.pdf_key.is_some()));
        let source = if use_key {
            ("pdf_key", &self.pdf_key)
        } else {
            ("pdf_uuid", &self.pdf_uuid)
        };
        let fields = [
            ("url", &self.url),
            source,
            ("native_id", &self.native_id),
            ("native_id_namespace", &self.native_id_namespace),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }

        let take = |value: &Option<String>| present(value).unwrap_or_default().to_string();
        Ok(ParseRequest {
            url: take(&self.url),
            pdf_uuid: take(source.1),
            native_id: take(&self.native_id),
            native_id_namespace: take(&self.native_id_namespace),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
