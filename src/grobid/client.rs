//! GROBID HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::config::GrobidConfig;

use super::types::{FulltextOptions, GrobidError};

/// Remote extraction capability
#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// Liveness check. Any failure reads as "not alive".
    async fn is_alive(&self) -> bool;

    /// Run full-text extraction on a PDF and return the TEI body
    async fn process_fulltext(&self, pdf: Vec<u8>) -> Result<String, GrobidError>;
}

/// GROBID REST client
#[derive(Clone)]
pub struct GrobidClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
    options: FulltextOptions,
}

impl GrobidClient {
    pub fn new(config: &GrobidConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            health_timeout: config.health_timeout(),
            options: FulltextOptions::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExtractionService for GrobidClient {
    async fn is_alive(&self) -> bool {
        let url = format!("{}/api/isalive", self.base_url);

        match self.http.get(&url).timeout(self.health_timeout).send().await {
            Ok(response) => {
                let alive = response.status().is_success();
                if !alive {
                    tracing::debug!(status = %response.status(), "GROBID liveness check failed");
                }
                alive
            }
            Err(e) => {
                tracing::debug!("GROBID unreachable: {}", e);
                false
            }
        }
    }

    async fn process_fulltext(&self, pdf: Vec<u8>) -> Result<String, GrobidError> {
        let url = format!("{}/api/processFulltextDocument", self.base_url);

        let part = Part::bytes(pdf)
            .file_name("file.pdf")
            .mime_str("application/pdf")
            .map_err(|e| GrobidError::Transport(format!("Failed to build upload: {}", e)))?;

        let form = self
            .options
            .form_fields()
            .into_iter()
            .fold(Form::new().part("input", part), |form, (name, value)| {
                form.text(name, value)
            });

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GrobidError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GrobidError::Status { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GrobidError::Decode(e.to_string()))?;

        String::from_utf8(bytes.to_vec()).map_err(|e| GrobidError::Decode(e.to_string()))
    }
}

/// Canned GROBID for testing
#[cfg(test)]
pub struct MockGrobid {
    pub alive: bool,
    pub response: Result<String, (u16, String)>,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGrobid {
    pub fn returning(xml: &str) -> Self {
        Self {
            alive: true,
            response: Ok(xml.to_string()),
            calls: Default::default(),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            alive: true,
            response: Err((status, body.to_string())),
            calls: Default::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl ExtractionService for MockGrobid {
    async fn is_alive(&self) -> bool {
        self.alive
    }

    async fn process_fulltext(&self, _pdf: Vec<u8>) -> Result<String, GrobidError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(xml) => Ok(xml.clone()),
            Err((status, body)) => Err(GrobidError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
