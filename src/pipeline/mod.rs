//! PDF parse workflow
//!
//! One request runs strictly in order:
//!
//! 1. optional duplicate check against the source PDF index
//! 2. fetch `<pdf_uuid>.pdf` from the PDF bucket
//! 3. size and emptiness checks
//! 4. GROBID full-text extraction
//! 5. gzip + store XML, then write the index record
//!
//! The first failing step ends the request. Nothing is retried.

mod content;
mod persist;
mod request;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::grobid::ExtractionService;
use crate::index::{ExtractionRecord, IndexStore};
use crate::storage::{pdf_key, ObjectStore};

pub use content::check_content;
pub use persist::{compress_xml, decompress_xml, ResultPersister};
pub use request::{ParseRequest, ParseRequestBody};

/// Successful `POST /parse` result
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    pub id: String,
    pub status: &'static str,
    pub xml_content: String,
    pub s3_key: String,
    pub s3_path: String,
}

/// A stored extraction read back by id
#[derive(Debug, Clone, Serialize)]
pub struct StoredExtraction {
    #[serde(flatten)]
    pub record: ExtractionRecord,
    pub xml_content: String,
}

/// Settings the workflow reads from [`Config`]
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub pdf_bucket: String,
    pub xml_bucket: String,
    pub max_file_size_mb: u64,
    pub duplicate_check: bool,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            pdf_bucket: config.storage.pdf_bucket.clone(),
            xml_bucket: config.storage.xml_bucket.clone(),
            max_file_size_mb: config.parse.max_file_size_mb,
            duplicate_check: config.parse.duplicate_check,
        }
    }
}

/// The parse workflow with its three collaborators
#[derive(Clone)]
pub struct ParsePipeline {
    objects: Arc<dyn ObjectStore>,
    index: Arc<dyn IndexStore>,
    grobid: Arc<dyn ExtractionService>,
    persister: ResultPersister,
    settings: PipelineSettings,
}

impl ParsePipeline {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        index: Arc<dyn IndexStore>,
        grobid: Arc<dyn ExtractionService>,
        settings: PipelineSettings,
    ) -> Self {
        let persister = ResultPersister::new(objects.clone(), index.clone(), settings.xml_bucket.clone());
        Self {
            objects,
            index,
            grobid,
            persister,
            settings,
        }
    }

    /// GROBID liveness, never an error
    pub async fn grobid_alive(&self) -> bool {
        self.grobid.is_alive().await
    }

    /// Run the full workflow for a validated request
    pub async fn parse(&self, request: ParseRequest) -> Result<ParseResponse> {
        tracing::info!(pdf_uuid = %request.pdf_uuid, "Parsing PDF");

        if self.settings.duplicate_check {
            self.check_duplicate(&request.pdf_uuid).await?;
        }

        let pdf = self.fetch_pdf(&request.pdf_uuid).await?;
        check_content(&pdf, self.settings.max_file_size_mb)?;

        let xml = self.extract(&request.pdf_uuid, pdf).await?;

        let xml_id = Uuid::new_v4().to_string();
        let record = self.persister.save(&xml_id, &xml, &request).await?;

        Ok(ParseResponse {
            s3_path: format!("s3://{}/{}", self.persister.xml_bucket(), record.s3_key),
            s3_key: record.s3_key,
            id: record.id,
            status: "success",
            xml_content: xml,
        })
    }

    /// Read back a stored extraction
    pub async fn load(&self, xml_id: &str) -> Result<StoredExtraction> {
        let (record, xml_content) = self.persister.load(xml_id).await?;
        Ok(StoredExtraction { record, xml_content })
    }

    /// Fail with `AlreadyProcessed` if the source PDF already has a record.
    ///
    /// Not atomic with the later write: two concurrent requests for the
    /// same PDF can both pass and both write.
    async fn check_duplicate(&self, pdf_uuid: &str) -> Result<()> {
        let existing = self.index.query_by_source(pdf_uuid).await?;
        if let Some(previous) = existing.first() {
            tracing::info!(pdf_uuid = %pdf_uuid, xml_id = %previous.id, "PDF already parsed");
            return Err(AppError::AlreadyProcessed(previous.id.clone()));
        }
        Ok(())
    }

    async fn fetch_pdf(&self, pdf_uuid: &str) -> Result<Vec<u8>> {
        let object = self
            .objects
            .get_object(&self.settings.pdf_bucket, &pdf_key(pdf_uuid))
            .await?;

        tracing::debug!(pdf_uuid = %pdf_uuid, bytes = object.size(), "Fetched PDF");
        Ok(object.data)
    }

    async fn extract(&self, pdf_uuid: &str, pdf: Vec<u8>) -> Result<String> {
        let started = std::time::Instant::now();
        let xml = self.grobid.process_fulltext(pdf).await?;

        tracing::debug!(
            pdf_uuid = %pdf_uuid,
            bytes = xml.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GROBID finished"
        );

        if xml.is_empty() {
            return Err(AppError::EmptyResult);
        }
        Ok(xml)
    }
}
