//! Storing extraction results
//!
//! XML goes to S3 first, then the record goes to the index. A record must
//! never point at XML that was not written; XML without a record is
//! tolerated and left in place.

use std::io::{Read, Write};
use std::sync::Arc;

use chrono::Utc;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::error::{AppError, Result, StorageError};
use crate::index::{ExtractionRecord, IndexStore};
use crate::storage::{ObjectStore, StorageObject};

use super::request::ParseRequest;

/// Gzip TEI XML for storage
pub fn compress_xml(xml: &str) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(xml.as_bytes())?;
    encoder.finish()
}

/// Inverse of [`compress_xml`]
pub fn decompress_xml(data: &[u8]) -> std::io::Result<String> {
    let mut xml = String::new();
    GzDecoder::new(data).read_to_string(&mut xml)?;
    Ok(xml)
}

/// Writes XML and its index record
#[derive(Clone)]
pub struct ResultPersister {
    objects: Arc<dyn ObjectStore>,
    index: Arc<dyn IndexStore>,
    xml_bucket: String,
}

impl ResultPersister {
    pub fn new(objects: Arc<dyn ObjectStore>, index: Arc<dyn IndexStore>, xml_bucket: String) -> Self {
        Self {
            objects,
            index,
            xml_bucket,
        }
    }

    pub fn xml_bucket(&self) -> &str {
        &self.xml_bucket
    }

    /// Store `xml` under `xml_id` and record it
    pub async fn save(&self, xml_id: &str, xml: &str, request: &ParseRequest) -> Result<ExtractionRecord> {
        let record = ExtractionRecord::new(
            xml_id,
            &request.pdf_uuid,
            &request.url,
            &request.native_id,
            &request.native_id_namespace,
            Utc::now(),
        );

        self.store_xml(xml, &record.s3_key, request).await?;

        if let Err(e) = self.index.put_record(&record).await {
            tracing::warn!(
                xml_id = %xml_id,
                s3_key = %record.s3_key,
                "Index write failed, stored XML has no record"
            );
            return Err(e.into());
        }

        tracing::info!(
            xml_id = %xml_id,
            pdf_uuid = %request.pdf_uuid,
            "Saved extraction"
        );
        Ok(record)
    }

    async fn store_xml(&self, xml: &str, key: &str, request: &ParseRequest) -> Result<()> {
        let compressed = compress_xml(xml)
            .map_err(|e| AppError::Internal(format!("Failed to compress XML: {}", e)))?;

        tracing::debug!(
            key = %key,
            raw_bytes = xml.len(),
            gz_bytes = compressed.len(),
            "Compressed XML"
        );

        // S3 metadata is sent as headers, so free text is percent-encoded
        let object = StorageObject::new(key, compressed)
            .with_content_type("application/gzip")
            .with_metadata("pdf_url", urlencoding::encode(&request.url))
            .with_metadata("native_id", urlencoding::encode(&request.native_id))
            .with_metadata(
                "native_id_namespace",
                urlencoding::encode(&request.native_id_namespace),
            );

        self.objects.put_object(&self.xml_bucket, object).await?;
        Ok(())
    }

    /// Load a stored record and its decompressed XML
    pub async fn load(&self, xml_id: &str) -> Result<(ExtractionRecord, String)> {
        let record = self
            .index
            .get_record(xml_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No extraction found with id: {}", xml_id)))?;

        let object = match self.objects.get_object(&self.xml_bucket, &record.s3_key).await {
            Ok(object) => object,
            Err(StorageError::ObjectNotFound { bucket, key }) => {
                return Err(AppError::NotFound(format!(
                    "XML not found in S3 bucket {}: {}",
                    bucket, key
                )))
            }
            Err(e) => return Err(e.into()),
        };

        let xml = decompress_xml(&object.data)
            .map_err(|e| AppError::Internal(format!("Failed to decompress {}: {}", record.s3_key, e)))?;

        Ok((record, xml))
    }
}
