//! Extraction record index
//!
//! One record per stored TEI document, keyed by the generated id, with a
//! secondary index on the source PDF id used for duplicate detection.

mod dynamo;
#[cfg(test)]
mod memory;
mod types;

use async_trait::async_trait;

use crate::error::IndexError;

pub use dynamo::DynamoIndex;
#[cfg(test)]
pub use memory::MemoryIndex;
pub use types::*;

/// Minimal record store capability
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Write a record. Records are never updated after this.
    async fn put_record(&self, record: &ExtractionRecord) -> Result<(), IndexError>;

    /// Point lookup by generated id
    async fn get_record(&self, id: &str) -> Result<Option<ExtractionRecord>, IndexError>;

    /// Query the secondary index for records of a source PDF
    async fn query_by_source(&self, source_pdf_id: &str) -> Result<Vec<ExtractionRecord>, IndexError>;
}
