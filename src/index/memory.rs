//! In-memory record index for tests

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::IndexError;

use super::types::ExtractionRecord;
use super::IndexStore;

#[derive(Default)]
pub struct MemoryIndex {
    records: RwLock<Vec<ExtractionRecord>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<ExtractionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl IndexStore for MemoryIndex {
    async fn put_record(&self, record: &ExtractionRecord) -> Result<(), IndexError> {
        let mut records = self.records.write().await;
        records.retain(|r| r.id != record.id);
        records.push(record.clone());
        Ok(())
    }

    async fn get_record(&self, id: &str) -> Result<Option<ExtractionRecord>, IndexError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn query_by_source(&self, source_pdf_id: &str) -> Result<Vec<ExtractionRecord>, IndexError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.source_pdf_id == source_pdf_id)
            .cloned()
            .collect())
    }
}
