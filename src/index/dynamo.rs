//! DynamoDB-backed record index

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::{error::DisplayErrorContext, types::AttributeValue, Client};

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::storage::xml_key;

use super::types::ExtractionRecord;
use super::IndexStore;

type Item = HashMap<String, AttributeValue>;

/// Record index stored in a DynamoDB table
#[derive(Clone)]
pub struct DynamoIndex {
    client: Client,
    table: String,
    source_index: String,
}

impl DynamoIndex {
    pub fn new(sdk_config: &SdkConfig, config: &IndexConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            table: config.table.clone(),
            source_index: config.source_index.clone(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl IndexStore for DynamoIndex {
    async fn put_record(&self, record: &ExtractionRecord) -> Result<(), IndexError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| {
                IndexError::SdkError(format!("Failed to put record {}: {}", record.id, DisplayErrorContext(&e)))
            })?;

        tracing::debug!(table = %self.table, xml_id = %record.id, "Stored record");
        Ok(())
    }

    async fn get_record(&self, id: &str) -> Result<Option<ExtractionRecord>, IndexError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| {
                IndexError::SdkError(format!("Failed to get record {}: {}", id, DisplayErrorContext(&e)))
            })?;

        response.item().map(from_item).transpose()
    }

    async fn query_by_source(&self, source_pdf_id: &str) -> Result<Vec<ExtractionRecord>, IndexError> {
        let response = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(&self.source_index)
            .key_condition_expression("source_pdf_id = :source_pdf_id")
            .expression_attribute_values(":source_pdf_id", AttributeValue::S(source_pdf_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                IndexError::SdkError(format!(
                    "Failed to query {} for {}: {}",
                    self.source_index,
                    source_pdf_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        response.items().iter().map(from_item).collect()
    }
}

fn to_item(record: &ExtractionRecord) -> Item {
    let s = |v: &str| AttributeValue::S(v.to_string());
    HashMap::from([
        ("id".to_string(), s(&record.id)),
        ("native_id".to_string(), s(&record.native_id)),
        ("native_id_namespace".to_string(), s(&record.native_id_namespace)),
        ("s3_key".to_string(), s(&record.s3_key)),
        ("source_pdf_id".to_string(), s(&record.source_pdf_id)),
        ("url".to_string(), s(&record.url)),
        ("new_format".to_string(), AttributeValue::Bool(record.new_format)),
        ("created_date".to_string(), s(&record.created_date)),
        (
            "created_timestamp".to_string(),
            AttributeValue::N(record.created_timestamp.to_string()),
        ),
    ])
}

/// Only `id` is required. Index projections may carry nothing but keys, and
/// records from older deployments lack the format flag and timestamps.
fn from_item(item: &Item) -> Result<ExtractionRecord, IndexError> {
    let id = string_attr(item, "id").ok_or_else(|| IndexError::Malformed {
        id: string_attr(item, "source_pdf_id")
            .map(|source| format!("<source {}>", source))
            .unwrap_or_default(),
        reason: "missing attribute id".to_string(),
    })?;

    let created_timestamp = match item.get("created_timestamp") {
        Some(AttributeValue::N(n)) => n.parse().map_err(|_| IndexError::Malformed {
            id: id.clone(),
            reason: format!("bad created_timestamp {}", n),
        })?,
        _ => 0,
    };
    let new_format = matches!(item.get("new_format"), Some(AttributeValue::Bool(true)));
    let s3_key = string_attr(item, "s3_key").unwrap_or_else(|| xml_key(&id));

    Ok(ExtractionRecord {
        id,
        native_id: string_attr(item, "native_id").unwrap_or_default(),
        native_id_namespace: string_attr(item, "native_id_namespace").unwrap_or_default(),
        s3_key,
        source_pdf_id: string_attr(item, "source_pdf_id").unwrap_or_default(),
        url: string_attr(item, "url").unwrap_or_default(),
        new_format,
        created_date: string_attr(item, "created_date").unwrap_or_default(),
        created_timestamp,
    })
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name).and_then(|v| v.as_s().ok()).cloned()
}
