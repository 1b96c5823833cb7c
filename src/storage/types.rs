//! Storage types

use std::collections::HashMap;

/// An object with its data and user metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageObject {
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    /// User metadata (`x-amz-meta-*`). Values must be header-safe.
    pub metadata: HashMap<String, String>,
}

impl StorageObject {
    pub fn new(key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            data,
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Key of a source PDF in the PDF bucket
pub fn pdf_key(pdf_uuid: &str) -> String {
    format!("{}.pdf", pdf_uuid)
}

/// Key of the gzipped TEI document in the XML bucket
pub fn xml_key(xml_id: &str) -> String {
    format!("{}.xml.gz", xml_id)
}
