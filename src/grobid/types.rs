//! GROBID client types

use thiserror::Error;

/// Errors from the GROBID client
#[derive(Debug, Error)]
pub enum GrobidError {
    /// GROBID answered with a non-success status
    #[error("GROBID returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection failure or timeout
    #[error("Failed to call GROBID: {0}")]
    Transport(String),

    /// Response body could not be read as text
    #[error("Failed to read GROBID response: {0}")]
    Decode(String),
}

/// Form flags sent with every full-text request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FulltextOptions {
    pub segment_sentences: bool,
    pub include_raw_citations: bool,
    pub include_raw_affiliations: bool,
}

impl Default for FulltextOptions {
    fn default() -> Self {
        Self {
            segment_sentences: true,
            include_raw_citations: true,
            include_raw_affiliations: true,
        }
    }
}

impl FulltextOptions {
    /// Form fields as GROBID expects them ("1"/"0")
    pub fn form_fields(&self) -> [(&'static str, &'static str); 3] {
        let flag = |on: bool| if on { "1" } else { "0" };
        [
            ("segmentSentences", flag(self.segment_sentences)),
            ("includeRawCitations", flag(self.include_raw_citations)),
            ("includeRawAffiliations", flag(self.include_raw_affiliations)),
        ]
    }
}
