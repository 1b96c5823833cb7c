//! GROBID extraction service
//!
//! GROBID turns a PDF into TEI XML. The server talks to it over HTTP:
//! - `GET /api/isalive` for liveness
//! - `POST /api/processFulltextDocument` with a multipart PDF upload

mod client;
mod types;

pub use client::{ExtractionService, GrobidClient};
pub use types::{FulltextOptions, GrobidError};

#[cfg(test)]
pub use client::MockGrobid;
