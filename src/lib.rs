//! GROBID Parse Server
//!
//! Fetches harvested PDFs from S3, runs them through GROBID, and stores the
//! resulting TEI XML (gzipped) in S3 with a DynamoDB record per extraction.
//!
//! # Modules
//!
//! - `pipeline`: the parse workflow (validate, fetch, check, extract, persist)
//! - `storage`: object storage (S3)
//! - `index`: extraction records (DynamoDB)
//! - `grobid`: GROBID REST client
//! - `routes`: HTTP surface

pub mod config;
pub mod disk;
pub mod error;
pub mod grobid;
pub mod index;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod storage;
