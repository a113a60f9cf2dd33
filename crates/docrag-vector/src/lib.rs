#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! LanceDB persistence for embedded chunks.
//!
//! One table holds (id, source, page, chunk_index, content, vector) rows.
//! Chunk ids are unique within the table; the ingest pipeline scans them
//! via [`store::ChunkStore::existing_ids`] before inserting so re-runs are
//! idempotent.

pub mod schema;
pub mod store;

pub use store::{ChunkStore, DEFAULT_TABLE};
