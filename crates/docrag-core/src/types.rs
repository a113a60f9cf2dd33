//! Domain types shared by the loaders, model client and vector store.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Dimensionality of the embedding vectors (`nomic-embed-text`). The model
/// client and the store schema both derive from this single constant.
pub const EMBEDDING_DIM: usize = 768;

/// A unit of source text prior to chunking.
///
/// PDFs produce one `SourceDocument` per page; CSVs produce one per data
/// row (with `page` holding the zero-based row index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source: String,
    pub page: usize,
    pub content: String,
}

/// A chunk of a source document that is independently embedded and stored.
///
/// - `id`: `"{source}:{page}:{chunk_index}"`, the deduplication key
/// - `source`: original path to the source file
/// - `page`: page number (PDF) or row index (CSV)
/// - `chunk_index`: position within the page, restarting at 0 per page
/// - `content`: the text payload of the chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub source: String,
    pub page: usize,
    pub chunk_index: usize,
    pub content: String,
}

/// A stored chunk returned by similarity search.
///
/// `score` is derived from the store's distance metric; higher is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: ChunkId,
    pub source: String,
    pub content: String,
    pub score: f32,
}

/// The final result of the query pipeline: generated text plus the ids of
/// the chunks that were given to the model as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<ChunkId>,
}
