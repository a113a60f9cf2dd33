//! LanceDB connection and chunk table operations.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use arrow_array::{
    FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};

use docrag_core::error::Error;
use docrag_core::types::{ChunkId, DocumentChunk, RetrievedChunk};

use crate::schema::{build_chunks_schema, EMBEDDING_DIM};

pub const DEFAULT_TABLE: &str = "chunks";

const INSERT_BATCH_SIZE: usize = 256;

pub struct ChunkStore {
    db: Connection,
    table_name: String,
}

impl ChunkStore {
    /// Open the store, creating an empty chunk table when absent. Used by
    /// ingestion.
    pub async fn open(db_path: &Path, table_name: &str) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        let store = Self {
            db,
            table_name: table_name.to_string(),
        };
        store.ensure_table().await?;
        Ok(store)
    }

    /// Open the store but fail when the chunk table does not exist. Used by
    /// the query pipeline so an un-ingested store is an error, not an empty
    /// answer.
    pub async fn open_existing(db_path: &Path, table_name: &str) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        let names = db.table_names().execute().await?;
        if !names.contains(&table_name.to_string()) {
            return Err(Error::StoreMissing(table_name.to_string()).into());
        }
        Ok(Self {
            db,
            table_name: table_name.to_string(),
        })
    }

    async fn ensure_table(&self) -> Result<()> {
        let names = self.db.table_names().execute().await?;
        if names.contains(&self.table_name) {
            return Ok(());
        }
        // create empty table with 0 rows
        let schema = build_chunks_schema();
        let iter = RecordBatchIterator::new(vec![].into_iter(), schema);
        self.db
            .create_table(&self.table_name, Box::new(iter))
            .execute()
            .await?;
        Ok(())
    }

    /// Scan every stored chunk id into a set; this is the dedup lookup the
    /// ingest pipeline filters against.
    pub async fn existing_ids(&self) -> Result<HashSet<ChunkId>> {
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table.query().execute().await?;
        let mut ids = HashSet::new();
        while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
            let id_col = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("id column missing from chunk table"))?;
            for i in 0..batch.num_rows() {
                ids.insert(id_col.value(i).to_string());
            }
        }
        Ok(ids)
    }

    /// Insert chunks with their embeddings, in record batches. Callers are
    /// expected to have filtered out existing ids already.
    pub async fn insert(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        assert_eq!(
            chunks.len(),
            embeddings.len(),
            "chunks and embeddings length must match"
        );
        for vector in embeddings {
            if vector.len() != EMBEDDING_DIM as usize {
                return Err(anyhow!(
                    "dim mismatch: got {} expected {}",
                    vector.len(),
                    EMBEDDING_DIM
                ));
            }
        }
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut inserted = 0usize;
        for (chunk_batch, emb_batch) in chunks
            .chunks(INSERT_BATCH_SIZE)
            .zip(embeddings.chunks(INSERT_BATCH_SIZE))
        {
            let record_batch = chunks_to_record_batch(chunk_batch, emb_batch)?;
            let schema = record_batch.schema();
            let reader = Box::new(RecordBatchIterator::new(
                vec![Ok(record_batch)].into_iter(),
                schema,
            ));
            table.add(reader).execute().await?;
            inserted += chunk_batch.len();
        }
        Ok(inserted)
    }

    /// Nearest-neighbor search over the stored vectors; returns at most `k`
    /// chunks, best first. Score is `1.0 - distance`.
    pub async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table
            .vector_search(query_vector.to_vec())?
            .limit(k)
            .execute()
            .await?;
        let mut results = Vec::new();
        while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
            let id_col = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("id column missing from chunk table"))?;
            let source_col = batch
                .column_by_name("source")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("source column missing from chunk table"))?;
            let content_col = batch
                .column_by_name("content")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("content column missing from chunk table"))?;
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());
            for i in 0..batch.num_rows() {
                let score = match distance_col {
                    Some(col) => 1.0 - col.value(i),
                    None => 0.5,
                };
                results.push(RetrievedChunk {
                    id: id_col.value(i).to_string(),
                    source: source_col.value(i).to_string(),
                    content: content_col.value(i).to_string(),
                    score,
                });
            }
        }
        results.truncate(k);
        Ok(results)
    }
}

fn chunks_to_record_batch(
    chunks: &[DocumentChunk],
    embeddings: &[Vec<f32>],
) -> Result<RecordBatch> {
    let schema = build_chunks_schema();
    let mut ids = Vec::new();
    let mut sources = Vec::new();
    let mut pages = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut contents = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
        ids.push(chunk.id.clone());
        sources.push(chunk.source.clone());
        pages.push(chunk.page as i32);
        chunk_indices.push(chunk.chunk_index as i32);
        contents.push(chunk.content.clone());
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int32Array::from(pages)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(StringArray::from(contents)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<
                arrow_array::types::Float32Type,
                _,
                _,
            >(vectors.into_iter(), EMBEDDING_DIM)),
        ],
    )?;
    Ok(record_batch)
}
