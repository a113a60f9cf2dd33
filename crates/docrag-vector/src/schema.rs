use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

/// Arrow column width for the vector field; derived from the shared core
/// constant so the model client and the store cannot drift apart. Inserts
/// with a different width are rejected.
pub const EMBEDDING_DIM: i32 = docrag_core::types::EMBEDDING_DIM as i32;

pub fn build_chunks_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("page", DataType::Int32, false),
        Field::new("chunk_index", DataType::Int32, false),
        Field::new("content", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIM,
            ),
            true,
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_column_width_matches_model_dimension() {
        let schema = build_chunks_schema();
        let field = schema.field_with_name("vector").expect("vector field");
        match field.data_type() {
            DataType::FixedSizeList(_, width) => {
                assert_eq!(*width, docrag_core::types::EMBEDDING_DIM as i32);
            }
            other => panic!("unexpected vector column type: {other:?}"),
        }
    }
}
