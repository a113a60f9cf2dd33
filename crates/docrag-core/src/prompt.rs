//! Prompt assembly for the query pipeline.

use crate::error::{Error, Result};
use crate::types::RetrievedChunk;

const PROMPT_TEMPLATE: &str = "Answer the question based only on the following context:

{context}

---

Answer the question based on the above context: {question}";

/// Build the generation prompt from the retrieved chunks and the question.
///
/// Chunk texts are joined by `\n\n---\n\n` in retrieval order. An empty or
/// whitespace-only question is rejected before any model call is made.
pub fn build_prompt(chunks: &[RetrievedChunk], question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::EmptyQuestion);
    }
    let context = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    Ok(PROMPT_TEMPLATE
        .replace("{context}", &context)
        .replace("{question}", question))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            id: id.to_string(),
            source: "a.pdf".to_string(),
            content: content.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn joins_context_in_retrieval_order() {
        let chunks = vec![chunk("a.pdf:0:0", "first"), chunk("a.pdf:0:1", "second")];
        let prompt = build_prompt(&chunks, "What happened?").unwrap();
        assert!(prompt.contains("first\n\n---\n\nsecond"));
        assert!(prompt.ends_with("Answer the question based on the above context: What happened?"));
    }

    #[test]
    fn rejects_empty_question() {
        let err = build_prompt(&[], "   ").unwrap_err();
        assert!(matches!(err, Error::EmptyQuestion));
    }

    #[test]
    fn empty_context_still_renders() {
        let prompt = build_prompt(&[], "q").unwrap();
        assert!(prompt.starts_with("Answer the question based only on the following context:"));
    }
}
