//! Character splitter with overlap and stable chunk-id assignment.
//!
//! Splitting prefers paragraph, then line, then word boundaries and only
//! falls back to hard character cuts for unbroken runs. Chunk ids follow
//! `"{source}:{page}:{chunk_index}"` where the index restarts at 0 whenever
//! the `{source}:{page}` prefix changes; the id is the deduplication key
//! for the vector store.

use std::collections::HashSet;

use crate::types::{ChunkId, DocumentChunk, SourceDocument};

const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

#[derive(Debug, Clone)]
pub struct CharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for CharacterSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 80,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn joined_len(window: &[&str], sep_len: usize) -> usize {
    let content: usize = window.iter().map(|p| char_len(p)).sum();
    content + sep_len * window.len().saturating_sub(1)
}

impl CharacterSplitter {
    /// `chunk_size` and `chunk_overlap` are measured in characters; the
    /// overlap is clamped below the chunk size so splitting always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    ///
    /// Whitespace-only input yields no chunks; input that already fits
    /// yields exactly one chunk.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.split_level(text, &SEPARATORS, &mut out);
        out
    }

    fn split_level(&self, text: &str, separators: &[&str], out: &mut Vec<String>) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if char_len(trimmed) <= self.chunk_size {
            out.push(trimmed.to_string());
            return;
        }
        match separators.split_first() {
            Some((sep, rest)) => {
                if trimmed.contains(sep) {
                    let parts: Vec<&str> = trimmed.split(sep).collect();
                    self.merge_parts(&parts, sep, rest, out);
                } else {
                    self.split_level(trimmed, rest, out);
                }
            }
            None => self.hard_split(trimmed, out),
        }
    }

    /// Greedily pack separator-delimited parts into windows of at most
    /// `chunk_size` characters, carrying a tail of at most `chunk_overlap`
    /// characters into the next window. Oversized parts recurse into the
    /// next separator level.
    fn merge_parts(&self, parts: &[&str], sep: &str, rest: &[&str], out: &mut Vec<String>) {
        let sep_len = char_len(sep);
        let mut window: Vec<&str> = Vec::new();
        for &part in parts {
            if part.is_empty() {
                continue;
            }
            let part_len = char_len(part);
            if part_len > self.chunk_size {
                push_joined(&window, sep, out);
                window.clear();
                self.split_level(part, rest, out);
                continue;
            }
            if !window.is_empty() && joined_len(&window, sep_len) + sep_len + part_len > self.chunk_size {
                push_joined(&window, sep, out);
                while !window.is_empty()
                    && (joined_len(&window, sep_len) > self.chunk_overlap
                        || joined_len(&window, sep_len) + sep_len + part_len > self.chunk_size)
                {
                    window.remove(0);
                }
            }
            window.push(part);
        }
        push_joined(&window, sep, out);
    }

    /// Last resort for text with no usable separator: fixed character
    /// windows stepping by `chunk_size - chunk_overlap`. Operates on char
    /// boundaries, never on raw bytes.
    fn hard_split(&self, text: &str, out: &mut Vec<String>) {
        let chars: Vec<char> = text.chars().collect();
        let mut start = 0usize;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start = end - self.chunk_overlap;
        }
    }
}

fn push_joined(window: &[&str], sep: &str, out: &mut Vec<String>) {
    if window.is_empty() {
        return;
    }
    let joined = window.join(sep);
    let joined = joined.trim();
    if !joined.is_empty() {
        out.push(joined.to_string());
    }
}

/// Split every document and assign deterministic chunk ids.
///
/// Documents are processed in order; the chunk index restarts whenever the
/// `{source}:{page}` prefix differs from the previous chunk's, matching the
/// id scheme `"{source}:{page}:{chunk_index}"`.
pub fn split_documents(
    splitter: &CharacterSplitter,
    documents: &[SourceDocument],
) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();
    let mut last_page_key: Option<String> = None;
    let mut chunk_index = 0usize;
    for doc in documents {
        let page_key = format!("{}:{}", doc.source, doc.page);
        for piece in splitter.split(&doc.content) {
            if last_page_key.as_deref() == Some(page_key.as_str()) {
                chunk_index += 1;
            } else {
                chunk_index = 0;
            }
            last_page_key = Some(page_key.clone());
            chunks.push(DocumentChunk {
                id: format!("{}:{}", page_key, chunk_index),
                source: doc.source.clone(),
                page: doc.page,
                chunk_index,
                content: piece,
            });
        }
    }
    chunks
}

/// Keep only chunks whose id is not already present in the store; this is
/// what makes re-running ingestion idempotent.
pub fn filter_new(chunks: Vec<DocumentChunk>, existing: &HashSet<ChunkId>) -> Vec<DocumentChunk> {
    chunks
        .into_iter()
        .filter(|c| !existing.contains(&c.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, page: usize, content: &str) -> SourceDocument {
        SourceDocument {
            source: source.to_string(),
            page,
            content: content.to_string(),
        }
    }

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = CharacterSplitter::default();
        let chunks = splitter.split("Short text");
        assert_eq!(chunks, vec!["Short text".to_string()]);
    }

    #[test]
    fn whitespace_only_yields_no_chunks() {
        let splitter = CharacterSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("  \n\n  ").is_empty());
    }

    #[test]
    fn chunks_never_exceed_chunk_size() {
        let splitter = CharacterSplitter::new(100, 20);
        let words: Vec<String> = (0..200).map(|i| format!("word{i}")).collect();
        let text = words.join(" ");
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let splitter = CharacterSplitter::new(100, 20);
        let words: Vec<String> = (0..200).map(|i| format!("word{i}")).collect();
        let text = words.join(" ");
        let chunks = splitter.split(&text);
        for pair in chunks.windows(2) {
            let first_word = pair[1].split_whitespace().next().unwrap();
            assert!(
                pair[0].contains(first_word),
                "chunk {:?} does not carry overlap into {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let splitter = CharacterSplitter::new(100, 20);
        let para_a = "a".repeat(60);
        let para_b = "b".repeat(60);
        let text = format!("{para_a}\n\n{para_b}");
        let chunks = splitter.split(&text);
        assert_eq!(chunks, vec![para_a, para_b]);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let splitter = CharacterSplitter::new(100, 10);
        let text = "é".repeat(1000);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn ids_restart_per_page_and_increment_within() {
        let splitter = CharacterSplitter::new(50, 10);
        let two_chunk_page = format!("{}\n\n{}", "a".repeat(40), "b".repeat(40));
        let documents = vec![
            doc("data/pdf/a.pdf", 0, &two_chunk_page),
            doc("data/pdf/a.pdf", 1, "short page"),
            doc("data/csv/b.csv", 0, "name: widget"),
        ];
        let chunks = split_documents(&splitter, &documents);
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "data/pdf/a.pdf:0:0",
                "data/pdf/a.pdf:0:1",
                "data/pdf/a.pdf:1:0",
                "data/csv/b.csv:0:0",
            ]
        );
    }

    #[test]
    fn ids_are_unique_across_a_run() {
        let splitter = CharacterSplitter::new(50, 10);
        let body = format!("{}\n\n{}\n\n{}", "x".repeat(40), "y".repeat(40), "z".repeat(40));
        let documents = vec![
            doc("a.pdf", 0, &body),
            doc("a.pdf", 1, &body),
            doc("b.pdf", 0, &body),
        ];
        let chunks = split_documents(&splitter, &documents);
        let unique: HashSet<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(unique.len(), chunks.len());
    }

    #[test]
    fn filter_new_skips_existing_ids() {
        let splitter = CharacterSplitter::default();
        let documents = vec![doc("a.pdf", 0, "alpha"), doc("a.pdf", 1, "bravo")];
        let chunks = split_documents(&splitter, &documents);
        let mut existing = HashSet::new();
        existing.insert("a.pdf:0:0".to_string());
        let fresh = filter_new(chunks, &existing);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "a.pdf:1:0");
    }
}
