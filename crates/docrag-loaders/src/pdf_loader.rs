//! PDF loading: one [`SourceDocument`] per page.

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;

use docrag_core::types::SourceDocument;

use crate::list_files;

/// Load every `*.pdf` under `dir` (recursive, sorted) as per-page
/// documents. Pages keep their zero-based position so chunk ids line up
/// with `"{source}:{page}:{chunk_index}"`.
pub fn load_pdf_dir(dir: &Path) -> Result<Vec<SourceDocument>> {
    let files = list_files(dir, "pdf");
    if files.is_empty() {
        println!("No .pdf files found under {}.", dir.display());
        return Ok(vec![]);
    }
    let mut documents = Vec::new();
    for (file_index, file_path) in files.iter().enumerate() {
        println!(
            "Loading PDF {}/{}: {}",
            file_index + 1,
            files.len(),
            file_path.display()
        );
        documents.extend(load_pdf(file_path)?);
    }
    Ok(documents)
}

/// Load a single PDF file, extracting the text of each page.
///
/// Blank pages still produce a document; the splitter drops them later so
/// page numbering stays aligned with the source file.
pub fn load_pdf(path: &Path) -> Result<Vec<SourceDocument>> {
    let doc =
        Document::load(path).with_context(|| format!("failed to load PDF {}", path.display()))?;
    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let source = path.to_string_lossy().to_string();
    let mut documents = Vec::new();
    for (page_index, page_number) in page_numbers.iter().enumerate() {
        let content = doc.extract_text(&[*page_number]).with_context(|| {
            format!(
                "failed to extract text from page {} of {}",
                page_number,
                path.display()
            )
        })?;
        documents.push(SourceDocument {
            source: source.clone(),
            page: page_index,
            content,
        });
    }
    Ok(documents)
}
