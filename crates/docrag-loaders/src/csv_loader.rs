//! CSV loading: one [`SourceDocument`] per data row.
//!
//! Rows are rendered as `header: value` lines so the embedded text keeps
//! the column names; the row index stands in for the page number in the
//! chunk id.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use docrag_core::types::SourceDocument;

use crate::list_files;

/// Load every `*.csv` under `dir` (recursive, sorted).
pub fn load_csv_dir(dir: &Path) -> Result<Vec<SourceDocument>> {
    let files = list_files(dir, "csv");
    if files.is_empty() {
        println!("No .csv files found under {}.", dir.display());
        return Ok(vec![]);
    }
    let mut documents = Vec::new();
    for (file_index, file_path) in files.iter().enumerate() {
        println!(
            "Loading CSV {}/{}: {}",
            file_index + 1,
            files.len(),
            file_path.display()
        );
        documents.extend(load_csv(file_path)?);
    }
    Ok(documents)
}

/// Load a single CSV file as per-row documents.
pub fn load_csv(path: &Path) -> Result<Vec<SourceDocument>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open CSV {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV headers in {}", path.display()))?
        .clone();

    let source = path.to_string_lossy().to_string();
    let mut documents = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("malformed CSV row in {}", path.display()))?;
        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join("\n");
        documents.push(SourceDocument {
            source: source.clone(),
            page: row_index,
            content,
        });
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rows_render_headers_and_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("items.csv");
        fs::write(&path, "name,price\nwidget,10\ngadget,25\n").unwrap();

        let documents = load_csv(&path).expect("load csv");
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].content, "name: widget\nprice: 10");
        assert_eq!(documents[0].page, 0);
        assert_eq!(documents[1].content, "name: gadget\nprice: 25");
        assert_eq!(documents[1].page, 1);
        assert_eq!(documents[0].source, path.to_string_lossy());
    }

    #[test]
    fn header_only_file_yields_no_documents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.csv");
        fs::write(&path, "name,price\n").unwrap();

        let documents = load_csv(&path).expect("load csv");
        assert!(documents.is_empty());
    }

    #[test]
    fn directory_load_aggregates_all_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.csv"), "h\n1\n2\n").unwrap();
        fs::write(tmp.path().join("b.csv"), "h\n3\n").unwrap();

        let documents = load_csv_dir(tmp.path()).expect("load dir");
        assert_eq!(documents.len(), 3);
        // Row indices restart per file.
        assert_eq!(documents[0].page, 0);
        assert_eq!(documents[1].page, 1);
        assert_eq!(documents[2].page, 0);
    }
}
