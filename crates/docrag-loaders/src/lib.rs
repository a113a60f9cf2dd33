#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Filesystem document loaders.
//!
//! Each loader walks a directory for files with one extension and turns
//! them into [`SourceDocument`]s: PDFs become one document per page, CSVs
//! one document per data row.

pub mod csv_loader;
pub mod pdf_loader;

use std::path::{Path, PathBuf};

/// Recursively list files with the given extension under `root`, sorted
/// for deterministic ingestion order (chunk ids depend on it).
pub fn list_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some(extension) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_files_filters_by_extension_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("b.csv"), "h\nv").unwrap();
        fs::write(dir.join("a.csv"), "h\nv").unwrap();
        fs::write(dir.join("notes.txt"), "skip me").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/c.csv"), "h\nv").unwrap();

        let files = list_files(dir, "csv");
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "nested/c.csv"]);
    }

    #[test]
    fn list_files_on_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(list_files(&missing, "pdf").is_empty());
    }
}
