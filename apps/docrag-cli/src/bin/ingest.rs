use std::{env, fs};

use indicatif::{ProgressBar, ProgressStyle};

use docrag_core::chunk::{filter_new, split_documents, CharacterSplitter};
use docrag_core::config::{expand_path, Config};
use docrag_loaders::{csv_loader, pdf_loader};
use docrag_model::default_embedder;
use docrag_vector::{ChunkStore, DEFAULT_TABLE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut reset = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--reset" | "-r" => reset = true,
            _ => {
                eprintln!("Usage: docrag-ingest [--reset]");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let data = config.data();
    let chunking = config.chunking();
    let model = config.model();
    let pdf_dir = expand_path(&data.pdf_dir);
    let csv_dir = expand_path(&data.csv_dir);
    let store_dir = expand_path(&data.lancedb_dir);

    println!("docrag ingest\n=============");
    println!("PDF directory: {}", pdf_dir.display());
    println!("CSV directory: {}", csv_dir.display());
    println!("Vector store: {}", store_dir.display());

    if reset {
        println!("Clearing vector store");
        if store_dir.exists() {
            fs::remove_dir_all(&store_dir)?;
        }
    }
    fs::create_dir_all(&store_dir)?;

    let splitter = CharacterSplitter::new(chunking.chunk_size, chunking.chunk_overlap);
    let pdf_documents = pdf_loader::load_pdf_dir(&pdf_dir)?;
    let mut chunks = split_documents(&splitter, &pdf_documents);
    let csv_documents = csv_loader::load_csv_dir(&csv_dir)?;
    chunks.extend(split_documents(&splitter, &csv_documents));
    println!(
        "Processed {} documents into {} chunks",
        pdf_documents.len() + csv_documents.len(),
        chunks.len()
    );

    let store = ChunkStore::open(&store_dir, DEFAULT_TABLE).await?;
    let existing = store.existing_ids().await?;
    println!("Number of existing chunks in store: {}", existing.len());

    let new_chunks = filter_new(chunks, &existing);
    if new_chunks.is_empty() {
        println!("No new chunks to add");
        return Ok(());
    }
    println!("Adding new chunks: {}", new_chunks.len());

    let embedder = default_embedder(&model);
    let pb = ProgressBar::new(new_chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    let mut embeddings = Vec::with_capacity(new_chunks.len());
    for chunk in &new_chunks {
        embeddings.push(embedder.embed(&chunk.content).await?);
        pb.inc(1);
    }
    pb.finish_with_message("embedding completed");

    let inserted = store.insert(&new_chunks, &embeddings).await?;
    println!("\n✅ Ingest completed successfully!");
    println!("📊 Inserted {} chunks into the vector store", inserted);
    Ok(())
}
