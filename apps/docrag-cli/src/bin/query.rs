use std::env;

use docrag_core::config::{expand_path, Config};
use docrag_core::error::Error;
use docrag_core::prompt::build_prompt;
use docrag_core::traits::Generator;
use docrag_core::types::Answer;
use docrag_model::{default_embedder, OllamaClient};
use docrag_vector::{ChunkStore, DEFAULT_TABLE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <question> [--k N]", args[0]);
        eprintln!(
            "Example: {} 'How do I store potatoes over winter?' --k 5",
            args[0]
        );
        std::process::exit(1);
    }
    let question = &args[1];
    if question.trim().is_empty() {
        return Err(Error::EmptyQuestion.into());
    }

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut k = config.search().k;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--k" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        k = n;
                        i += 1;
                    } else {
                        eprintln!("Error: --k requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --k requires a number");
                    std::process::exit(1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    let data = config.data();
    let model = config.model();
    let store_dir = expand_path(&data.lancedb_dir);

    println!("🔍 docrag query\n===============");
    println!("Question: {}", question);
    println!("Vector store: {}", store_dir.display());

    let store = ChunkStore::open_existing(&store_dir, DEFAULT_TABLE).await?;
    let embedder = default_embedder(&model);
    let query_vector = embedder.embed(question).await?;
    let hits = store.search(&query_vector, k).await?;
    println!("Retrieved {} context chunks", hits.len());

    let prompt = build_prompt(&hits, question)?;
    let client = OllamaClient::new(&model.base_url, &model.embed_model, &model.generate_model);
    let text = client.generate(&prompt).await?;

    let answer = Answer {
        text,
        sources: hits.iter().map(|h| h.id.clone()).collect(),
    };
    println!("\n💬 Answer:\n{}", answer.text);
    println!("\n📚 Sources:");
    for source in &answer.sources {
        println!("  - {}", source);
    }
    Ok(())
}
