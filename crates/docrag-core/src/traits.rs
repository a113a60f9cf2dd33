use async_trait::async_trait;

/// Computes a fixed-dimension embedding vector for a piece of text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Embed a single text. Implementations must return exactly `dim()`
    /// floats for every input.
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Produces a text completion for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
