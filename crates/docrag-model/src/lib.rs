#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! Client for the locally served model API (Ollama).
//!
//! One `POST /api/embeddings` call per text and one `POST /api/generate`
//! call per prompt; no retries or streaming. Tests and development can
//! swap in a deterministic [`FakeEmbedder`] via `APP_USE_FAKE_EMBEDDINGS=1`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use docrag_core::config::ModelSettings;
use docrag_core::error::Error;
use docrag_core::traits::{Embedder, Generator};

pub use docrag_core::types::EMBEDDING_DIM;

pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    embed_model: String,
    generate_model: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f64>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, embed_model: &str, generate_model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            embed_model: embed_model.to_string(),
            generate_model: generate_model.to_string(),
        }
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, request: &Req) -> anyhow::Result<Resp>
    where
        Req: Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ModelServer(format!("{} returned {}: {}", url, status, body)).into());
        }
        Ok(response.json::<Resp>().await?)
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let request = EmbeddingsRequest {
            model: &self.embed_model,
            prompt: text,
        };
        let response: EmbeddingsResponse = self.post_json("/api/embeddings", &request).await?;
        if response.embedding.len() != EMBEDDING_DIM {
            return Err(Error::ModelServer(format!(
                "embedding dim mismatch: got {} expected {}",
                response.embedding.len(),
                EMBEDDING_DIM
            ))
            .into());
        }
        Ok(response.embedding.iter().map(|&x| x as f32).collect())
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateRequest {
            model: &self.generate_model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse = self.post_json("/api/generate", &request).await?;
        Ok(response.response)
    }
}

/// Hash-based embedder with no model behind it: deterministic, normalized,
/// fast. Only for tests and development.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Build the embedder for the configured model server, honoring the
/// `APP_USE_FAKE_EMBEDDINGS` switch.
pub fn default_embedder(model: &ModelSettings) -> Box<dyn Embedder> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        println!("🧪 Using FakeEmbedder");
        return Box::new(FakeEmbedder::new(EMBEDDING_DIM));
    }
    Box::new(OllamaClient::new(
        &model.base_url,
        &model.embed_model,
        &model.generate_model,
    ))
}
