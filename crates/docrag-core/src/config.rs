//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars, then exposes typed sections with per-field defaults so a partial
//! (or absent) config file still yields a runnable pipeline.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

/// Input and store directories.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,
    #[serde(default = "default_csv_dir")]
    pub csv_dir: String,
    #[serde(default = "default_lancedb_dir")]
    pub lancedb_dir: String,
}

/// Local model server endpoint and model names.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
    #[serde(default = "default_generate_model")]
    pub generate_model: String,
}

/// Character splitter parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

/// Retrieval parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_pdf_dir() -> String {
    "data/pdf".to_string()
}
fn default_csv_dir() -> String {
    "data/csv".to_string()
}
fn default_lancedb_dir() -> String {
    "data/lancedb".to_string()
}
fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}
fn default_generate_model() -> String {
    "mistral".to_string()
}
fn default_chunk_size() -> usize {
    800
}
fn default_chunk_overlap() -> usize {
    80
}
fn default_k() -> usize {
    5
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            pdf_dir: default_pdf_dir(),
            csv_dir: default_csv_dir(),
            lancedb_dir: default_lancedb_dir(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embed_model: default_embed_model(),
            generate_model: default_generate_model(),
        }
    }
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn data(&self) -> DataSettings {
        self.figment.extract_inner("data").unwrap_or_default()
    }

    pub fn model(&self) -> ModelSettings {
        self.figment.extract_inner("model").unwrap_or_default()
    }

    pub fn chunking(&self) -> ChunkingSettings {
        self.figment.extract_inner("chunking").unwrap_or_default()
    }

    pub fn search(&self) -> SearchSettings {
        self.figment.extract_inner("search").unwrap_or_default()
    }

    fn validate(&self) -> anyhow::Result<()> {
        let chunking = self.chunking();
        if chunking.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be > 0".into()).into());
        }
        if chunking.chunk_overlap >= chunking.chunk_size {
            return Err(Error::InvalidConfig(
                "chunking.chunk_overlap must be smaller than chunking.chunk_size".into(),
            )
            .into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_fall_back_to_defaults() {
        let config = Config {
            figment: Figment::new(),
        };
        let data = config.data();
        assert_eq!(data.pdf_dir, "data/pdf");
        assert_eq!(data.csv_dir, "data/csv");
        assert_eq!(data.lancedb_dir, "data/lancedb");
        let model = config.model();
        assert_eq!(model.base_url, "http://localhost:11434");
        assert_eq!(model.embed_model, "nomic-embed-text");
        let chunking = config.chunking();
        assert_eq!(chunking.chunk_size, 800);
        assert_eq!(chunking.chunk_overlap, 80);
        assert_eq!(config.search().k, 5);
    }

    #[test]
    fn partial_section_keeps_field_defaults() {
        use figment::providers::Serialized;
        let figment =
            Figment::new().merge(Serialized::default("data.pdf_dir", "/srv/docs/pdf"));
        let config = Config { figment };
        let data = config.data();
        assert_eq!(data.pdf_dir, "/srv/docs/pdf");
        assert_eq!(data.csv_dir, "data/csv");
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        use figment::providers::Serialized;
        let figment = Figment::new()
            .merge(Serialized::default("chunking.chunk_size", 100usize))
            .merge(Serialized::default("chunking.chunk_overlap", 100usize));
        let config = Config { figment };
        assert!(config.validate().is_err());
    }

    #[test]
    fn expand_path_handles_plain_paths() {
        assert_eq!(expand_path("data/pdf"), PathBuf::from("data/pdf"));
    }
}
