use std::path::PathBuf;

use anyhow::{Context, Result};

/// Service configuration loaded from environment variables (and `.env` when present).
/// Nothing is required; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON letter configuration (vocabulary, caps, template). Built-in defaults when unset.
    pub letter_config_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            letter_config_path: optional_env("COVERLETTER_CONFIG").map(PathBuf::from),
            output_dir: optional_env("COVERLETTER_OUTPUT_DIR")
                .map_or_else(|| PathBuf::from("output"), PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            letter_config_path: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
