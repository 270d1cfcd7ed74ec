use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::letter::template::LetterTemplate;
use crate::letter::vocabulary::SkillVocabulary;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read letter config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid letter config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Vocabulary, caps and template driving letter synthesis.
///
/// Every field is optional in the JSON file; omitted fields keep the built-in defaults.
/// ```json
/// { "vocabulary": { "key_skills": { "cap": 4, "groups": [{ "casing": "title", "terms": ["rust"] }] } },
///   "template": "Dear team, ... {{candidate_name}}" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterConfig {
    pub vocabulary: SkillVocabulary,
    pub template: LetterTemplate,
}

impl LetterConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: LetterConfig = serde_json::from_str(json)?;
        Ok(Self {
            vocabulary: config.vocabulary.normalized(),
            template: config.template,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Loaded letter config from {} ({} experience terms, {} key-skill terms)",
            path.display(),
            config.vocabulary.experience.term_count(),
            config.vocabulary.key_skills.term_count()
        );
        Ok(config)
    }

    /// Loads from `path` when given, otherwise returns the built-in configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
