//! docspeech configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PREVIEW_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocspeechConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    /// Characters of extracted text kept in the response preview
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,
}

fn default_max_chunk_length() -> usize {
    doc_text::DEFAULT_MAX_LENGTH
}

fn default_preview_length() -> usize {
    DEFAULT_PREVIEW_LENGTH
}

impl Default for DocspeechConfig {
    fn default() -> Self {
        Self {
            max_chunk_length: default_max_chunk_length(),
            preview_length: default_preview_length(),
        }
    }
}

impl DocspeechConfig {
    /// Get the config file path: ~/.config/docspeech/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docspeech")
            .join("config.toml")
    }

    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, returning defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: DocspeechConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.max_chunk_length == 0 {
            anyhow::bail!("max_chunk_length must be a positive integer");
        }
        if self.preview_length == 0 {
            anyhow::bail!("preview_length must be a positive integer");
        }
        Ok(())
    }
}
