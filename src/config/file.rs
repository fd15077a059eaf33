use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::{default_match_count, default_match_threshold};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub default_model: Option<String>,
    /// Replaces the built-in assistant persona.
    #[serde(default)]
    pub persona: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default = "default_match_count")]
    pub match_count: usize,
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    #[serde(default)]
    pub qa_table: Option<String>,
    #[serde(default)]
    pub documents_table: Option<String>,
    #[serde(default)]
    pub match_function: Option<String>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            embedding_model: None,
            match_count: default_match_count(),
            match_threshold: default_match_threshold(),
            qa_table: None,
            documents_table: None,
            match_function: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Non-secret settings read from an optional YAML (or JSON) file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl FileConfig {
    /// First existing file wins; an explicit path is tried before the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut paths = Vec::new();
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            paths.push(path.to_path_buf());
        }
        paths.extend(Self::get_config_paths());
        Self::load_first(&paths)
    }

    pub fn load_first(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        Ok(FileConfig::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("json") {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".tuitionbot.yaml"),
            PathBuf::from(".tuitionbot.yml"),
            PathBuf::from(".tuitionbot.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("tuitionbot");
            paths.push(dir.join("tuitionbot.yaml"));
            paths.push(dir.join("tuitionbot.yml"));
            paths.push(dir.join("tuitionbot.json"));
        }

        paths
    }
}
