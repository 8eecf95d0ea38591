//! Model configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL_REPO: &str = "j-hartmann/emotion-english-distilroberta-base";

/// Configuration for the emotion model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name, used in logs
    #[serde(default = "default_name")]
    pub name: String,

    /// Model source (where to load from)
    #[serde(default)]
    pub source: ModelSource,

    /// Label names by output index. Overrides `id2label` from the
    /// model's `config.json` when non-empty.
    #[serde(default)]
    pub labels: Vec<String>,

    /// HuggingFace Hub cache directory (hf-hub default when unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "emotion-english-distilroberta-base".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            source: ModelSource::default(),
            labels: Vec::new(),
            cache_dir: None,
            inference: InferenceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Configuration for a model hosted on the HuggingFace Hub
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            source: ModelSource::HuggingFace {
                repo: repo.into(),
                revision: default_revision(),
            },
            ..Default::default()
        }
    }

    /// Configuration for a model directory on the local filesystem
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Set device
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.inference.device = device.into();
        self
    }

    /// Set label overrides
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from a local directory
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

fn default_revision() -> String {
    "main".to_string()
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_MODEL_REPO.to_string(),
            revision: default_revision(),
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { path } => write!(f, "{}", path.display()),
            Self::HuggingFace { repo, revision } => write!(f, "hf://{}@{}", repo, revision),
        }
    }
}

/// Inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum sequence length in tokens; longer input is truncated
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}

/// How logits are turned into scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputType {
    /// Softmax across labels; scores sum to 1
    #[default]
    SingleLabel,
    /// Independent sigmoid per label
    MultiLabel,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub output_type: OutputType,

    /// Keep only the best `top_k` labels. Unset returns every label.
    #[serde(default)]
    pub top_k: Option<usize>,
}
