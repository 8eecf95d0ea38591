//! Model artifact resolution and loading
//!
//! A model is a directory (local, or an hf-hub cache snapshot) holding a
//! `config.json`, one weights file and tokenizer files. Everything here runs
//! once at startup; any failure is reported as [`Error::ModelLoad`] and is
//! expected to abort the process.
//!
//! [`Error::ModelLoad`]: emotionscope_core::Error::ModelLoad

use crate::classifier::{Classifier, SharedClassifier};
use crate::model_config::{ModelConfig, ModelSource};
use crate::roberta::RobertaEmotionClassifier;
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use emotionscope_core::Result;
use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::{Tokenizer, TruncationParams};

const CONFIG_FILE: &str = "config.json";
const SAFETENSORS_FILE: &str = "model.safetensors";
const PYTORCH_FILE: &str = "pytorch_model.bin";
const TOKENIZER_FILE: &str = "tokenizer.json";
const VOCAB_FILE: &str = "vocab.json";
const MERGES_FILE: &str = "merges.txt";

/// Load the configured model and return it as a shared classifier
pub fn load_classifier(config: &ModelConfig) -> Result<SharedClassifier> {
    tracing::info!("Loading model '{}' from {}", config.name, config.source);
    let classifier = RobertaEmotionClassifier::load(config)?;
    tracing::info!(
        "Model '{}' ready with {} labels: {:?}",
        config.name,
        classifier.labels().len(),
        classifier.labels()
    );
    Ok(Arc::new(classifier))
}

/// Weights file found for a model
#[derive(Debug, Clone, PartialEq)]
pub enum WeightsFile {
    /// SafeTensors format (memory-mapped, preferred)
    SafeTensors(PathBuf),
    /// PyTorch pickle format
    PyTorch(PathBuf),
}

/// Tokenizer files found for a model
#[derive(Debug, Clone, PartialEq)]
pub enum TokenizerFiles {
    /// Serialized `tokenizers` pipeline
    Json(PathBuf),
    /// Byte-level BPE vocabulary and merges (RoBERTa style)
    Bpe { vocab: PathBuf, merges: PathBuf },
}

/// Resolved on-disk locations of every artifact a model needs
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub weights: WeightsFile,
    pub tokenizer: TokenizerFiles,
}

impl ModelFiles {
    /// Resolve artifacts for the configured source, downloading if needed
    pub fn resolve(config: &ModelConfig) -> Result<Self> {
        match &config.source {
            ModelSource::Local { path } => Self::from_dir(path),
            ModelSource::HuggingFace { repo, revision } => {
                Self::from_hub(repo, revision, config.cache_dir.as_deref())
            }
        }
    }

    /// Locate artifacts in a local model directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(emotionscope_core::Error::model_load(format!(
                "Model path does not exist or is not a directory: {}",
                dir.display()
            )));
        }

        let existing = |name: &str| Some(dir.join(name)).filter(|p| p.is_file());

        let config = existing(CONFIG_FILE).ok_or_else(|| {
            emotionscope_core::Error::model_load(format!(
                "{} not found in {}",
                CONFIG_FILE,
                dir.display()
            ))
        })?;

        let weights = existing(SAFETENSORS_FILE)
            .map(WeightsFile::SafeTensors)
            .or_else(|| existing(PYTORCH_FILE).map(WeightsFile::PyTorch))
            .ok_or_else(|| {
                emotionscope_core::Error::model_load(format!(
                    "No model weights found in {} (tried {}, {})",
                    dir.display(),
                    SAFETENSORS_FILE,
                    PYTORCH_FILE
                ))
            })?;

        let tokenizer = match existing(TOKENIZER_FILE) {
            Some(path) => TokenizerFiles::Json(path),
            None => match (existing(VOCAB_FILE), existing(MERGES_FILE)) {
                (Some(vocab), Some(merges)) => TokenizerFiles::Bpe { vocab, merges },
                _ => {
                    return Err(emotionscope_core::Error::model_load(format!(
                        "No tokenizer found in {} (tried {}, {} + {})",
                        dir.display(),
                        TOKENIZER_FILE,
                        VOCAB_FILE,
                        MERGES_FILE
                    )))
                }
            },
        };

        Ok(Self {
            config,
            weights,
            tokenizer,
        })
    }

    /// Download artifacts from the HuggingFace Hub into the hf-hub cache
    fn from_hub(repo: &str, revision: &str, cache_dir: Option<&Path>) -> Result<Self> {
        tracing::info!("Fetching model from HuggingFace: {} @ {}", repo, revision);

        let mut builder = ApiBuilder::new();
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir.to_path_buf());
        }
        let api = builder.build().map_err(|e| {
            emotionscope_core::Error::model_load(format!(
                "Failed to initialize HuggingFace API: {}",
                e
            ))
        })?;

        let repo_obj = api.repo(Repo::with_revision(
            repo.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config = repo_obj.get(CONFIG_FILE).map_err(|e| {
            emotionscope_core::Error::model_load(format!(
                "Failed to download {} from {}: {}",
                CONFIG_FILE, repo, e
            ))
        })?;

        let weights = fetch_optional(&repo_obj, SAFETENSORS_FILE)
            .map(WeightsFile::SafeTensors)
            .or_else(|| fetch_optional(&repo_obj, PYTORCH_FILE).map(WeightsFile::PyTorch))
            .ok_or_else(|| {
                emotionscope_core::Error::model_load(format!(
                    "No model weights found in {} (tried {}, {})",
                    repo, SAFETENSORS_FILE, PYTORCH_FILE
                ))
            })?;

        let tokenizer = match fetch_optional(&repo_obj, TOKENIZER_FILE) {
            Some(path) => TokenizerFiles::Json(path),
            None => match (
                fetch_optional(&repo_obj, VOCAB_FILE),
                fetch_optional(&repo_obj, MERGES_FILE),
            ) {
                (Some(vocab), Some(merges)) => TokenizerFiles::Bpe { vocab, merges },
                _ => {
                    return Err(emotionscope_core::Error::model_load(format!(
                        "No tokenizer found in {} (tried {}, {} + {})",
                        repo, TOKENIZER_FILE, VOCAB_FILE, MERGES_FILE
                    )))
                }
            },
        };

        tracing::info!(
            "Model files available under {}",
            config.parent().unwrap_or(Path::new(".")).display()
        );

        Ok(Self {
            config,
            weights,
            tokenizer,
        })
    }
}

fn fetch_optional(repo: &ApiRepo, filename: &str) -> Option<PathBuf> {
    match repo.get(filename) {
        Ok(path) => {
            tracing::debug!("Found {}", filename);
            Some(path)
        }
        Err(e) => {
            tracing::debug!("{} not available: {}", filename, e);
            None
        }
    }
}

/// Read a model's `config.json`
pub fn read_model_config(path: &Path) -> Result<serde_json::Value> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        emotionscope_core::Error::model_load(format!(
            "Failed to read config {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        emotionscope_core::Error::model_load(format!(
            "Failed to parse config {}: {}",
            path.display(),
            e
        ))
    })
}

/// Label names by output index
///
/// Configured labels win; gaps are filled from the model's `id2label`, then
/// with `LABEL_<i>`.
pub fn resolve_labels(model_config: &serde_json::Value, overrides: &[String]) -> Result<Vec<String>> {
    let id2label: BTreeMap<usize, String> = model_config
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(idx, label)| {
                    Some((idx.parse::<usize>().ok()?, label.as_str()?.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let from_model = id2label.keys().next_back().map_or(0, |max| max + 1);
    let num_labels = overrides.len().max(from_model);

    if num_labels == 0 {
        return Err(emotionscope_core::Error::model_load(
            "Model config has no id2label and no labels are configured",
        ));
    }

    Ok((0..num_labels)
        .map(|idx| {
            overrides
                .get(idx)
                .or_else(|| id2label.get(&idx))
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{}", idx))
        })
        .collect())
}

/// Load a tokenizer, truncating encodings to `max_length` tokens
pub fn load_tokenizer(files: &TokenizerFiles, max_length: usize) -> Result<Tokenizer> {
    let mut tokenizer = match files {
        TokenizerFiles::Json(path) => {
            tracing::debug!("Loading tokenizer from {}", path.display());
            Tokenizer::from_file(path).map_err(|e| {
                emotionscope_core::Error::model_load(format!("Failed to load tokenizer.json: {}", e))
            })?
        }
        TokenizerFiles::Bpe { vocab, merges } => {
            tracing::debug!("Building byte-level BPE tokenizer from vocab.json and merges.txt");
            build_bpe_tokenizer(vocab, merges)?
        }
    };

    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| {
            emotionscope_core::Error::model_load(format!("Failed to configure truncation: {}", e))
        })?;

    Ok(tokenizer)
}

fn build_bpe_tokenizer(vocab: &Path, merges: &Path) -> Result<Tokenizer> {
    use tokenizers::models::bpe::BPE;
    use tokenizers::pre_tokenizers::byte_level::ByteLevel;
    use tokenizers::processors::roberta::RobertaProcessing;

    let bpe = BPE::from_file(
        vocab.to_string_lossy().as_ref(),
        merges.to_string_lossy().as_ref(),
    )
    .build()
    .map_err(|e| emotionscope_core::Error::model_load(format!("Failed to build BPE model: {}", e)))?;

    let mut tokenizer = Tokenizer::new(bpe);
    tokenizer.with_pre_tokenizer(Some(ByteLevel::new(false, true, true)));
    tokenizer.with_decoder(Some(ByteLevel::default()));

    let sep = ("</s>".to_string(), 2);
    let cls = ("<s>".to_string(), 0);
    tokenizer.with_post_processor(Some(
        RobertaProcessing::new(sep, cls)
            .trim_offsets(true)
            .add_prefix_space(false),
    ));

    Ok(tokenizer)
}

/// Map a configured device name to a Candle device
pub fn get_device(device: &str) -> Result<Device> {
    match device.to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" | "cuda:0" => Device::new_cuda(0).map_err(|e| {
            emotionscope_core::Error::model_load(format!("Failed to initialize CUDA: {}", e))
        }),
        "mps" | "metal" => Device::new_metal(0).map_err(|e| {
            emotionscope_core::Error::model_load(format!("Failed to initialize Metal: {}", e))
        }),
        other => Err(emotionscope_core::Error::config(format!(
            "Unknown device '{}' (expected cpu, cuda or metal)",
            other
        ))),
    }
}

/// Open model weights as a VarBuilder
pub fn load_var_builder(weights: &WeightsFile, device: &Device) -> Result<VarBuilder<'static>> {
    match weights {
        WeightsFile::SafeTensors(path) => {
            // SAFETY: the file is memory-mapped read-only and not modified while loaded
            unsafe {
                VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device).map_err(|e| {
                    emotionscope_core::Error::model_load(format!(
                        "Failed to load SafeTensors weights: {}",
                        e
                    ))
                })
            }
        }
        WeightsFile::PyTorch(path) => VarBuilder::from_pth(path, DType::F32, device).map_err(|e| {
            emotionscope_core::Error::model_load(format!("Failed to load PyTorch weights: {}", e))
        }),
    }
}
