//! RoBERTa sequence classifier for emotion detection
//!
//! Runs `RobertaForSequenceClassification` checkpoints (such as
//! `j-hartmann/emotion-english-distilroberta-base`) through Candle's
//! XLM-RoBERTa implementation, which uses the same `roberta.*` backbone and
//! `classifier.{dense,out_proj}` head layout.

use crate::classifier::Classifier;
use crate::model_config::{ModelConfig, OutputType};
use crate::model_loader::{
    get_device, load_tokenizer, load_var_builder, read_model_config, resolve_labels, ModelFiles,
};
use crate::scoring::rank_scores;
use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
use emotionscope_core::{ClassificationResult, Result};
use serde_json::{json, Value};
use std::time::Instant;
use tokenizers::Tokenizer;

pub struct RobertaEmotionClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
    labels: Vec<String>,
    output_type: OutputType,
    top_k: Option<usize>,
}

impl RobertaEmotionClassifier {
    /// Resolve, download if needed, and load the configured model
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let files = ModelFiles::resolve(config)?;

        let raw_config = read_model_config(&files.config)?;
        let labels = resolve_labels(&raw_config, &config.labels)?;
        let roberta_config = parse_roberta_config(&raw_config)?;
        check_max_length(config.inference.max_length, &roberta_config)?;

        let tokenizer = load_tokenizer(&files.tokenizer, config.inference.max_length)?;
        let device = get_device(&config.inference.device)?;
        let vb = load_var_builder(&files.weights, &device)?;
        let model = load_sequence_model(&vb, labels.len(), &roberta_config)?;

        Ok(Self {
            name: config.name.clone(),
            tokenizer,
            model,
            device,
            labels,
            output_type: config.output.output_type,
            top_k: config.output.top_k,
        })
    }

    fn logits(&self, text: &str) -> Result<Tensor> {
        let encoding = self.tokenizer.encode(text, true).map_err(|e| {
            emotionscope_core::Error::classifier(format!("Tokenization failed: {}", e))
        })?;

        let input_ids = batch_of_one(encoding.get_ids(), &self.device, "input ids")?;
        let attention_mask =
            batch_of_one(encoding.get_attention_mask(), &self.device, "attention mask")?;
        let token_type_ids = batch_of_one(encoding.get_type_ids(), &self.device, "token type ids")?;

        self.model
            .forward(&input_ids, &attention_mask, &token_type_ids)
            .map_err(|e| {
                emotionscope_core::Error::classifier(format!("Model forward pass failed: {}", e))
            })
    }
}

#[async_trait]
impl Classifier for RobertaEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let logits = self.logits(text)?;
        let probabilities = self.output_type.probabilities(&logits)?;
        let result = rank_scores(&self.labels, &probabilities, self.top_k)?
            .with_latency_us(start.elapsed().as_micros() as u64);

        tracing::debug!(
            top = ?result.top(),
            latency_us = result.latency_us,
            "classified {} chars",
            text.len()
        );
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

fn batch_of_one(values: &[u32], device: &Device, what: &str) -> Result<Tensor> {
    Tensor::new(values, device)
        .map_err(|e| {
            emotionscope_core::Error::classifier(format!("Failed to create {} tensor: {}", what, e))
        })?
        .unsqueeze(0)
        .map_err(|e| {
            emotionscope_core::Error::classifier(format!("Failed to unsqueeze {}: {}", what, e))
        })
}

/// Parse a RoBERTa `config.json`, filling keys older exports omit
pub(crate) fn parse_roberta_config(raw: &Value) -> Result<RobertaConfig> {
    let mut value = raw.clone();
    let object = value.as_object_mut().ok_or_else(|| {
        emotionscope_core::Error::model_load("Model config.json is not a JSON object")
    })?;

    for (key, default) in [
        ("position_embedding_type", json!("absolute")),
        ("layer_norm_eps", json!(1e-5)),
        ("attention_probs_dropout_prob", json!(0.1)),
        ("hidden_dropout_prob", json!(0.1)),
        ("hidden_act", json!("gelu")),
        ("type_vocab_size", json!(1)),
        ("pad_token_id", json!(1)),
    ] {
        object.entry(key).or_insert(default);
    }

    serde_json::from_value(value).map_err(|e| {
        emotionscope_core::Error::model_load(format!("Unsupported RoBERTa config: {}", e))
    })
}

/// Longest token sequence the position embeddings can index
///
/// RoBERTa positions start after `pad_token_id`, so a 514-entry table with
/// pad id 1 covers 512 tokens.
fn max_supported_length(config: &RobertaConfig) -> usize {
    config
        .max_position_embeddings
        .saturating_sub(config.pad_token_id as usize + 1)
}

fn check_max_length(max_length: usize, config: &RobertaConfig) -> Result<()> {
    let supported = max_supported_length(config);
    if max_length == 0 || max_length > supported {
        return Err(emotionscope_core::Error::model_load(format!(
            "max_length {} is outside what the model supports (1..={})",
            max_length, supported
        )));
    }
    Ok(())
}

fn load_sequence_model(
    vb: &VarBuilder,
    num_labels: usize,
    config: &RobertaConfig,
) -> Result<XLMRobertaForSequenceClassification> {
    let mut errors = Vec::new();

    for prefix in ["", "model"] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };
        let effective_prefix = if prefix.is_empty() { "<root>" } else { prefix };

        match XLMRobertaForSequenceClassification::new(num_labels, config, vb_prefix) {
            Ok(model) => {
                tracing::info!("Loaded RoBERTa weights from '{}'", effective_prefix);
                return Ok(model);
            }
            Err(e) => errors.push(format!("{}: {}", effective_prefix, e)),
        }
    }

    Err(emotionscope_core::Error::model_load(format!(
        "Failed to load RoBERTa sequence model with tried prefixes [{}]",
        errors.join(" | ")
    )))
}
