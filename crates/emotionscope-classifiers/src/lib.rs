//! EmotionScope Classifiers
//!
//! Emotion classifiers backed by pretrained transformer models.
//!
//! A classifier is built once at startup from a [`ModelConfig`]: the model
//! artifacts are resolved (local directory or HuggingFace Hub), the tokenizer
//! and weights are loaded with Candle, and the result is handed out as a
//! shared, read-only [`Classifier`]. Every call scores all labels the model
//! knows about.

pub mod classifier;
pub mod model_config;
pub mod model_loader;
pub mod roberta;
pub mod scoring;

pub use classifier::{Classifier, SharedClassifier};
pub use model_config::{InferenceConfig, ModelConfig, ModelSource, OutputConfig, OutputType};
pub use model_loader::{load_classifier, ModelFiles, TokenizerFiles, WeightsFile};
pub use roberta::RobertaEmotionClassifier;
