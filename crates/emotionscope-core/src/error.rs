//! Error types for EmotionScope

/// Result type alias using EmotionScope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for EmotionScope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Classifier execution errors (tokenization, tensor ops, forward pass)
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Model artifact resolution and loading errors
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
