//! Classifier trait

use async_trait::async_trait;
use emotionscope_core::{ClassificationResult, Result};
use std::sync::Arc;

/// Trait for all emotion classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Score `text` against every label the classifier supports.
    ///
    /// Callers are expected to reject empty text before calling.
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Labels this classifier scores, in model output order
    fn labels(&self) -> &[String];
}

/// A classifier loaded once and shared across request handlers
pub type SharedClassifier = Arc<dyn Classifier>;
