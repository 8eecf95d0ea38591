//! Turning model logits into ranked emotion scores

use crate::model_config::OutputType;
use candle_core::{Tensor, D};
use emotionscope_core::{ClassificationResult, EmotionScore, Result};

impl OutputType {
    /// Convert a `(1, num_labels)` logits tensor into per-label scores
    pub fn probabilities(&self, logits: &Tensor) -> Result<Vec<f32>> {
        let scores = match self {
            Self::SingleLabel => candle_nn::ops::softmax(logits, D::Minus1)
                .map_err(|e| emotionscope_core::Error::classifier(format!("Softmax failed: {}", e)))?,
            Self::MultiLabel => candle_nn::ops::sigmoid(logits)
                .map_err(|e| emotionscope_core::Error::classifier(format!("Sigmoid failed: {}", e)))?,
        };

        scores
            .squeeze(0)
            .map_err(|e| emotionscope_core::Error::classifier(format!("Squeeze failed: {}", e)))?
            .to_vec1()
            .map_err(|e| {
                emotionscope_core::Error::classifier(format!("Failed to convert to vec: {}", e))
            })
    }
}

/// Pair scores with their labels, highest first, keeping at most `top_k`
pub fn rank_scores(
    labels: &[String],
    probabilities: &[f32],
    top_k: Option<usize>,
) -> Result<ClassificationResult> {
    if labels.len() != probabilities.len() {
        return Err(emotionscope_core::Error::classifier(format!(
            "Model produced {} scores for {} labels",
            probabilities.len(),
            labels.len()
        )));
    }

    let scores = labels
        .iter()
        .zip(probabilities)
        .map(|(label, &score)| EmotionScore::new(label.clone(), score))
        .collect();

    let mut result = ClassificationResult::new(scores);
    if let Some(k) = top_k {
        result.scores.truncate(k);
    }
    Ok(result)
}
