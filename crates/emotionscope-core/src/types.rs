//! Core types for EmotionScope

use serde::{Deserialize, Serialize};

/// Body of a `POST /analyze_emotion` request
///
/// `text` is optional on the wire so that a missing key and an empty string
/// can both be reported as the same client error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl ClassificationRequest {
    /// Create a request for the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// The text to classify, if present and non-empty
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// A single emotion label paired with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    /// Emotion label as named by the model (e.g. `joy`)
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl EmotionScore {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Scores for every label the model supports, highest first
#[derive(Debug, Clone, Default)]
pub struct ClassificationResult {
    /// Per-label scores in descending score order
    pub scores: Vec<EmotionScore>,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a result from scores, sorting them highest first
    ///
    /// The sort is stable, so equal scores keep the order they were given in.
    pub fn new(mut scores: Vec<EmotionScore>) -> Self {
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self {
            scores,
            latency_us: 0,
        }
    }

    /// Attach the measured inference latency
    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }

    /// The highest scoring emotion
    pub fn top(&self) -> Option<&EmotionScore> {
        self.scores.first()
    }

    /// Look up the score for a label
    pub fn score_for(&self, label: &str) -> Option<f32> {
        self.scores
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.score)
    }

    /// Labels present in this result, in result order
    pub fn labels(&self) -> Vec<&str> {
        self.scores.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
