//! Mock classifiers for testing
//!
//! Stand-ins for the pretrained model so the HTTP layer can be exercised
//! without downloading weights.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use emotionscope_classifiers::Classifier;
use emotionscope_core::{ClassificationResult, EmotionScore, Result};
use std::sync::atomic::{AtomicU32, Ordering};

pub const LABELS: [&str; 7] = [
    "anger", "disgust", "fear", "joy", "neutral", "sadness", "surprise",
];

/// Keyword-driven classifier with the same label set as the real model
pub struct MockEmotionClassifier {
    labels: Vec<String>,
    call_count: AtomicU32,
}

impl MockEmotionClassifier {
    pub fn new() -> Self {
        Self {
            labels: LABELS.iter().map(|s| s.to_string()).collect(),
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of times classify was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let lower = text.to_lowercase();
        let dominant = if lower.contains("happy") {
            "joy"
        } else if lower.contains("angry") {
            "anger"
        } else if lower.contains("sad") {
            "sadness"
        } else {
            "neutral"
        };

        // Spread the remainder by text length so scores vary between inputs
        let spread = (text.len() % 5) as f32 * 0.01;
        let scores = self
            .labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let score = if label == dominant {
                    0.82 - spread
                } else {
                    0.03 + if idx == 0 { spread } else { 0.0 }
                };
                EmotionScore::new(label.clone(), score)
            })
            .collect();

        Ok(ClassificationResult::new(scores).with_latency_us(100))
    }

    fn name(&self) -> &str {
        "mock-emotion"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// A classifier that always fails - for testing error paths
pub struct FailingClassifier {
    labels: Vec<String>,
}

impl FailingClassifier {
    pub fn new() -> Self {
        Self {
            labels: LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        Err(emotionscope_core::Error::classifier(
            "Model forward pass failed: out of memory",
        ))
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

pub fn post_analyze(body: impl Into<Body>, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/analyze_emotion");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body.into()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
