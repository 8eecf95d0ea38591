//! Client for a running EmotionScope server

use emotionscope_core::{ClassificationRequest, EmotionScore};
use serde::Deserialize;
use std::fmt::Write;

/// Sentences analyzed when the `analyze` command is given no text
pub const SAMPLE_TEXTS: [&str; 4] = [
    "I'm so happy and excited about my new project!",
    "Feeling a little down and sad today.",
    "I can't believe this happened. I'm so angry!",
    "This is a very surprising development.",
];

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to send request: {0}. Make sure the server is running")]
    Request(#[from] reqwest::Error),

    #[error("server request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Servers built on older pipelines wrap single-text results in an outer array
#[derive(Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Flat(Vec<EmotionScore>),
    Nested(Vec<Vec<EmotionScore>>),
}

pub struct EmotionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl EmotionClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/analyze_emotion", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one text and return its emotion scores
    pub async fn analyze(&self, text: &str) -> Result<Vec<EmotionScore>, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ClassificationRequest::new(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_scores(&body)
    }
}

/// Parse a 200 response body in either the flat or the nested shape
pub fn parse_scores(body: &str) -> Result<Vec<EmotionScore>, ClientError> {
    Ok(match serde_json::from_str(body)? {
        AnalyzeResponse::Flat(scores) => scores,
        AnalyzeResponse::Nested(mut batches) => {
            if batches.is_empty() {
                Vec::new()
            } else {
                batches.swap_remove(0)
            }
        }
    })
}

/// Human readable report for one text
pub fn format_report(text: &str, scores: &[EmotionScore]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Text: '{}'", text);
    let _ = writeln!(out, "Detected Emotions:");
    for emotion in scores {
        let _ = writeln!(out, "  - {} ({:.2}%)", emotion.label, emotion.score * 100.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        assert_eq!(
            EmotionClient::new("http://127.0.0.1:5000/").endpoint(),
            "http://127.0.0.1:5000/analyze_emotion"
        );
        assert_eq!(
            EmotionClient::new("http://localhost:8080").endpoint(),
            "http://localhost:8080/analyze_emotion"
        );
    }

    #[test]
    fn test_parse_flat_response() {
        let scores =
            parse_scores(r#"[{"label": "joy", "score": 0.9}, {"label": "anger", "score": 0.1}]"#)
                .unwrap();
        assert_eq!(
            scores,
            vec![EmotionScore::new("joy", 0.9), EmotionScore::new("anger", 0.1)]
        );
    }

    #[test]
    fn test_parse_nested_response() {
        let scores = parse_scores(r#"[[{"label": "fear", "score": 0.75}]]"#).unwrap();
        assert_eq!(scores, vec![EmotionScore::new("fear", 0.75)]);
    }

    #[test]
    fn test_parse_rejects_error_body() {
        assert!(matches!(
            parse_scores(r#"{"error": "No text provided"}"#),
            Err(ClientError::Parse(_))
        ));
    }

    #[test]
    fn test_format_report() {
        let report = format_report(
            "I won!",
            &[EmotionScore::new("joy", 0.9712), EmotionScore::new("surprise", 0.0288)],
        );
        assert_eq!(
            report,
            "Text: 'I won!'\nDetected Emotions:\n  - joy (97.12%)\n  - surprise (2.88%)\n"
        );
    }
}
