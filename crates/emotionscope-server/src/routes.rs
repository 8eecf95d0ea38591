//! HTTP routes and handlers

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use emotionscope_core::{ClassificationRequest, EmotionScore};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/analyze_emotion", post(analyze_emotion))
        .fallback(fallback)
        // Text length is unbounded; the tokenizer truncates what the model can't take
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Score the request text against every emotion label
///
/// The body is parsed as JSON whatever the declared content type.
async fn analyze_emotion(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<EmotionScore>>, AppError> {
    let outcome = classify_body(&state, &body).await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status(),
    };
    metrics::counter!("emotionscope_requests_total", "status" => status.as_u16().to_string())
        .increment(1);

    outcome.map(Json)
}

async fn classify_body(state: &AppState, body: &[u8]) -> Result<Vec<EmotionScore>, AppError> {
    let request = parse_request(body)?;
    let text = request.text().ok_or(AppError::NoText)?;
    debug!("Classifying {} chars", text.len());

    let result = state.classifier.classify(text).await.map_err(|e| {
        error!("Classification failed: {}", e);
        AppError::Classification(e)
    })?;

    metrics::histogram!("emotionscope_inference_latency_us").record(result.latency_us as f64);
    Ok(result.scores)
}

fn parse_request(body: &[u8]) -> Result<ClassificationRequest, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(AppError::InvalidBody("expected a JSON object".to_string()));
    }
    Ok(serde_json::from_value(value)?)
}

async fn fallback() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    /// `text` missing, null or empty
    NoText,
    /// Body is not a JSON object with a string `text`
    InvalidBody(String),
    /// The model failed; details are logged, not returned
    Classification(emotionscope_core::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoText | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Classification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidBody(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NoText => "No text provided".to_string(),
            AppError::InvalidBody(msg) => format!("Invalid JSON body: {}", msg),
            AppError::Classification(_) => "Internal server error".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
