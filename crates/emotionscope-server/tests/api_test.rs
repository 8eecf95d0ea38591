//! Integration tests for the /analyze_emotion endpoint

mod common;

use axum::http::{Request, StatusCode};
use axum::body::Body;
use common::{json_body, post_analyze, FailingClassifier, MockEmotionClassifier, LABELS};
use emotionscope_server::{create_router, AppState};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with_mock() -> (axum::Router, Arc<MockEmotionClassifier>) {
    let classifier = Arc::new(MockEmotionClassifier::new());
    let app = create_router(AppState::new(classifier.clone()));
    (app, classifier)
}

fn label_set(body: &serde_json::Value) -> BTreeSet<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["label"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_happy_text_returns_every_label_with_joy_first() {
    let (app, classifier) = app_with_mock();

    let response = app
        .oneshot(post_analyze(
            json!({"text": "I am so happy today!"}).to_string(),
            Some("application/json"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let entries = body.as_array().unwrap();

    assert_eq!(entries.len(), LABELS.len());
    assert_eq!(label_set(&body), LABELS.iter().map(|s| s.to_string()).collect());
    assert_eq!(entries[0]["label"], "joy");
    for entry in entries {
        let score = entry["score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
        assert!(entry.as_object().unwrap().len() == 2, "only label and score are exposed");
    }
    assert_eq!(classifier.call_count(), 1);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let (app, classifier) = app_with_mock();

    let response = app
        .oneshot(post_analyze(json!({"text": ""}).to_string(), Some("application/json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "No text provided"}));
    assert_eq!(classifier.call_count(), 0);
}

#[tokio::test]
async fn test_missing_or_null_text_is_rejected() {
    for body in ["{}", r#"{"text": null}"#, r#"{"content": "I am happy"}"#] {
        let (app, classifier) = app_with_mock();

        let response = app
            .oneshot(post_analyze(body, Some("application/json")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(json_body(response).await, json!({"error": "No text provided"}));
        assert_eq!(classifier.call_count(), 0);
    }
}

#[tokio::test]
async fn test_malformed_body_is_not_success_or_validation_error() {
    for body in [
        "this is not json",
        "",
        "[1, 2, 3]",
        r#"{"text": 42}"#,
        r#"{"text": 0}"#,
        r#"{"text": false}"#,
        r#"{"text": []}"#,
    ] {
        let (app, classifier) = app_with_mock();

        let response = app
            .oneshot(post_analyze(body, Some("application/json")))
            .await
            .unwrap();

        assert_ne!(response.status(), StatusCode::OK, "body {:?}", body);
        let error = json_body(response).await;
        assert_ne!(error, json!({"error": "No text provided"}));
        assert!(error["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body"));
        assert_eq!(classifier.call_count(), 0);
    }
}

#[tokio::test]
async fn test_multi_megabyte_text_reaches_classifier() {
    let (app, classifier) = app_with_mock();
    let text = "I am so happy ".repeat(250_000);
    let body = json!({ "text": text }).to_string();
    assert!(body.len() > 3_000_000);

    let response = app
        .oneshot(post_analyze(body, Some("application/json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), LABELS.len());
    assert_eq!(body[0]["label"], "joy");
    assert_eq!(classifier.call_count(), 1);
}

#[tokio::test]
async fn test_body_parsed_without_json_content_type() {
    for content_type in [None, Some("text/plain"), Some("application/x-www-form-urlencoded")] {
        let (app, _) = app_with_mock();

        let response = app
            .oneshot(post_analyze(
                json!({"text": "I am so angry"}).to_string(),
                content_type,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "content type {:?}", content_type);
        let body = json_body(response).await;
        assert_eq!(body[0]["label"], "anger");
    }
}

#[tokio::test]
async fn test_label_set_stable_across_inputs() {
    let (app, _) = app_with_mock();
    let mut seen = Vec::new();

    for text in ["I am so happy", "I am so angry", "so sad", "The meeting is at noon."] {
        let response = app
            .clone()
            .oneshot(post_analyze(json!({"text": text}).to_string(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        seen.push(label_set(&json_body(response).await));
    }

    assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn test_identical_input_is_idempotent() {
    let (app, classifier) = app_with_mock();
    let request = || post_analyze(json!({"text": "What a day"}).to_string(), None);

    let first = json_body(app.clone().oneshot(request()).await.unwrap()).await;
    let second = json_body(app.oneshot(request()).await.unwrap()).await;

    assert_eq!(first, second);
    assert_eq!(classifier.call_count(), 2);
}

#[tokio::test]
async fn test_classifier_failure_is_opaque_server_error() {
    let app = create_router(AppState::new(Arc::new(FailingClassifier::new())));

    let response = app
        .oneshot(post_analyze(json!({"text": "hello"}).to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let (app, _) = app_with_mock();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .body(Body::from(r#"{"text": "hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({"error": "Not found"}));

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/analyze_emotion")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_classifier() {
    let (app, classifier) = app_with_mock();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(post_analyze(
                    json!({"text": format!("request number {}", i)}).to_string(),
                    None,
                ))
                .await
                .unwrap()
                .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(classifier.call_count(), 16);
}
