//! EmotionScope Core
//!
//! Core types and utilities shared across EmotionScope components.
//!
//! This crate provides:
//! - The request and result types exchanged over the HTTP API
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationRequest, ClassificationResult, EmotionScore};
