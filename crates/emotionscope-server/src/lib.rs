//! EmotionScope Server
//!
//! HTTP front end for the emotion classifier: a single
//! `POST /analyze_emotion` route backed by a model loaded once at startup,
//! plus a small client used by the `analyze` command.

pub mod cli;
pub mod client;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use client::EmotionClient;
pub use config::ServiceConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
