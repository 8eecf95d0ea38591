//! Application state shared across requests

use emotionscope_classifiers::SharedClassifier;

/// Application state shared across all requests
///
/// The classifier is loaded once before the listener starts and is only ever
/// read afterwards, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub classifier: SharedClassifier,
}

impl AppState {
    pub fn new(classifier: SharedClassifier) -> Self {
        Self { classifier }
    }
}
