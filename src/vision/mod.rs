/// Image classification module
///
/// This module handles:
/// - Decoding a picked photo and converting it to a model input (adapter.rs)
/// - Loading the label vocabulary that goes with the model (labels.rs)
/// - Running the ONNX model and ranking its output (classifier.rs)

pub mod adapter;
pub mod classifier;
pub mod labels;

pub use adapter::InputSpec;
pub use classifier::{Classifier, TractClassifier};

/// One (label, confidence) pair returned by a classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Human-readable class name, e.g. "hotdog, hot dog, red hot"
    pub label: String,
    /// Probability in 0.0..=1.0
    pub confidence: f32,
}

impl Observation {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}
