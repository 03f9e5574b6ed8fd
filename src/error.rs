/// Error types for the classification pipeline and settings loading
///
/// Every failure that used to be fatal is a variant here instead, so the
/// screen can show it and carry on with the previous photo.

use std::path::PathBuf;
use thiserror::Error;

/// Why analyzing a photo failed
///
/// Variants carry plain strings so the error can be cloned into an
/// iced `Message`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The picked file could not be decoded or turned into a model input
    #[error("could not read image {path}: {reason}")]
    ImageConversion { path: PathBuf, reason: String },

    /// The model or its label vocabulary could not be loaded
    #[error("could not load classifier: {0}")]
    ModelConstruction(String),

    /// The model ran but its output is not a classification we understand
    #[error("unexpected classifier output: {0}")]
    UnexpectedOutput(String),

    /// The background worker died before returning
    #[error("background task failed: {0}")]
    Task(String),
}

/// Why the settings file could not be used
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_conversion_message_names_file() {
        let err = AnalysisError::ImageConversion {
            path: PathBuf::from("/tmp/lunch.jpg"),
            reason: "unsupported format".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/lunch.jpg"));
        assert!(message.contains("unsupported format"));
    }
}
