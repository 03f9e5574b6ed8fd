/// Classification trigger
///
/// Runs one picked photo through the whole pipeline:
/// image adapter → classifier → top-1 "hotdog" test.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::task;

use crate::config::ModelSettings;
use crate::error::AnalysisError;
use crate::verdict::{self, Verdict};
use crate::vision::{adapter, Classifier, Observation, TractClassifier};

/// Result of analyzing one photo
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// The photo that was analyzed
    pub photo: PathBuf,
    /// Observations ranked by descending confidence
    pub observations: Vec<Observation>,
    /// `None` when the classifier returned nothing
    pub verdict: Option<Verdict>,
}

/// Analyze a photo on the current thread
pub fn analyze(photo: PathBuf, classifier: &dyn Classifier) -> Result<Analysis, AnalysisError> {
    let started = Instant::now();

    let input = adapter::prepare(&photo, classifier.input_spec())?;
    let observations = classifier.classify(input)?;
    let verdict = verdict::judge(&observations);

    match observations.first() {
        Some(top) => log::info!(
            "🌭 {} → {} ({:.2}) in {:?}",
            photo.display(),
            top.label,
            top.confidence,
            started.elapsed()
        ),
        None => log::warn!("⚠️  {} → no observations", photo.display()),
    }

    Ok(Analysis {
        photo,
        observations,
        verdict,
    })
}

/// Analyze a photo on a blocking worker
///
/// Decoding and inference are CPU-bound, so they stay off the UI thread.
pub async fn analyze_async(
    photo: PathBuf,
    classifier: Arc<dyn Classifier>,
) -> Result<Analysis, AnalysisError> {
    task::spawn_blocking(move || analyze(photo, classifier.as_ref()))
        .await
        .map_err(|e| AnalysisError::Task(format!("Task join error: {}", e)))?
}

/// Load the ONNX classifier on a blocking worker
pub async fn load_classifier(
    settings: ModelSettings,
) -> Result<Arc<dyn Classifier>, AnalysisError> {
    task::spawn_blocking(move || {
        TractClassifier::load(&settings).map(|c| Arc::new(c) as Arc<dyn Classifier>)
    })
    .await
    .map_err(|e| AnalysisError::Task(format!("Task join error: {}", e)))?
}
