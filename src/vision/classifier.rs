/// ONNX image classifier
///
/// Wraps a pre-trained ImageNet model (Inception v3, MobileNet, ...) run by
/// tract. The model is loaded and optimized once, then shared read-only by
/// every classification request.

use std::fmt;

use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::*;

use super::adapter::InputSpec;
use super::labels::Labels;
use super::Observation;
use crate::config::ModelSettings;
use crate::error::AnalysisError;

/// Anything that maps a model input to a ranked list of observations
///
/// Implementations return observations sorted by descending confidence.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Input layout this classifier expects
    fn input_spec(&self) -> &InputSpec;

    /// Run the model on a single prepared image
    fn classify(&self, input: Array4<f32>) -> Result<Vec<Observation>, AnalysisError>;
}

/// Classifier backed by an optimized tract plan
pub struct TractClassifier {
    plan: TypedRunnableModel<TypedModel>,
    labels: Labels,
    spec: InputSpec,
}

impl TractClassifier {
    /// Load the ONNX model and its labels
    ///
    /// The input fact is pinned to `(1, 3, size, size)` so tract can
    /// optimize the whole graph up front.
    pub fn load(settings: &ModelSettings) -> Result<Self, AnalysisError> {
        let labels = Labels::load(&settings.labels_path)?;
        let spec = settings.input.clone();
        let side = spec.size as usize;

        log::info!("🧠 Loading model from {}", settings.model_path.display());

        let model = tract_onnx::onnx()
            .model_for_path(&settings.model_path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, 3, side, side]).into()))
            .and_then(|model| model.into_optimized())
            .map_err(|e| {
                AnalysisError::ModelConstruction(format!(
                    "{}: {:#}",
                    settings.model_path.display(),
                    e
                ))
            })?;

        let classifier = Self::from_model(model, labels, spec)?;
        log::info!(
            "✅ Model ready ({}x{} input, {} classes)",
            side,
            side,
            classifier.labels.len()
        );

        Ok(classifier)
    }

    /// Wrap an already typed model
    pub fn from_model(
        model: TypedModel,
        labels: Labels,
        spec: InputSpec,
    ) -> Result<Self, AnalysisError> {
        let plan = model
            .into_runnable()
            .map_err(|e| AnalysisError::ModelConstruction(format!("{:#}", e)))?;

        Ok(Self { plan, labels, spec })
    }
}

impl Classifier for TractClassifier {
    fn input_spec(&self) -> &InputSpec {
        &self.spec
    }

    fn classify(&self, input: Array4<f32>) -> Result<Vec<Observation>, AnalysisError> {
        let tensor: Tensor = input.into();

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| {
                AnalysisError::UnexpectedOutput(format!("inference failed: {:#}", e))
            })?;

        let first = outputs.first().ok_or_else(|| {
            AnalysisError::UnexpectedOutput("model produced no outputs".to_string())
        })?;

        let scores: Vec<f32> = first
            .to_array_view::<f32>()
            .map_err(|e| AnalysisError::UnexpectedOutput(format!("{:#}", e)))?
            .iter()
            .copied()
            .collect();

        rank(&scores, &self.labels)
    }
}

// tract plans don't implement Debug
impl fmt::Debug for TractClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TractClassifier")
            .field("classes", &self.labels.len())
            .field("spec", &self.spec)
            .finish()
    }
}

/// Turn raw model scores into observations sorted by confidence
///
/// Models with a leading background class (1001 outputs against a
/// 1000-label vocabulary) have that class dropped first. Probabilities are
/// renormalized over the remaining classes; anything else (logits) goes
/// through a softmax. Either way the confidences sum to 1.
pub fn rank(scores: &[f32], labels: &Labels) -> Result<Vec<Observation>, AnalysisError> {
    let offset = if scores.len() == labels.len() {
        0
    } else if scores.len() == labels.len() + 1 {
        1
    } else {
        return Err(AnalysisError::UnexpectedOutput(format!(
            "{} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    };

    if scores.iter().any(|s| !s.is_finite()) {
        return Err(AnalysisError::UnexpectedOutput(
            "scores contain NaN or infinity".to_string(),
        ));
    }

    let class_scores = &scores[offset..];
    let probabilities = if is_distribution(scores) {
        normalize(class_scores)
    } else {
        softmax(class_scores)
    };

    let mut observations: Vec<Observation> = probabilities
        .iter()
        .enumerate()
        .filter_map(|(i, &p)| labels.get(i).map(|label| Observation::new(label, p)))
        .collect();

    observations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(observations)
}

fn is_distribution(scores: &[f32]) -> bool {
    let in_range = scores.iter().all(|&s| (0.0..=1.0).contains(&s));
    let sum: f32 = scores.iter().sum();
    in_range && (sum - 1.0).abs() < 1e-3
}

fn normalize(probabilities: &[f32]) -> Vec<f32> {
    let sum: f32 = probabilities.iter().sum();
    if sum <= 0.0 {
        return probabilities.to_vec();
    }
    probabilities.iter().map(|p| p / sum).collect()
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
