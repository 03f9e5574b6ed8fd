/// State of the single SeaFood screen
///
/// Holds what the user sees: the title, the photo, the ranked
/// observations, and an error line. Each pick is tagged with a request id;
/// only the result for the latest pick is applied.

use std::path::PathBuf;

use crate::analysis::Analysis;
use crate::error::AnalysisError;
use crate::vision::Observation;

/// Title shown before any photo has been classified
pub const INITIAL_TITLE: &str = "SeaFood";

/// Message shown when a photo could not be analyzed
pub const ANALYSIS_FAILED: &str = "Could not analyze this image, try another.";

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Navigation title ("Hotdog!" / "Not Hotdog!" after a classification)
    pub title: String,
    /// Photo currently shown
    pub photo: Option<PathBuf>,
    /// Ranked observations for the shown photo
    pub observations: Vec<Observation>,
    /// Last analysis failure, cleared by the next pick
    pub error: Option<String>,
    /// Id of the most recent pick
    latest_request: u64,
    /// Whether the most recent pick is still being analyzed
    busy: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            title: INITIAL_TITLE.to_string(),
            photo: None,
            observations: Vec::new(),
            error: None,
            latest_request: 0,
            busy: false,
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the picker closing
    ///
    /// Returns the request id to analyze under, or `None` when the picker
    /// was cancelled (nothing changes).
    pub fn pick(&mut self, choice: Option<PathBuf>) -> Option<(u64, PathBuf)> {
        let photo = choice?;

        self.latest_request += 1;
        self.busy = true;
        self.error = None;

        Some((self.latest_request, photo))
    }

    /// Apply an analysis outcome
    ///
    /// Returns false when the outcome belongs to a superseded pick and was
    /// dropped.
    pub fn finish(&mut self, request: u64, outcome: Result<Analysis, AnalysisError>) -> bool {
        if request != self.latest_request {
            log::debug!("Dropping stale result for request {}", request);
            return false;
        }

        self.busy = false;

        match outcome {
            Ok(analysis) => {
                self.photo = Some(analysis.photo);
                self.observations = analysis.observations;

                // No observations: keep the previous title
                if let Some(verdict) = analysis.verdict {
                    self.title = verdict.title().to_string();
                }
            }
            Err(e) => {
                log::error!("❌ {}", e);
                self.error = Some(format!("{} ({})", ANALYSIS_FAILED, e));
            }
        }

        true
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
