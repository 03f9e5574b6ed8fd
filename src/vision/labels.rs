/// Label vocabulary for an ImageNet-style classifier
///
/// Accepts the two common text layouts, one class per line:
/// - plain names: `hotdog, hot dog, red hot`
/// - synset files: `n07697537 hotdog, hot dog, red hot`

use std::fs;
use std::path::Path;

use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    /// Read labels from a text file
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path).map_err(|e| {
            AnalysisError::ModelConstruction(format!(
                "failed to read labels {}: {}",
                path.display(),
                e
            ))
        })?;

        let labels = Self::parse(&text)?;
        log::info!("🏷️  Loaded {} labels from {}", labels.len(), path.display());
        Ok(labels)
    }

    /// Parse labels from text, skipping blank lines
    pub fn parse(text: &str) -> Result<Self, AnalysisError> {
        let names: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| strip_synset_id(line).to_string())
            .collect();

        if names.is_empty() {
            return Err(AnalysisError::ModelConstruction(
                "label vocabulary is empty".to_string(),
            ));
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

/// Drop a leading WordNet id ("n" followed by 8 digits) if present
fn strip_synset_id(line: &str) -> &str {
    match line.split_once(char::is_whitespace) {
        Some((head, rest))
            if head.len() == 9
                && head.starts_with('n')
                && head[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            rest.trim_start()
        }
        _ => line,
    }
}
