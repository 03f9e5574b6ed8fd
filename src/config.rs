/// Application settings
///
/// Read once at startup from a JSON file:
/// - Linux: ~/.config/seafood/settings.json
/// - macOS: ~/Library/Application Support/seafood/settings.json
/// - Windows: %APPDATA%\seafood\settings.json
///
/// `SEAFOOD_SETTINGS` overrides the location. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::vision::InputSpec;

/// Environment variable pointing at an alternative settings file
pub const SETTINGS_ENV: &str = "SEAFOOD_SETTINGS";

/// Where the classifier and its vocabulary live
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelSettings {
    /// ONNX model file
    pub model_path: PathBuf,
    /// Text file with one class label per line
    pub labels_path: PathBuf,
    /// Input size and normalization the model was trained with
    pub input: InputSpec,
}

impl Default for ModelSettings {
    fn default() -> Self {
        let dir = models_dir();
        Self {
            model_path: dir.join("inception-v3.onnx"),
            labels_path: dir.join("imagenet_labels.txt"),
            input: InputSpec::default(),
        }
    }
}

/// All user-tunable settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    /// How many ranked observations the screen lists under the photo
    pub ranked_results_shown: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            ranked_results_shown: 5,
        }
    }
}

impl Settings {
    /// Load settings from the default location, falling back to defaults
    ///
    /// Errors are logged, never fatal.
    pub fn load_or_default() -> Self {
        let path = settings_path();

        match Self::load_from(&path) {
            Ok(Some(settings)) => {
                log::info!("⚙️  Settings loaded from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("⚙️  No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("⚠️  {} (using defaults)", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Resolve the settings file path
pub fn settings_path() -> PathBuf {
    if let Some(custom) = std::env::var_os(SETTINGS_ENV) {
        return PathBuf::from(custom);
    }

    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("seafood");
    path.push("settings.json");
    path
}

/// Default directory for the model and label files
fn models_dir() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    path.push("seafood");
    path.push("models");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model.input.size, 299);
        assert_eq!(settings.ranked_results_shown, 5);
        assert!(settings.model.model_path.ends_with("seafood/models/inception-v3.onnx"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(
            r#"{
                "model": {
                    "model_path": "/opt/mobilenetv2-7.onnx",
                    "input": { "size": 224 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.model.model_path, PathBuf::from("/opt/mobilenetv2-7.onnx"));
        assert_eq!(settings.model.input.size, 224);
        assert!(settings.model.labels_path.ends_with("imagenet_labels.txt"));
        assert_eq!(settings.ranked_results_shown, 5);
    }

    #[test]
    fn test_serialization() {
        let mut settings = Settings::default();
        settings.model.input.size = 224;
        settings.ranked_results_shown = 3;

        let json = serde_json::to_string_pretty(&settings).unwrap();
        let restored = Settings::from_json(&json).unwrap();

        assert_eq!(settings, restored);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ model: ").unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "ranked_results_shown": 3 }"#).unwrap();

        let settings = Settings::load_from(&path).unwrap().unwrap();
        assert_eq!(settings.ranked_results_shown, 3);
    }

    #[test]
    fn test_settings_env_override() {
        // Both cases share one test since they mutate the process environment
        let dir = tempfile::tempdir().unwrap();

        let malformed = dir.path().join("broken.json");
        fs::write(&malformed, "{ \"ranked_results_shown\": ").unwrap();
        std::env::set_var(SETTINGS_ENV, &malformed);
        assert_eq!(settings_path(), malformed);
        assert_eq!(Settings::load_or_default(), Settings::default());

        let valid = dir.path().join("settings.json");
        fs::write(
            &valid,
            r#"{ "ranked_results_shown": 2, "model": { "model_path": "/opt/m.onnx" } }"#,
        )
        .unwrap();
        std::env::set_var(SETTINGS_ENV, &valid);
        let loaded = Settings::load_or_default();

        std::env::remove_var(SETTINGS_ENV);

        assert_eq!(loaded.ranked_results_shown, 2);
        assert_eq!(loaded.model.model_path, PathBuf::from("/opt/m.onnx"));
        assert_eq!(loaded.model.input, InputSpec::default());
    }
}
