/// Image adapter
///
/// Decodes the picked photo and converts it to the tensor layout ImageNet
/// models expect: a single RGB image, resized to a square, scaled to 0..1,
/// normalized per channel, laid out as (batch, channel, height, width).

use std::path::Path;

use image::{imageops::FilterType, DynamicImage};
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::error::AnalysisError;

/// Shape and normalization of the model input
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InputSpec {
    /// Side of the square input in pixels (299 for Inception v3, 224 for MobileNet)
    pub size: u32,
    /// Per-channel mean subtracted after scaling to 0..1
    pub mean: [f32; 3],
    /// Per-channel standard deviation divided by after subtracting the mean
    pub std: [f32; 3],
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            size: 299,
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

/// Decode a photo from disk
pub fn load_photo(path: &Path) -> Result<DynamicImage, AnalysisError> {
    let img = image::open(path).map_err(|e| AnalysisError::ImageConversion {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    log::debug!("📷 Decoded {}: {}x{}", path.display(), img.width(), img.height());
    Ok(img)
}

/// Convert a decoded image into a model input tensor
///
/// Fails on zero-sized images or a zero standard deviation, both of which
/// would produce garbage input. The error carries only the reason; callers
/// that know the file attach it.
pub fn to_input(img: &DynamicImage, spec: &InputSpec) -> Result<Array4<f32>, String> {
    if img.width() == 0 || img.height() == 0 {
        return Err("image has no pixels".to_string());
    }
    if spec.size == 0 || spec.std.iter().any(|&s| s == 0.0) {
        return Err(format!("invalid input spec: {:?}", spec));
    }

    // Aspect ratio is not preserved
    let rgb = img
        .resize_exact(spec.size, spec.size, FilterType::Triangle)
        .to_rgb8();

    let side = spec.size as usize;
    let input = Array4::from_shape_fn((1, 3, side, side), |(_, c, y, x)| {
        let value = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - spec.mean[c]) / spec.std[c]
    });

    Ok(input)
}

/// Decode and convert in one step, tagging errors with the file path
pub fn prepare(path: &Path, spec: &InputSpec) -> Result<Array4<f32>, AnalysisError> {
    let img = load_photo(path)?;
    to_input(&img, spec).map_err(|reason| AnalysisError::ImageConversion {
        path: path.to_path_buf(),
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn identity_spec(size: u32) -> InputSpec {
        InputSpec {
            size,
            mean: [0.0, 0.0, 0.0],
            std: [1.0, 1.0, 1.0],
        }
    }

    #[test]
    fn test_input_shape() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let input = to_input(&img, &InputSpec::default()).unwrap();
        assert_eq!(input.shape(), &[1, 3, 299, 299]);
    }

    #[test]
    fn test_channels_are_planar_and_scaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 0, 51])));
        let input = to_input(&img, &identity_spec(4)).unwrap();

        assert!((input[[0, 0, 2, 3]] - 1.0).abs() < 1e-6);
        assert!(input[[0, 1, 0, 0]].abs() < 1e-6);
        assert!((input[[0, 2, 1, 1]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalization_uses_mean_and_std() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])));
        let spec = InputSpec {
            size: 2,
            mean: [0.5, 0.5, 0.5],
            std: [0.25, 0.5, 1.0],
        };
        let input = to_input(&img, &spec).unwrap();

        assert!((input[[0, 0, 0, 0]] - 2.0).abs() < 1e-6);
        assert!((input[[0, 1, 0, 0]] - 1.0).abs() < 1e-6);
        assert!((input[[0, 2, 0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_grayscale_and_alpha_images_convert() {
        let gray = DynamicImage::new_luma8(10, 20);
        let rgba = DynamicImage::new_rgba8(20, 10);
        assert!(to_input(&gray, &identity_spec(16)).is_ok());
        assert!(to_input(&rgba, &identity_spec(16)).is_ok());
    }

    #[test]
    fn test_zero_std_rejected() {
        let img = DynamicImage::new_rgb8(4, 4);
        let spec = InputSpec {
            std: [1.0, 0.0, 1.0],
            ..InputSpec::default()
        };
        let reason = to_input(&img, &spec).unwrap_err();
        assert!(reason.starts_with("invalid input spec"));
    }

    #[test]
    fn test_prepare_bad_spec_reports_photo_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        RgbImage::from_pixel(4, 4, Rgb([10, 20, 30])).save(&path).unwrap();

        let spec = InputSpec {
            size: 0,
            ..identity_spec(4)
        };
        match prepare(&path, &spec) {
            Err(AnalysisError::ImageConversion { path: p, reason }) => {
                assert_eq!(p, path);
                assert!(reason.starts_with("invalid input spec"));
            }
            other => panic!("expected ImageConversion, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-photo.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        match prepare(&path, &InputSpec::default()) {
            Err(AnalysisError::ImageConversion { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected ImageConversion, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        RgbImage::from_pixel(30, 10, Rgb([200, 120, 40])).save(&path).unwrap();

        let input = prepare(&path, &identity_spec(8)).unwrap();
        assert_eq!(input.shape(), &[1, 3, 8, 8]);
    }
}
