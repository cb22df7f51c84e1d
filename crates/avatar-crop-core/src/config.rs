//! Cropper configuration.
//!
//! Every field has a default, and the struct deserializes with
//! `#[serde(default)]`, so a host can pass a partial object such as
//! `{ "outputSize": 256 }`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::InterpolationFilter;

/// Default container width and height.
pub const DEFAULT_CONTAINER_SIZE: f64 = 300.0;
/// Default diameter of the circular mask.
pub const DEFAULT_MASK_DIAMETER: f64 = 200.0;
/// Default edge length of the square output raster.
pub const DEFAULT_OUTPUT_SIZE: u32 = 200;
/// Largest accepted output edge length.
pub const MAX_OUTPUT_SIZE: u32 = 4096;
/// Lowest zoom value.
pub const DEFAULT_MIN_SCALE: f64 = 1.0;
/// Highest zoom value.
pub const DEFAULT_MAX_SCALE: f64 = 3.0;
/// JPEG quality used when the format does not say otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors from [`CropperConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A length is zero, negative, or not finite.
    #[error("Invalid {field}: {value} (must be a positive finite number)")]
    InvalidLength { field: &'static str, value: f64 },

    /// The mask does not fit inside the container.
    #[error("Mask diameter {mask} exceeds container {width}x{height}")]
    MaskExceedsContainer { mask: f64, width: f64, height: f64 },

    /// Output raster has no pixels.
    #[error("Output size must be non-zero")]
    ZeroOutputSize,

    /// Output raster is larger than [`MAX_OUTPUT_SIZE`].
    #[error("Output size {size} exceeds maximum {max}")]
    OutputTooLarge { size: u32, max: u32 },

    /// Zoom range is empty or allows shrinking below the fitted size.
    #[error("Invalid zoom range: {min}..{max} (min must be >= 1 and <= max)")]
    InvalidZoomRange { min: f64, max: f64 },
}

/// Encoding of the cropped avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    /// RGBA PNG with transparent corners.
    #[default]
    Png,
    /// JPEG with corners composited over the matte colour.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// JPEG at the default quality.
    pub fn jpeg() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// MIME type of the encoded output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Configuration for a cropper session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    /// Width of the interactive container
    pub container_width: f64,
    /// Height of the interactive container
    pub container_height: f64,
    /// Diameter of the circular mask, centered in the container
    pub mask_diameter: f64,
    /// Edge length of the square output image in pixels
    pub output_size: u32,
    /// Lowest zoom value
    pub min_scale: f64,
    /// Highest zoom value
    pub max_scale: f64,
    /// Resampling filter for the final raster
    pub filter: InterpolationFilter,
    /// Output encoding
    pub format: OutputFormat,
    /// RGB colour behind the circle for formats without alpha
    pub matte: [u8; 3],
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            container_width: DEFAULT_CONTAINER_SIZE,
            container_height: DEFAULT_CONTAINER_SIZE,
            mask_diameter: DEFAULT_MASK_DIAMETER,
            output_size: DEFAULT_OUTPUT_SIZE,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            filter: InterpolationFilter::default(),
            format: OutputFormat::default(),
            matte: [255, 255, 255],
        }
    }
}

impl CropperConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the geometry is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_length("containerWidth", self.container_width)?;
        check_length("containerHeight", self.container_height)?;
        check_length("maskDiameter", self.mask_diameter)?;

        if self.mask_diameter > self.container_width || self.mask_diameter > self.container_height {
            return Err(ConfigError::MaskExceedsContainer {
                mask: self.mask_diameter,
                width: self.container_width,
                height: self.container_height,
            });
        }

        check_output_size(self.output_size)?;

        let zoom_ok = self.min_scale.is_finite()
            && self.max_scale.is_finite()
            && self.min_scale >= 1.0
            && self.min_scale <= self.max_scale;
        if !zoom_ok {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }

        Ok(())
    }
}

/// Check an output edge length against `1..=MAX_OUTPUT_SIZE`.
pub fn check_output_size(size: u32) -> Result<(), ConfigError> {
    if size == 0 {
        Err(ConfigError::ZeroOutputSize)
    } else if size > MAX_OUTPUT_SIZE {
        Err(ConfigError::OutputTooLarge {
            size,
            max: MAX_OUTPUT_SIZE,
        })
    } else {
        Ok(())
    }
}

fn check_length(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLength { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CropperConfig::new().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = CropperConfig::default();
        assert_eq!(config.mask_diameter, 200.0);
        assert_eq!(config.output_size, 200);
        assert_eq!(config.min_scale, 1.0);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.format, OutputFormat::Png);
    }

    #[test]
    fn test_rejects_mask_larger_than_container() {
        let mut config = CropperConfig::default();
        config.mask_diameter = 400.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MaskExceedsContainer { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_container() {
        let mut config = CropperConfig::default();
        config.container_width = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLength { field: "containerWidth", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_output() {
        let mut config = CropperConfig::default();
        config.output_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroOutputSize));
    }

    #[test]
    fn test_rejects_oversized_output() {
        let mut config = CropperConfig::default();
        config.output_size = 40_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutputTooLarge {
                size: 40_000,
                max: MAX_OUTPUT_SIZE
            })
        );

        config.output_size = MAX_OUTPUT_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let mut config = CropperConfig::default();
        config.min_scale = 2.0;
        config.max_scale = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidZoomRange { .. })
        ));
    }

    #[test]
    fn test_rejects_zoom_below_one() {
        let mut config = CropperConfig::default();
        config.min_scale = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_format_mime() {
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::jpeg().mime_type(), "image/jpeg");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ZeroOutputSize;
        assert_eq!(err.to_string(), "Output size must be non-zero");
    }
}
