//! Circular crop rasterization.
//!
//! # Algorithm
//!
//! Inverse mapping, as for any resampling transform: for each output pixel
//! we find the container point under it, then the source position under
//! that point, and sample there.
//!
//! ```text
//! u     = ((p + 0.5) / N - 0.5) * mask            (container units, mask-centered)
//! n     = 0.5 + (u - offset) / (display * scale)  (normalized source position)
//! src   = n * source_size - 0.5                   (pixel-index space)
//! ```
//!
//! Coverage of the circle is computed per pixel with a one-pixel linear ramp,
//! giving an anti-aliased rim instead of a jagged hard clip.

use crate::config::{check_output_size, ConfigError};
use crate::cropper::{CropState, Viewport};
use crate::decode::DecodedImage;

use super::InterpolationFilter;

/// An RGBA raster holding the circular crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedAvatar {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl CroppedAvatar {
    /// A fully transparent `size` x `size` raster.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroOutputSize` or `ConfigError::OutputTooLarge`
    /// when `size` is outside `1..=MAX_OUTPUT_SIZE`.
    pub fn transparent(size: u32) -> Result<Self, ConfigError> {
        check_output_size(size)?;
        let edge = size as usize;

        Ok(Self {
            width: size,
            height: size,
            pixels: vec![0; edge * edge * 4],
        })
    }

    /// Read one RGBA pixel. Coordinates must be in range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Composite over an opaque `matte` colour, dropping alpha.
    pub fn flatten(&self, matte: [u8; 3]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.pixels.chunks_exact(4) {
            let alpha = px[3] as f64 / 255.0;
            for i in 0..3 {
                let v = px[i] as f64 * alpha + matte[i] as f64 * (1.0 - alpha);
                rgb.push(v.round() as u8);
            }
        }
        rgb
    }
}

/// Render the region under the circular mask to a square RGBA raster.
///
/// # Arguments
///
/// * `image` - Decoded source image
/// * `viewport` - Geometry the state was produced against
/// * `state` - Offset and scale to render
/// * `output_size` - Edge length of the output in pixels
/// * `filter` - Interpolation method
///
/// Pixels outside the circle are fully transparent. An empty source yields
/// a fully transparent raster.
///
/// # Errors
///
/// Returns a `ConfigError` if `output_size` is zero or above
/// `MAX_OUTPUT_SIZE`.
pub fn render_circular_crop(
    image: &DecodedImage,
    viewport: &Viewport,
    state: &CropState,
    output_size: u32,
    filter: InterpolationFilter,
) -> Result<CroppedAvatar, ConfigError> {
    let mut output = CroppedAvatar::transparent(output_size)?;
    if image.is_empty() {
        return Ok(output);
    }

    let n = output_size as f64;
    let radius = n / 2.0;
    let units_per_pixel = viewport.mask_diameter / n;
    let scaled = viewport.display.scaled(state.scale);
    let (src_w, src_h) = (image.width as f64, image.height as f64);
    let edge = output_size as usize;

    for py in 0..output_size {
        let dy = py as f64 + 0.5 - radius;

        for px in 0..output_size {
            let dx = px as f64 + 0.5 - radius;

            let coverage = (radius - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            let nx = 0.5 + (dx * units_per_pixel - state.offset_x) / scaled.width;
            let ny = 0.5 + (dy * units_per_pixel - state.offset_y) / scaled.height;
            let [r, g, b] = filter.sample(image, nx * src_w - 0.5, ny * src_h - 0.5);

            let idx = (py as usize * edge + px as usize) * 4;
            output.pixels[idx] = r;
            output.pixels[idx + 1] = g;
            output.pixels[idx + 2] = b;
            output.pixels[idx + 3] = (coverage * 255.0).round() as u8;
        }
    }

    Ok(output)
}
