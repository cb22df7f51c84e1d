//! Source pixel sampling with bilinear and Lanczos3 interpolation.
//!
//! Coordinates are continuous pixel-index positions: `(0.0, 0.0)` is the
//! center of the top-left pixel. Reads past the edge repeat the edge pixel,
//! so sampling right at the image border never darkens the avatar rim.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Interpolation filter for the final raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Sharper Lanczos3 interpolation, better when zoomed in on a large photo.
    Lanczos3,
}

impl InterpolationFilter {
    /// Sample `image` at (`x`, `y`).
    pub fn sample(self, image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
        match self {
            InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
            InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
        }
    }
}

#[inline]
fn clamped_pixel(image: &DecodedImage, px: i64, py: i64) -> [f64; 3] {
    let x = px.clamp(0, image.width as i64 - 1) as u32;
    let y = py.clamp(0, image.height as i64 - 1) as u32;
    let [r, g, b] = image.pixel(x, y);
    [r as f64, g as f64, b as f64]
}

fn to_u8(channels: [f64; 3]) -> [u8; 3] {
    channels.map(|v| v.clamp(0.0, 255.0).round() as u8)
}

/// Weighted average of the 4 nearest pixels.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x = x.clamp(0.0, (image.width - 1) as f64);
    let y = y.clamp(0.0, (image.height - 1) as f64);

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = clamped_pixel(image, x0, y0);
    let p10 = clamped_pixel(image, x0 + 1, y0);
    let p01 = clamped_pixel(image, x0, y0 + 1);
    let p11 = clamped_pixel(image, x0 + 1, y0 + 1);

    let mut result = [0.0; 3];
    for i in 0..3 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    to_u8(result)
}

/// Lanczos3 over a 6x6 neighborhood.
fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x = x.clamp(0.0, (image.width - 1) as f64);
    let y = y.clamp(0.0, (image.height - 1) as f64);
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(y - py as f64, 3.0);
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(x - px as f64, 3.0) * wy;

            let pixel = clamped_pixel(image, px, py);
            for i in 0..3 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }
    to_u8(sum.map(|v| v / weight_sum))
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    (a * pi_x.sin() * (pi_x / a).sin()) / (pi_x * pi_x)
}
