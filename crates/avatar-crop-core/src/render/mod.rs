//! Rasterization of the visible circular region.
//!
//! The cropper's live preview is drawn by the host from
//! [`PreviewTransform`](crate::cropper::PreviewTransform); this module only
//! produces the final raster on confirm.

mod circle;
mod sample;

pub use circle::{render_circular_crop, CroppedAvatar};
pub use sample::InterpolationFilter;
