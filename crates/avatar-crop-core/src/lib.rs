//! Avatar Crop Core - circular avatar cropping
//!
//! This crate provides the core of the profile-photo cropper: pan/zoom
//! geometry inside a fixed circular mask, the session lifecycle with save and
//! cancel callbacks, source decoding, and rasterization of the visible circle
//! to a fixed-size encoded image.
//!
//! # Example
//!
//! ```ignore
//! use avatar_crop_core::{CropHandler, CropSession, CropperConfig, EncodedImage, Point};
//!
//! struct Upload;
//!
//! impl CropHandler for Upload {
//!     fn on_save(&mut self, image: EncodedImage) { /* send image.to_data_url() */ }
//!     fn on_cancel(&mut self) {}
//! }
//!
//! let (w, h) = avatar_crop_core::decode::probe_dimensions(&bytes)?;
//! let mut session = CropSession::open(CropperConfig::default(), w, h, Upload)?;
//! session.begin_drag(Point::new(120.0, 80.0));
//! session.update_drag(Point::new(140.0, 90.0));
//! session.end_drag();
//! session.set_zoom(1.5);
//! session.confirm(&bytes)?;
//! ```

use thiserror::Error;

pub mod config;
pub mod cropper;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod render;
pub mod session;

pub use config::{ConfigError, CropperConfig, OutputFormat};
pub use cropper::{CropState, Cropper, PreviewTransform, Viewport};
pub use decode::{DecodeError, DecodedImage};
pub use encode::{EncodeError, EncodedImage};
pub use geometry::{PanBounds, Point, Size};
pub use render::{CroppedAvatar, InterpolationFilter};
pub use session::{ConfirmOutcome, CropHandler, CropSession, DecodeTicket, SessionStatus};

/// Errors surfaced by the cropper.
#[derive(Debug, Error, PartialEq)]
pub enum CropError {
    /// The configuration is unusable.
    #[error("Invalid cropper config: {0}")]
    Config(#[from] ConfigError),

    /// The source image has no pixels.
    #[error("Source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    /// The decoded source does not have the dimensions the session opened with.
    #[error("Source is {width}x{height}, cropper was opened for {expected_width}x{expected_height}")]
    SourceMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// The source image could not be decoded.
    #[error("Failed to decode source image: {0}")]
    Decode(#[from] DecodeError),

    /// The cropped avatar could not be encoded.
    #[error("Failed to encode avatar: {0}")]
    Encode(#[from] EncodeError),
}
