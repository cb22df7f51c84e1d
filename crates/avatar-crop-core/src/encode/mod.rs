//! Output encoding for cropped avatars.
//!
//! This module provides functionality for:
//! - Encoding the RGBA crop to PNG (transparent corners)
//! - Encoding to JPEG over a matte colour
//! - Wrapping the result as a `data:` URL for `<img src>` or upload forms

mod jpeg;
mod png;

use thiserror::Error;

use crate::config::OutputFormat;
use crate::decode::encode_data_url;
use crate::render::CroppedAvatar;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Errors that can occur while encoding.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// Pixel data length doesn't match the dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// An encoded avatar ready to hand to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// Render as a `data:<mime>;base64,...` URL.
    pub fn to_data_url(&self) -> String {
        encode_data_url(self.mime_type, &self.bytes)
    }
}

/// Encode a cropped avatar in the requested format.
///
/// `matte` fills the transparent corners for formats without alpha.
pub fn encode_avatar(
    avatar: &CroppedAvatar,
    format: OutputFormat,
    matte: [u8; 3],
) -> Result<EncodedImage, EncodeError> {
    let bytes = match format {
        OutputFormat::Png => encode_png(&avatar.pixels, avatar.width, avatar.height)?,
        OutputFormat::Jpeg { quality } => {
            let rgb = avatar.flatten(matte);
            encode_jpeg(&rgb, avatar.width, avatar.height, quality)?
        }
    };

    Ok(EncodedImage {
        bytes,
        mime_type: format.mime_type(),
    })
}

pub(crate) fn check_buffer(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * channels;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
