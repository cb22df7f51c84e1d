//! Source image decoding for the cropper.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG images (format sniffed from content)
//! - Applying EXIF orientation so phone photos come out upright
//! - Reading upright dimensions without a full decode
//! - Unwrapping `data:` URLs
//!
//! # Architecture
//!
//! Decoding is synchronous. A browser host typically fetches the bytes
//! asynchronously and hands them to the session once they arrive; see
//! [`CropSession::finish_confirm`](crate::session::CropSession::finish_confirm).

mod data_url;
mod reader;
mod types;

pub use data_url::{decode_data_url, encode_data_url};
pub use reader::{decode_image, get_orientation, probe_dimensions};
pub use types::{DecodeError, DecodedImage, Orientation};
