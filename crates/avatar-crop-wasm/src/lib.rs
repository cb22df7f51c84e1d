//! Avatar Crop WASM - WebAssembly bindings for the avatar cropper
//!
//! This crate exposes `avatar-crop-core` to JavaScript/TypeScript hosts such
//! as a profile editor's "adjust photo" dialog.
//!
//! # Module Structure
//!
//! - `cropper` - The `Cropper` class: drag, zoom, confirm, cancel
//! - `decode` - Source helpers (dimension probing, data URL unwrapping)
//!
//! # Usage
//!
//! ```typescript
//! import init, { Cropper, probe_image_size } from '@avatar-crop/wasm';
//!
//! await init();
//!
//! const [w, h] = probe_image_size(bytes);
//! const cropper = new Cropper(undefined, w, h, onSave, onCancel);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod decode;

pub use cropper::{JsCropper, JsDecodeTicket};
pub use decode::{data_url_to_bytes, probe_image_size};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
