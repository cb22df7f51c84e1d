//! Source decoding helpers for the JS host.
//!
//! The cropper needs the upright source dimensions when it opens; these
//! functions let the host read them without decoding the whole image.
//!
//! # Example
//!
//! ```typescript
//! import { probe_image_size, data_url_to_bytes } from '@avatar-crop/wasm';
//!
//! const bytes = data_url_to_bytes(reader.result as string);
//! const [width, height] = probe_image_size(bytes);
//! ```

use avatar_crop_core::decode::{self, DecodeError};
use wasm_bindgen::prelude::*;

/// Read the upright `[width, height]` of a JPEG or PNG.
///
/// EXIF orientation is applied, so a portrait phone photo reports portrait
/// dimensions.
#[wasm_bindgen]
pub fn probe_image_size(bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
    probe(bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract the raw bytes from a `data:image/...;base64,` URL.
#[wasm_bindgen]
pub fn data_url_to_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    decode::decode_data_url(url).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn probe(bytes: &[u8]) -> Result<Vec<u32>, DecodeError> {
    decode::probe_dimensions(bytes).map(|(width, height)| vec![width, height])
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_data_url_to_bytes() {
        assert_eq!(data_url_to_bytes("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
    }

    #[wasm_bindgen_test]
    fn test_data_url_rejects_text() {
        assert!(data_url_to_bytes("data:text/plain;base64,AQID").is_err());
    }

    #[wasm_bindgen_test]
    fn test_probe_garbage() {
        assert!(probe_image_size(&[1, 2, 3]).is_err());
    }
}
