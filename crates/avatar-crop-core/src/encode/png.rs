//! PNG encoding, the default avatar format since it keeps the transparent corners.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{check_buffer, EncodeError};

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    check_buffer(pixels, width, height, 4)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&vec![0u8; 8 * 8 * 4], 8, 8).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let pixels = vec![255, 0, 0, 255, 0, 0, 0, 0];
        let png = encode_png(&pixels, 2, 1).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 0).0[3], 0);
    }

    #[test]
    fn test_encode_png_short_buffer() {
        assert!(matches!(
            encode_png(&[0u8; 12], 2, 2),
            Err(EncodeError::InvalidPixelData { expected: 16, actual: 12 })
        ));
    }
}
