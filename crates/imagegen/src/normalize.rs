//! Convert uploaded reference images to PNG before they are sent upstream.

use std::io::Cursor;

use image::ImageFormat;

use crate::error::ImageGenError;

/// First bytes of every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Decode any supported raster format and re-encode it as PNG.
///
/// CPU-bound; async callers should run it on a blocking thread.
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, ImageGenError> {
    let decoded = image::load_from_memory(bytes)?;
    let mut out = Cursor::new(Vec::with_capacity(bytes.len()));
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Upload filename for a normalized image: the original stem with a
/// `.png` extension.
pub fn png_filename(original: &str) -> String {
    match original.rfind('.') {
        Some(pos) if pos > 0 => format!("{}.png", &original[..pos]),
        _ => format!("{original}.png"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, image::Rgb([200, 40, 40])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn jpeg_is_converted_to_png() {
        let png = to_png(&encode(ImageFormat::Jpeg)).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn png_input_stays_png() {
        let png = to_png(&encode(ImageFormat::Png)).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let err = to_png(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageGenError::Decode(_)));
    }

    #[test]
    fn png_filename_swaps_extension() {
        assert_eq!(png_filename("face.jpg"), "face.png");
        assert_eq!(png_filename("outfit.final.webp"), "outfit.final.png");
        assert_eq!(png_filename("pose"), "pose.png");
    }
}
