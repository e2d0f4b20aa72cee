/// Decides whether a buffer is a decodable raster image.
///
/// This is the gate in front of every storage side effect.
pub trait ImageValidator: Send + Sync {
    /// Whether `bytes` decode as an image.
    fn validate(&self, bytes: &[u8]) -> bool;
}

/// Validates by fully decoding the buffer with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingValidator;

impl ImageValidator for DecodingValidator {
    fn validate(&self, bytes: &[u8]) -> bool {
        !bytes.is_empty() && image::load_from_memory(bytes).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let image = RgbaImage::from_pixel(3, 2, Rgba([12, 200, 40, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn accepts_encoded_images() {
        assert!(DecodingValidator.validate(&encoded(ImageFormat::Png)));
        assert!(DecodingValidator.validate(&encoded(ImageFormat::Bmp)));
    }

    #[test]
    fn rejects_truncated_png() {
        let png = encoded(ImageFormat::Png);
        assert!(!DecodingValidator.validate(&png[..png.len() / 2]));
    }

    #[test]
    fn rejects_non_images() {
        assert!(!DecodingValidator.validate(b""));
        assert!(!DecodingValidator.validate(b"<html>not a picture</html>"));
    }
}
