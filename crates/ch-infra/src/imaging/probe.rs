use ch_core::ports::ImageProbePort;
use std::io::Cursor;
use tracing::debug;

/// Reads image dimensions from the encoded header without decoding pixels.
#[derive(Debug, Default)]
pub struct ImageCrateProbe;

impl ImageCrateProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ImageProbePort for ImageCrateProbe {
    fn dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)> {
        let reader = match image::ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
            Ok(reader) => reader,
            Err(err) => {
                debug!(error = %err, "image format detection failed");
                return None;
            }
        };
        match reader.into_dimensions() {
            Ok(dimensions) => Some(dimensions),
            Err(err) => {
                debug!(error = %err, size = bytes.len(), "image dimensions unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbImage::new(width, height);
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn reads_png_dimensions() {
        assert_eq!(ImageCrateProbe::new().dimensions(&png(800, 600)), Some((800, 600)));
    }

    #[test]
    fn garbage_has_no_dimensions() {
        assert_eq!(ImageCrateProbe::new().dimensions(b"not an image"), None);
        assert_eq!(ImageCrateProbe::new().dimensions(&[]), None);
    }
}
