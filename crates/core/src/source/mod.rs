use std::{fmt, io::Cursor, path::Path, sync::Arc};

use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use crate::{BoothError, Result};

/// Identifier issued by the booth when a source is added. Framed artifacts and
/// placed items keep the identifier of the source they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhotoId(pub u64);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "photo-{}", self.0)
    }
}

/// Raw image handed over by an upload or capture collaborator, plus the
/// caption the user typed for it.
#[derive(Clone)]
pub struct SourceImage {
    bytes: Arc<[u8]>,
    dimensions: Option<(u32, u32)>,
    pub caption: String,
}

impl SourceImage {
    /// Wraps encoded image bytes after probing the header for dimensions.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let bytes = bytes.into();
        let dimensions = read_dimensions(&bytes)?;
        Ok(Self {
            bytes,
            dimensions: Some(dimensions),
            caption: String::new(),
        })
    }

    /// Wraps bytes without looking at them. Decoding happens when the image is
    /// framed, so undecodable data only surfaces during develop.
    pub fn deferred(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            dimensions: None,
            caption: String::new(),
        }
    }

    /// Reads an image file handed over by the upload collaborator.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|err| BoothError::capture(format!("{}: {err}", path.display())))?;
        Self::from_bytes(bytes)
    }

    /// Encodes an already decoded frame (e.g. from a capture device) as PNG.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|err| BoothError::capture(format!("encode captured frame: {err}")))?;
        Ok(Self {
            bytes: buf.into(),
            dimensions: Some((image.width(), image.height())),
            caption: String::new(),
        })
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Width and height, if the header has been read.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Fully decodes the source into pixel data.
    pub fn decode(&self) -> Result<DynamicImage> {
        let image = image::load_from_memory(&self.bytes)
            .map_err(|err| BoothError::decode(err.to_string()))?;
        if image.width() == 0 || image.height() == 0 {
            return Err(BoothError::decode("image has no pixels"));
        }
        Ok(image)
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("len", &self.bytes.len())
            .field("dimensions", &self.dimensions)
            .field("caption", &self.caption)
            .finish()
    }
}

fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|err| BoothError::decode(err.to_string()))?;
    if width == 0 || height == 0 {
        return Err(BoothError::decode("image has no pixels"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn reads_dimensions_from_header() {
        let source = SourceImage::from_bytes(png(8, 4)).unwrap().with_caption("hi");
        assert_eq!(source.dimensions(), Some((8, 4)));
        assert_eq!(source.caption, "hi");
    }

    #[test]
    fn rejects_garbage_up_front() {
        let err = SourceImage::from_bytes(b"not an image".to_vec()).unwrap_err();
        assert!(matches!(err, BoothError::Decode(_)));
    }

    #[test]
    fn deferred_sources_fail_only_on_decode() {
        let source = SourceImage::deferred(b"still not an image".to_vec());
        assert_eq!(source.dimensions(), None);
        assert!(matches!(source.decode(), Err(BoothError::Decode(_))));
    }

    #[test]
    fn missing_file_is_a_capture_error() {
        let err = SourceImage::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, BoothError::Capture(_)));
    }

    #[test]
    fn captured_frames_round_trip_through_png() {
        let frame = DynamicImage::ImageRgba8(RgbaImage::new(3, 5));
        let source = SourceImage::from_image(&frame).unwrap();
        assert_eq!(source.dimensions(), Some((3, 5)));
        assert_eq!(source.decode().unwrap().height(), 5);
    }
}
