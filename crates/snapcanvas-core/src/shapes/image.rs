//! Raster images attached to shapes.

use crate::raster::{RasterImage, RasterResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a shape's image comes from, in serializable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    /// Inline base64 image data (PNG, JPEG or WebP).
    Base64(String),
    /// A remote URL, resolved by the embedding application.
    Url(String),
    /// An id in an external image store.
    Id(String),
}

/// The "current image" of a shape: its serializable source plus the decoded
/// raster, when one is available.
///
/// The decoded raster is never serialized; loading a document decodes it
/// again from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeImage {
    pub source: ImageSource,
    #[serde(skip)]
    pub raster: Option<Arc<RasterImage>>,
}

impl ShapeImage {
    /// An image known only by its source; not yet decoded.
    pub fn from_source(source: ImageSource) -> Self {
        Self { source, raster: None }
    }

    /// Wrap a decoded raster, keeping a base64 PNG copy as the source.
    pub fn from_raster(raster: RasterImage) -> RasterResult<Self> {
        let source = ImageSource::Base64(raster.to_base64_png()?);
        Ok(Self {
            source,
            raster: Some(Arc::new(raster)),
        })
    }

    /// Decode uploaded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> RasterResult<Self> {
        use base64::{Engine, engine::general_purpose::STANDARD};

        let raster = RasterImage::decode(bytes)?;
        Ok(Self {
            source: ImageSource::Base64(STANDARD.encode(bytes)),
            raster: Some(Arc::new(raster)),
        })
    }

    /// Decode the source into a raster if it is inline data.
    ///
    /// URL and id sources are left undecoded; there is nothing to fetch them
    /// with here.
    pub fn decode(&mut self) -> RasterResult<()> {
        if let ImageSource::Base64(data) = &self.source {
            self.raster = Some(Arc::new(RasterImage::from_base64(data)?));
        }
        Ok(())
    }

    pub fn raster(&self) -> Option<&RasterImage> {
        self.raster.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_from_raster_keeps_base64_source() {
        let raster = RasterImage::filled(2, 2, Color::rgb(1, 2, 3));
        let image = ShapeImage::from_raster(raster.clone()).unwrap();
        assert!(matches!(image.source, ImageSource::Base64(_)));

        let mut reloaded = ShapeImage::from_source(image.source.clone());
        assert!(reloaded.raster().is_none());
        reloaded.decode().unwrap();
        assert_eq!(reloaded.raster(), Some(&raster));
    }

    #[test]
    fn test_url_source_is_not_decoded() {
        let mut image = ShapeImage::from_source(ImageSource::Url("https://example.com/a.png".into()));
        image.decode().unwrap();
        assert!(image.raster().is_none());
    }

    #[test]
    fn test_raster_not_serialized() {
        let image = ShapeImage::from_raster(RasterImage::new(1, 1)).unwrap();
        let json = serde_json::to_value(&image).unwrap();
        assert!(json.get("raster").is_none());
        assert!(json["source"].get("base64").is_some());
    }
}
