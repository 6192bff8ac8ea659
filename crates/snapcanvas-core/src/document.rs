//! The persisted document payload and its conversion to and from a scene.

use crate::color::Fill;
use crate::freehand::DrawingPath;
use crate::panel::{PanelId, SplitMode};
use crate::raster::{RasterError, RasterImage};
use crate::scene::{FilledImage, Scene};
use crate::shapes::{ImageSource, Shape, ShapeImage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Serialized document as exchanged with the persistence layer.
///
/// Live raster handles never appear here: shape images keep their
/// base64/URL/id source and filled patches are base64 PNG.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPayload {
    pub shapes: Vec<Shape>,
    pub background_color: BTreeMap<PanelId, Fill>,
    pub split_mode: SplitMode,
    pub drawings: BTreeMap<PanelId, Vec<DrawingPath>>,
    pub filled_images: BTreeMap<PanelId, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_image_base64: Option<String>,
}

impl DocumentPayload {
    /// Capture `scene` for saving.
    pub fn from_scene(scene: &Scene) -> DocumentResult<Self> {
        let filled_images = scene
            .filled_images
            .iter()
            .map(|(panel, patch)| Ok((panel.clone(), patch.raster.to_base64_png()?)))
            .collect::<DocumentResult<BTreeMap<_, _>>>()?;

        let uploaded_image_base64 = match scene.uploaded_image.as_ref().map(|i| &i.source) {
            Some(ImageSource::Base64(data)) => Some(data.clone()),
            Some(other) => {
                log::warn!("pending upload {other:?} is not inline data; not saved");
                None
            }
            None => None,
        };

        Ok(Self {
            shapes: scene.shapes.clone(),
            background_color: scene.backgrounds.clone(),
            split_mode: scene.split_mode,
            drawings: scene.drawings.clone(),
            filled_images,
            uploaded_image_base64,
        })
    }

    /// Install the payload into a fresh scene.
    ///
    /// Decoding is best effort: a shape image that fails to decode keeps its
    /// source but has no raster, an undecodable filled patch or upload is
    /// dropped. Each failure is logged.
    pub fn into_scene(self) -> Scene {
        let mut shapes = self.shapes;
        for shape in &mut shapes {
            if let Some(image) = shape.image.as_mut() {
                if let Err(e) = image.decode() {
                    log::warn!("shape {}: image decode failed: {e}", shape.id);
                }
            }
        }

        let mut filled_images = BTreeMap::new();
        for (panel, data) in self.filled_images {
            match RasterImage::from_base64(&data) {
                Ok(raster) => {
                    filled_images.insert(panel, FilledImage::new(raster));
                }
                Err(e) => log::warn!("panel {panel}: filled image decode failed: {e}"),
            }
        }

        let uploaded_image = self.uploaded_image_base64.and_then(|data| {
            let mut image = ShapeImage::from_source(ImageSource::Base64(data));
            match image.decode() {
                Ok(()) => Some(image),
                Err(e) => {
                    log::warn!("uploaded image decode failed: {e}");
                    None
                }
            }
        });

        let active_panel = self.split_mode.panel_ids().into_iter().next().unwrap_or_default();

        Scene {
            shapes,
            drawings: self.drawings,
            filled_images,
            backgrounds: self.background_color,
            split_mode: self.split_mode,
            active_panel,
            uploaded_image,
        }
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Scene {
    /// Serialize to payload JSON.
    pub fn save_json(&self) -> DocumentResult<String> {
        DocumentPayload::from_scene(self)?.to_json()
    }

    /// Load from payload JSON.
    pub fn load_json(json: &str) -> DocumentResult<Scene> {
        Ok(DocumentPayload::from_json(json)?.into_scene())
    }
}
