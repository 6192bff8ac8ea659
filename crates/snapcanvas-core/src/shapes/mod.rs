//! Shape definitions for the canvas.

mod image;
mod kind;

pub use image::{ImageSource, ShapeImage};
pub use kind::ShapeKind;

use crate::color::Color;
use crate::geometry::{rect_contains, rect_from_xywh};
use crate::panel::PanelId;
use crate::text::{FontFeatures, TextContent};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Minimum width and height of a shape at rest.
pub const MIN_SHAPE_SIZE: f64 = 20.0;

/// Border line pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Optional outline drawn around a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(rename = "type", default)]
    pub style: BorderStyle,
    pub size: f64,
    pub color: Color,
}

impl Border {
    pub fn new(style: BorderStyle, size: f64, color: Color) -> Self {
        Self { style, size, color }
    }
}

/// A drawable scene object.
///
/// Geometry is top-left plus extent in panel-local coordinates. The shape's
/// position in the scene's shape list is its paint order; `z_index` is the
/// key the layer commands sort that list by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub panel_id: PanelId,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ShapeImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    /// Set once the eraser has baked the shape into `image`; the image then
    /// replaces the registry drawing entirely.
    #[serde(default)]
    pub rasterized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default)]
    pub is_editing: bool,
}

impl Shape {
    /// Create a shape of `kind` covering `rect` on `panel_id`.
    pub fn new(kind: ShapeKind, rect: Rect, panel_id: PanelId) -> Self {
        let text = kind.is_text().then(TextContent::default);
        Self {
            id: Uuid::new_v4(),
            kind,
            x: rect.x0,
            y: rect.y0,
            width: rect.width().max(MIN_SHAPE_SIZE),
            height: rect.height().max(MIN_SHAPE_SIZE),
            selected: false,
            panel_id,
            z_index: 0,
            fill_color: None,
            image: None,
            border: None,
            rasterized: false,
            text,
            is_editing: false,
        }
    }

    /// Create a text shape with the given font features and empty content.
    pub fn new_text(rect: Rect, panel_id: PanelId, font: FontFeatures) -> Self {
        let mut shape = Self::new(ShapeKind::Text, rect, panel_id);
        shape.text = Some(TextContent::new(String::new(), font));
        shape
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Bounding box in panel coordinates.
    pub fn bounds(&self) -> Rect {
        rect_from_xywh(self.x, self.y, self.width, self.height)
    }

    /// Replace position and extent.
    pub fn set_bounds(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    /// Axis-aligned containment test, edges inclusive.
    pub fn contains(&self, point: Point) -> bool {
        rect_contains(self.bounds(), point)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    /// The text content, empty for non-text shapes.
    pub fn text_str(&self) -> &str {
        self.text.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// The decoded raster of the current image, if any.
    pub fn raster(&self) -> Option<&crate::raster::RasterImage> {
        self.image.as_ref().and_then(ShapeImage::raster)
    }

    /// A copy under a fresh id, moved by `offset` and not in edit mode.
    pub fn duplicated(&self, offset: Vec2) -> Shape {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.is_editing = false;
        copy.translate(offset);
        copy
    }

    /// Whether removing the image would leave nothing to draw.
    pub fn is_image_only(&self) -> bool {
        matches!(self.kind, ShapeKind::Image)
    }
}
