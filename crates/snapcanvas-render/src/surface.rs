//! The abstract 2D drawing surface every painter targets.

use kurbo::{BezPath, Point, Rect, Shape as _};
use snapcanvas_core::color::{Color, Fill};
use snapcanvas_core::raster::RasterImage;
use snapcanvas_core::shapes::BorderStyle;
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("pixel buffer is {actual:?}, surface is {expected:?}")]
    SizeMismatch { expected: (u32, u32), actual: (u32, u32) },
    #[error("draw failed: {0}")]
    Draw(String),
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// What a fill or stroke paints with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    Solid(Color),
    /// Two-stop gradient from `start` to `end` in surface coordinates.
    LinearGradient {
        start: Point,
        end: Point,
        from: Color,
        to: Color,
    },
}

/// How painted pixels combine with what is already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    SourceOver,
    /// Clears destination alpha where painted; used by the eraser.
    DestinationOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub brush: Brush,
    pub blend: Blend,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            brush: Brush::Solid(color),
            blend: Blend::SourceOver,
        }
    }

    /// Paint that erases whatever it covers.
    pub fn eraser() -> Self {
        Self {
            brush: Brush::Solid(Color::BLACK),
            blend: Blend::DestinationOut,
        }
    }

    /// Paint a `Fill` across `area`. Gradients run through the center of
    /// `area` at the fill's angle, spanning its full extent.
    pub fn from_fill(fill: &Fill, area: Rect) -> Self {
        let brush = match *fill {
            Fill::Solid { color } => Brush::Solid(color),
            Fill::LinearGradient { start, end, angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                let center = area.center();
                let half = (area.width() * cos.abs() + area.height() * sin.abs()) / 2.0;
                let offset = kurbo::Vec2::new(cos * half, sin * half);
                Brush::LinearGradient {
                    start: center - offset,
                    end: center + offset,
                    from: start,
                    to: end,
                }
            }
        };
        Self {
            brush,
            blend: Blend::SourceOver,
        }
    }
}

/// Stroke geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    /// Alternating on/off lengths; empty for a solid line.
    pub dash: Vec<f64>,
    /// Round caps and joins; otherwise butt caps and miter joins.
    pub round: bool,
}

impl StrokeStyle {
    pub fn solid(width: f64) -> Self {
        Self {
            width,
            dash: Vec::new(),
            round: false,
        }
    }

    /// Round-capped line, as used for freehand strokes.
    pub fn round(width: f64) -> Self {
        Self {
            width,
            dash: Vec::new(),
            round: true,
        }
    }

    pub fn for_border(style: BorderStyle, width: f64) -> Self {
        let dash = match style {
            BorderStyle::Solid => Vec::new(),
            BorderStyle::Dashed => vec![width * 3.0, width * 2.0],
            BorderStyle::Dotted => vec![width, width * 1.5],
        };
        Self {
            width,
            dash,
            round: style == BorderStyle::Dotted,
        }
    }
}

/// A raster drawing target.
///
/// Pixel buffers crossing this interface are straight (non-premultiplied)
/// RGBA8. Drawing an empty path is a no-op.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) -> SurfaceResult<()>;

    fn stroke_path(&mut self, path: &BezPath, paint: &Paint, style: &StrokeStyle) -> SurfaceResult<()>;

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> SurfaceResult<()> {
        self.fill_path(&rect.to_path(0.1), paint)
    }

    /// Draw `image` scaled into `dest`, optionally masked by `clip`.
    fn draw_image(&mut self, image: &RasterImage, dest: Rect, clip: Option<&BezPath>) -> SurfaceResult<()>;

    /// Copy out the whole surface.
    fn read_pixels(&self) -> RasterImage;

    /// Replace the whole surface with `image` in one write.
    fn put_pixels(&mut self, image: &RasterImage) -> SurfaceResult<()>;

    /// The full surface rectangle.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }
}
