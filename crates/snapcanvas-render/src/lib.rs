//! SnapCanvas Render Library
//!
//! Raster surfaces and everything that turns a `Scene` into pixels: the
//! shape registry, the per-panel compositor, flood fill, eraser baking and
//! export. The `Editor` ties these to the core controllers.

pub mod builtin;
pub mod compositor;
pub mod editor;
pub mod export;
pub mod fill;
pub mod pixmap;
pub mod rasterize;
pub mod registry;
pub mod surface;
pub mod text;

pub use compositor::{Compositor, RenderOptions};
pub use editor::{EditError, EditResult, Editor};
pub use export::{ExportError, ExportResult, render_composite, render_panel_image, surface_png};
pub use fill::{FillOutcome, flood_fill};
pub use pixmap::PixmapSurface;
pub use rasterize::bake_eraser;
pub use registry::{DrawFn, ShapeDrawArgs, ShapeRegistry};
pub use surface::{Blend, Brush, Paint, StrokeStyle, Surface, SurfaceError, SurfaceResult};
pub use text::{BlockGlyphs, Caret, GlyphPainter, paint_text};
