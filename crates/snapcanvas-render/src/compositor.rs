//! Per-panel compositing in a fixed layer order.

use crate::registry::{ShapeDrawArgs, ShapeRegistry};
use crate::surface::{Paint, StrokeStyle, Surface, SurfaceResult};
use crate::text::{BlockGlyphs, Caret, GlyphPainter, paint_text};
use kurbo::{Rect, Shape as _};
use snapcanvas_core::color::Color;
use snapcanvas_core::panel::PanelId;
use snapcanvas_core::scene::Scene;
use snapcanvas_core::selection::{HANDLE_SIZE, corner_handles};
use snapcanvas_core::shapes::{Shape, ShapeId};
use snapcanvas_core::text::{ApproxMeasure, TextMeasure};

/// Per-pass rendering options.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Selection box and handle color.
    pub selection_color: Color,
    pub handle_size: f64,
    /// Whether to draw selection chrome at all.
    pub chrome: bool,
    /// Shape being text-edited and its live buffer.
    pub editing: Option<(ShapeId, &'a str)>,
    pub caret_visible: bool,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            selection_color: Color::rgb(59, 130, 246),
            handle_size: HANDLE_SIZE,
            chrome: true,
            editing: None,
            caret_visible: false,
        }
    }
}

impl<'a> RenderOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_handle_size(mut self, size: f64) -> Self {
        self.handle_size = size;
        self
    }

    /// Skip selection chrome, for captures that must not include it.
    pub fn without_chrome(mut self) -> Self {
        self.chrome = false;
        self
    }

    /// Render `id` from `buffer` instead of its stored text.
    pub fn with_editing(mut self, id: ShapeId, buffer: &'a str) -> Self {
        self.editing = Some((id, buffer));
        self
    }

    pub fn with_caret_visible(mut self, visible: bool) -> Self {
        self.caret_visible = visible;
        self
    }
}

/// Shape registry plus the text painters, shared by the panel compositor and
/// the eraser baker.
pub struct Compositor {
    pub registry: ShapeRegistry,
    measure: Box<dyn TextMeasure + Send + Sync>,
    glyphs: Box<dyn GlyphPainter>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor").field("registry", &self.registry).finish_non_exhaustive()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(ShapeRegistry::with_builtins())
    }
}

impl Compositor {
    pub fn new(registry: ShapeRegistry) -> Self {
        Self {
            registry,
            measure: Box::new(ApproxMeasure),
            glyphs: Box::new(BlockGlyphs),
        }
    }

    pub fn with_measure(mut self, measure: impl TextMeasure + Send + Sync + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn with_glyphs(mut self, glyphs: impl GlyphPainter + 'static) -> Self {
        self.glyphs = Box::new(glyphs);
        self
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    /// Draw one shape's content into `rect`.
    ///
    /// A rasterized shape is just its baked raster. Text shapes get their
    /// text (or `text_override`) painted over the registry drawing. Returns
    /// `Ok(false)` when nothing could be drawn for the shape's kind.
    pub fn draw_shape(
        &self,
        surface: &mut dyn Surface,
        shape: &Shape,
        rect: Rect,
        text_override: Option<&str>,
        caret: Caret,
    ) -> SurfaceResult<bool> {
        if shape.rasterized {
            if let Some(raster) = shape.raster() {
                surface.draw_image(raster, rect, None)?;
                return Ok(true);
            }
        }

        let mut drawn = self
            .registry
            .draw(&shape.kind, surface, &ShapeDrawArgs::for_shape(shape, rect))?;
        if shape.is_text() {
            let text = text_override.unwrap_or_else(|| shape.text_str());
            let font = shape.text.as_ref().map(|t| t.font.clone()).unwrap_or_default();
            paint_text(surface, rect, text, &font, self.measure(), self.glyphs.as_ref(), caret)?;
            drawn = true;
        }
        Ok(drawn)
    }

    /// Repaint `panel` from `scene`.
    ///
    /// Layers, bottom to top: background, flood-fill patch, freehand paths,
    /// shapes in list order, selection chrome.
    pub fn render_panel(
        &self,
        surface: &mut dyn Surface,
        scene: &Scene,
        panel: &PanelId,
        options: &RenderOptions<'_>,
    ) -> SurfaceResult<()> {
        surface.clear();
        let bounds = surface.bounds();

        surface.fill_rect(bounds, &Paint::from_fill(&scene.background(panel), bounds))?;

        if let Some(patch) = scene.filled_image(panel) {
            if (patch.raster.width(), patch.raster.height()) == (surface.width(), surface.height()) {
                surface.put_pixels(&patch.raster)?;
            } else {
                log::debug!("panel {panel}: fill patch size differs from surface, scaling");
                surface.draw_image(&patch.raster, bounds, None)?;
            }
        }

        for path in scene.drawings_on(panel).iter().filter(|p| p.is_drawable()) {
            let paint = if path.is_eraser() {
                Paint::eraser()
            } else {
                Paint::solid(path.color.unwrap_or(Color::BLACK))
            };
            surface.stroke_path(&path.to_path(), &paint, &StrokeStyle::round(path.size))?;
        }

        for shape in scene.shapes_on(panel) {
            let editing = options.editing.filter(|(id, _)| *id == shape.id);
            let caret = if editing.is_some() && options.caret_visible {
                Caret::Visible
            } else {
                Caret::Hidden
            };
            match self.draw_shape(surface, shape, shape.bounds(), editing.map(|(_, text)| text), caret) {
                Ok(true) => {}
                Ok(false) => log::trace!("skipping shape {} of unknown kind {}", shape.id, shape.kind),
                Err(e) => log::warn!("shape {} failed to draw: {e}", shape.id),
            }
        }

        if options.chrome {
            if let Some(selected) = scene.selected_shape().filter(|s| &s.panel_id == panel) {
                self.draw_selection(surface, selected.bounds(), options)?;
            }
        }
        Ok(())
    }

    fn draw_selection(&self, surface: &mut dyn Surface, bounds: Rect, options: &RenderOptions<'_>) -> SurfaceResult<()> {
        let outline = Paint::solid(options.selection_color);
        surface.stroke_path(&bounds.to_path(0.1), &outline, &StrokeStyle::solid(1.0))?;
        for handle in corner_handles(bounds, options.handle_size) {
            let rect = handle.rect();
            surface.fill_rect(rect, &Paint::solid(Color::WHITE))?;
            surface.stroke_path(&rect.to_path(0.1), &outline, &StrokeStyle::solid(1.0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::PixmapSurface;
    use kurbo::Point;
    use snapcanvas_core::color::Fill;
    use snapcanvas_core::freehand::DrawingPath;
    use snapcanvas_core::raster::RasterImage;
    use snapcanvas_core::scene::FilledImage;
    use snapcanvas_core::shapes::ShapeKind;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn render(scene: &Scene, options: &RenderOptions<'_>) -> PixmapSurface {
        let mut surface = PixmapSurface::new(100, 100).unwrap();
        Compositor::default()
            .render_panel(&mut surface, scene, &PanelId::default(), options)
            .unwrap();
        surface
    }

    fn square(x: f64, y: f64, color: Color) -> Shape {
        Shape::new(ShapeKind::Rectangle, Rect::new(x, y, x + 40.0, y + 40.0), PanelId::default()).with_fill(color)
    }

    #[test]
    fn test_background_fills_surface() {
        let mut scene = Scene::new();
        scene.backgrounds.insert(PanelId::default(), Fill::solid(BLUE));
        let surface = render(&scene, &RenderOptions::new());
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(99, 99), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_list_order_is_paint_order() {
        let mut scene = Scene::new();
        scene.add_shape(square(10.0, 10.0, RED).with_z_index(5));
        scene.add_shape(square(30.0, 30.0, BLUE).with_z_index(0));
        let surface = render(&scene, &RenderOptions::new());
        // Overlap shows the later shape even though its z-index is lower.
        assert_eq!(surface.pixel(40, 40), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(15, 15), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_shapes_over_strokes_over_patch() {
        let mut scene = Scene::new();
        scene
            .filled_images
            .insert(PanelId::default(), FilledImage::new(RasterImage::filled(100, 100, Color::rgb(0, 255, 0))));
        let mut stroke = DrawingPath::pencil(Point::new(0.0, 50.0), BLUE, 6.0);
        stroke.points.push(Point::new(100.0, 50.0));
        scene.drawings.entry(PanelId::default()).or_default().push(stroke);
        scene.add_shape(square(40.0, 30.0, RED));

        let surface = render(&scene, &RenderOptions::new());
        assert_eq!(surface.pixel(5, 5), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(5, 50), Some([0, 0, 255, 255]));
        assert_eq!(surface.pixel(60, 50), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_single_point_path_is_skipped() {
        let mut scene = Scene::new();
        scene
            .drawings
            .entry(PanelId::default())
            .or_default()
            .push(DrawingPath::pencil(Point::new(50.0, 50.0), BLUE, 20.0));
        let surface = render(&scene, &RenderOptions::new());
        assert_eq!(surface.pixel(50, 50), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_eraser_path_clears_lower_layers() {
        let mut scene = Scene::new();
        let mut erase = DrawingPath::eraser(Point::new(0.0, 50.0), 10.0);
        erase.points.push(Point::new(100.0, 50.0));
        scene.drawings.entry(PanelId::default()).or_default().push(erase);
        let surface = render(&scene, &RenderOptions::new());
        assert_eq!(surface.pixel(50, 50).map(|p| p[3]), Some(0));
        assert_eq!(surface.pixel(50, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_unknown_kind_and_other_panel_skipped() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::new(
            ShapeKind::from("Hologram"),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            PanelId::default(),
        ));
        scene.add_shape(Shape::new(ShapeKind::Rectangle, Rect::new(0.0, 0.0, 100.0, 100.0), PanelId::numbered(2)));
        let surface = render(&scene, &RenderOptions::new());
        assert_eq!(surface.pixel(50, 50), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_selection_chrome() {
        let mut scene = Scene::new();
        let mut shape = square(20.0, 20.0, RED);
        shape.selected = true;
        scene.add_shape(shape);

        let with = render(&scene, &RenderOptions::new().with_selection_color(BLUE));
        // Handle interior at the top-left corner is white.
        assert_eq!(with.pixel(20, 20), Some([255, 255, 255, 255]));
        assert!(with.pixel(40, 20).is_some_and(|p| p[2] > 100));

        let without = render(&scene, &RenderOptions::new().without_chrome());
        assert_eq!(without.pixel(20, 20), Some([255, 0, 0, 255]));
    }
}
