//! Baking eraser strokes into the pixels of the shapes they cross.
//!
//! An erased shape keeps its hole when it moves: the hole lives in the shape's
//! own raster, not in the panel-fixed stroke.

use crate::builtin::DEFAULT_SHAPE_FILL;
use crate::compositor::Compositor;
use crate::pixmap::PixmapSurface;
use crate::surface::{Paint, StrokeStyle, Surface};
use crate::text::Caret;
use kurbo::{Circle, Rect, Shape as _, Vec2};
use rayon::prelude::*;
use snapcanvas_core::freehand::{DrawingPath, polyline};
use snapcanvas_core::panel::PanelId;
use snapcanvas_core::raster::RasterImage;
use snapcanvas_core::scene::Scene;
use snapcanvas_core::shapes::{Shape, ShapeId, ShapeImage};

/// Bake `eraser` into every shape on `panel` whose bounds it touches.
///
/// Shapes are rendered in parallel and applied together: the returned list
/// is the whole shape list with every touched shape rasterized, or `None`
/// when the stroke touched nothing. A shape that cannot be drawn is baked
/// from a flat rectangle of its fill color instead.
pub fn bake_eraser(compositor: &Compositor, scene: &Scene, panel: &PanelId, eraser: &DrawingPath) -> Option<Vec<Shape>> {
    let region = eraser.stroke_bounds()?;
    let touched = scene.shapes_intersecting(panel, region);
    if touched.is_empty() {
        return None;
    }

    let baked: Vec<(ShapeId, ShapeImage)> = touched
        .par_iter()
        .filter_map(|id| scene.shape(*id))
        .filter_map(|shape| bake_shape(compositor, shape, eraser).map(|image| (shape.id, image)))
        .collect();
    if baked.is_empty() {
        return None;
    }
    log::debug!("eraser baked {} of {} touched shapes", baked.len(), touched.len());

    let mut shapes = scene.shapes.clone();
    for (id, image) in baked {
        if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
            shape.image = Some(image);
            shape.rasterized = true;
        }
    }
    Some(shapes)
}

/// Render `shape` offscreen at its own size and erase along `eraser`.
fn bake_shape(compositor: &Compositor, shape: &Shape, eraser: &DrawingPath) -> Option<ShapeImage> {
    let width = shape.width.ceil().max(1.0) as u32;
    let height = shape.height.ceil().max(1.0) as u32;
    let mut surface = match PixmapSurface::new(width, height) {
        Ok(surface) => surface,
        Err(e) => {
            log::warn!("shape {}: cannot allocate bake surface, baking a flat fill: {e}", shape.id);
            return flat_bake(shape, width, height);
        }
    };
    let local = Rect::new(0.0, 0.0, shape.width, shape.height);

    let drawn = compositor.draw_shape(&mut surface, shape, local, None, Caret::Hidden);
    if !matches!(drawn, Ok(true)) {
        if let Err(e) = &drawn {
            log::warn!("shape {}: draw failed, baking a flat fill: {e}", shape.id);
        } else {
            log::warn!("shape {}: no draw procedure for {}, baking a flat fill", shape.id, shape.kind);
        }
        surface.clear();
        let flat = Paint::solid(shape.fill_color.unwrap_or(DEFAULT_SHAPE_FILL));
        if let Err(e) = surface.fill_rect(local, &flat) {
            log::warn!("shape {}: flat fill failed: {e}", shape.id);
        }
    }

    let offset = Vec2::new(shape.x, shape.y);
    let points: Vec<_> = eraser.points.iter().map(|p| *p - offset).collect();
    let erased = match points.as_slice() {
        [single] => surface.fill_path(&Circle::new(*single, eraser.size / 2.0).to_path(0.1), &Paint::eraser()),
        _ => surface.stroke_path(&polyline(&points), &Paint::eraser(), &StrokeStyle::round(eraser.size)),
    };
    if let Err(e) = erased {
        log::warn!("shape {}: erase failed: {e}", shape.id);
    }

    match ShapeImage::from_raster(surface.read_pixels()) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("shape {}: could not encode baked raster: {e}", shape.id);
            None
        }
    }
}

/// The shape as a plain rectangle of its fill color, without the stroke.
fn flat_bake(shape: &Shape, width: u32, height: u32) -> Option<ShapeImage> {
    let raster = RasterImage::filled(width, height, shape.fill_color.unwrap_or(DEFAULT_SHAPE_FILL));
    match ShapeImage::from_raster(raster) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!("shape {}: could not encode flat fill: {e}", shape.id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use snapcanvas_core::color::Color;
    use snapcanvas_core::shapes::ShapeKind;

    fn eraser(from: Point, to: Point, size: f64) -> DrawingPath {
        let mut path = DrawingPath::eraser(from, size);
        path.points.push(to);
        path
    }

    fn red_rect(rect: Rect) -> Shape {
        Shape::new(ShapeKind::Rectangle, rect, PanelId::default()).with_fill(Color::rgb(255, 0, 0))
    }

    #[test]
    fn test_bakes_only_touched_shapes() {
        let mut scene = Scene::new();
        let hit = red_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
        let miss = red_rect(Rect::new(300.0, 300.0, 350.0, 350.0));
        let (hit_id, miss_id) = (hit.id, miss.id);
        scene.add_shape(hit);
        scene.add_shape(miss);

        let stroke = eraser(Point::new(40.0, 50.0), Point::new(60.0, 50.0), 10.0);
        let shapes = bake_eraser(&Compositor::default(), &scene, &PanelId::default(), &stroke).unwrap();

        let hit = shapes.iter().find(|s| s.id == hit_id).unwrap();
        assert!(hit.rasterized);
        let raster = hit.raster().unwrap();
        assert_eq!((raster.width(), raster.height()), (100, 100));
        assert_eq!(raster.pixel(50, 50).map(|p| p[3]), Some(0));
        assert_eq!(raster.pixel(10, 10), Some([255, 0, 0, 255]));

        let miss = shapes.iter().find(|s| s.id == miss_id).unwrap();
        assert!(!miss.rasterized && miss.image.is_none());
    }

    #[test]
    fn test_stroke_in_shape_local_coordinates() {
        let mut scene = Scene::new();
        let shape = red_rect(Rect::new(200.0, 100.0, 260.0, 160.0));
        scene.add_shape(shape);
        let stroke = eraser(Point::new(230.0, 90.0), Point::new(230.0, 170.0), 6.0);
        let shapes = bake_eraser(&Compositor::default(), &scene, &PanelId::default(), &stroke).unwrap();
        let raster = shapes[0].raster().unwrap();
        assert_eq!(raster.pixel(30, 30).map(|p| p[3]), Some(0));
        assert_eq!(raster.pixel(5, 30), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_flat_fill() {
        let mut scene = Scene::new();
        let shape = Shape::new(ShapeKind::from("Hologram"), Rect::new(0.0, 0.0, 40.0, 40.0), PanelId::default())
            .with_fill(Color::rgb(0, 128, 0));
        scene.add_shape(shape);
        let stroke = DrawingPath::eraser(Point::new(0.0, 0.0), 4.0);
        let shapes = bake_eraser(&Compositor::default(), &scene, &PanelId::default(), &stroke).unwrap();
        let raster = shapes[0].raster().unwrap();
        assert_eq!(raster.pixel(30, 30), Some([0, 128, 0, 255]));
        assert_eq!(raster.pixel(0, 0).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_other_panel_untouched() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::new(
            ShapeKind::Rectangle,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            PanelId::numbered(2),
        ));
        let stroke = eraser(Point::new(0.0, 0.0), Point::new(50.0, 50.0), 10.0);
        assert!(bake_eraser(&Compositor::default(), &scene, &PanelId::numbered(1), &stroke).is_none());
    }

    #[test]
    fn test_flat_bake_uses_fill_or_default() {
        let green = Shape::new(ShapeKind::Rectangle, Rect::new(0.0, 0.0, 8.0, 4.0), PanelId::default())
            .with_fill(Color::rgb(0, 128, 0));
        let image = flat_bake(&green, 8, 4).unwrap();
        let raster = image.raster().unwrap();
        assert_eq!((raster.width(), raster.height()), (8, 4));
        assert_eq!(raster.pixel(7, 3), Some([0, 128, 0, 255]));

        let mut plain = green.clone();
        plain.fill_color = None;
        let image = flat_bake(&plain, 2, 2).unwrap();
        let raster = image.raster().unwrap();
        assert_eq!(raster.pixel(0, 0), Some(DEFAULT_SHAPE_FILL.to_rgba()));
    }
}
