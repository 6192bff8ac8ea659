//! Shape registry: maps a shape kind to its draw procedure.

use crate::builtin;
use crate::surface::{Surface, SurfaceResult};
use kurbo::Rect;
use snapcanvas_core::color::Color;
use snapcanvas_core::raster::RasterImage;
use snapcanvas_core::shapes::{Border, Shape, ShapeKind};
use std::collections::HashMap;

/// Everything a draw procedure needs to paint one shape.
#[derive(Debug, Clone, Copy)]
pub struct ShapeDrawArgs<'a> {
    /// Target rectangle on the surface.
    pub rect: Rect,
    pub fill: Option<Color>,
    pub image: Option<&'a RasterImage>,
    pub border: Option<&'a Border>,
}

impl<'a> ShapeDrawArgs<'a> {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            fill: None,
            image: None,
            border: None,
        }
    }

    /// Arguments for `shape` drawn at `rect` (its bounds, or a local box when
    /// baking offscreen).
    pub fn for_shape(shape: &'a Shape, rect: Rect) -> Self {
        Self {
            rect,
            fill: shape.fill_color,
            image: shape.raster(),
            border: shape.border.as_ref(),
        }
    }
}

/// A draw procedure.
pub type DrawFn = fn(&mut dyn Surface, &ShapeDrawArgs<'_>) -> SurfaceResult<()>;

/// Lookup table from kind to draw procedure.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    procedures: HashMap<ShapeKind, DrawFn>,
}

impl std::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.procedures.keys().map(ShapeKind::name).collect();
        kinds.sort_unstable();
        f.debug_struct("ShapeRegistry").field("kinds", &kinds).finish()
    }
}

impl ShapeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register `draw` for `kind`, replacing any previous procedure.
    pub fn register(&mut self, kind: ShapeKind, draw: DrawFn) {
        self.procedures.insert(kind, draw);
    }

    pub fn get(&self, kind: &ShapeKind) -> Option<DrawFn> {
        self.procedures.get(kind).copied()
    }

    pub fn contains(&self, kind: &ShapeKind) -> bool {
        self.procedures.contains_key(kind)
    }

    /// Draw a shape of `kind`. Returns `Ok(false)` without touching the
    /// surface when the kind is not registered.
    pub fn draw(&self, kind: &ShapeKind, surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<bool> {
        match self.get(kind) {
            Some(draw) => {
                draw(surface, args)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::PixmapSurface;

    fn paint_black(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<()> {
        surface.fill_rect(args.rect, &crate::surface::Paint::solid(Color::BLACK))
    }

    #[test]
    fn test_builtins_cover_catalog() {
        let registry = ShapeRegistry::with_builtins();
        for kind in ShapeKind::BUILTIN {
            assert!(registry.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn test_unknown_kind_is_noop() {
        let registry = ShapeRegistry::with_builtins();
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        let drawn = registry
            .draw(
                &ShapeKind::from("Hologram"),
                &mut surface,
                &ShapeDrawArgs::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
            )
            .unwrap();
        assert!(!drawn);
        assert!(surface.read_pixels().pixels().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_register_custom_kind() {
        let mut registry = ShapeRegistry::new();
        let kind = ShapeKind::from("Block");
        registry.register(kind.clone(), paint_black);
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        assert!(registry
            .draw(&kind, &mut surface, &ShapeDrawArgs::new(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap());
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 255]));
    }
}
