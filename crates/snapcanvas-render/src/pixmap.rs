//! CPU surface backed by a tiny-skia pixmap.

use crate::surface::{Blend, Brush, Paint, StrokeStyle, Surface, SurfaceError, SurfaceResult};
use kurbo::{BezPath, PathEl, Rect};
use snapcanvas_core::color::Color;
use snapcanvas_core::raster::RasterImage;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, GradientStop, IntSize, LineCap, LineJoin, LinearGradient,
    Mask, PathBuilder, Pixmap, PixmapPaint, SpreadMode, Stroke, StrokeDash, Transform,
};

/// A panel or offscreen surface.
#[derive(Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// A surface holding a copy of `image`.
    pub fn from_image(image: &RasterImage) -> SurfaceResult<Self> {
        Ok(Self {
            pixmap: to_pixmap(image)?,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }
}

fn to_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn to_paint(paint: &Paint) -> tiny_skia::Paint<'static> {
    let mut out = tiny_skia::Paint {
        anti_alias: true,
        blend_mode: match paint.blend {
            Blend::SourceOver => BlendMode::SourceOver,
            Blend::DestinationOut => BlendMode::DestinationOut,
        },
        ..Default::default()
    };
    match paint.brush {
        Brush::Solid(c) => out.set_color_rgba8(c.r, c.g, c.b, c.a),
        Brush::LinearGradient { start, end, from, to } => {
            let shader = LinearGradient::new(
                tiny_skia::Point::from_xy(start.x as f32, start.y as f32),
                tiny_skia::Point::from_xy(end.x as f32, end.y as f32),
                vec![GradientStop::new(0.0, to_color(from)), GradientStop::new(1.0, to_color(to))],
                SpreadMode::Pad,
                Transform::identity(),
            );
            match shader {
                Some(shader) => out.shader = shader,
                None => out.set_color(to_color(from)),
            }
        }
    }
    out
}

fn to_stroke(style: &StrokeStyle) -> Stroke {
    let dash = if style.dash.is_empty() {
        None
    } else {
        StrokeDash::new(style.dash.iter().map(|d| *d as f32).collect(), 0.0)
    };
    Stroke {
        width: style.width as f32,
        line_cap: if style.round { LineCap::Round } else { LineCap::Butt },
        line_join: if style.round { LineJoin::Round } else { LineJoin::Miter },
        dash,
        ..Default::default()
    }
}

fn to_pixmap(image: &RasterImage) -> SurfaceResult<Pixmap> {
    let (width, height) = (image.width(), image.height());
    let size = IntSize::from_wh(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
    let mut data = Vec::with_capacity(image.pixels().len());
    for px in image.pixels().chunks_exact(4) {
        let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or(SurfaceError::InvalidSize { width, height })
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) -> SurfaceResult<()> {
        if let Some(path) = to_path(path) {
            self.pixmap
                .fill_path(&path, &to_paint(paint), FillRule::Winding, Transform::identity(), None);
        }
        Ok(())
    }

    fn stroke_path(&mut self, path: &BezPath, paint: &Paint, style: &StrokeStyle) -> SurfaceResult<()> {
        if style.width <= 0.0 {
            return Ok(());
        }
        if let Some(path) = to_path(path) {
            self.pixmap
                .stroke_path(&path, &to_paint(paint), &to_stroke(style), Transform::identity(), None);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> SurfaceResult<()> {
        let rect = rect.abs();
        if let Some(r) =
            tiny_skia::Rect::from_xywh(rect.x0 as f32, rect.y0 as f32, rect.width() as f32, rect.height() as f32)
        {
            self.pixmap.fill_rect(r, &to_paint(paint), Transform::identity(), None);
        }
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect, clip: Option<&BezPath>) -> SurfaceResult<()> {
        if image.is_empty() || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let source = to_pixmap(image)?;
        let sx = dest.width() / f64::from(image.width());
        let sy = dest.height() / f64::from(image.height());
        let unscaled = (sx - 1.0).abs() < 1e-9 && (sy - 1.0).abs() < 1e-9;
        let paint = PixmapPaint {
            quality: if unscaled { FilterQuality::Nearest } else { FilterQuality::Bilinear },
            ..Default::default()
        };
        let transform = Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, dest.x0 as f32, dest.y0 as f32);
        let mask = match clip.and_then(to_path) {
            Some(path) => {
                let (width, height) = (self.width(), self.height());
                let mut mask = Mask::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                Some(mask)
            }
            None => None,
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, mask.as_ref());
        Ok(())
    }

    fn read_pixels(&self) -> RasterImage {
        let mut image = RasterImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().chunks_exact_mut(4).zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    fn put_pixels(&mut self, image: &RasterImage) -> SurfaceResult<()> {
        let expected = (self.width(), self.height());
        let actual = (image.width(), image.height());
        if expected != actual {
            return Err(SurfaceError::SizeMismatch { expected, actual });
        }
        self.pixmap = to_pixmap(image)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Circle, Point, Shape as _};

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(PixmapSurface::new(0, 10), Err(SurfaceError::InvalidSize { .. })));
    }

    #[test]
    fn test_fill_rect_and_read_back() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface
            .fill_rect(Rect::new(5.0, 5.0, 15.0, 15.0), &Paint::solid(Color::rgb(255, 0, 0)))
            .unwrap();
        let pixels = surface.read_pixels();
        assert_eq!(pixels.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(pixels.pixel(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_destination_out_erases() {
        let mut surface = PixmapSurface::new(40, 40).unwrap();
        surface.fill_rect(surface.bounds(), &Paint::solid(Color::rgb(0, 0, 255))).unwrap();
        let dot = Circle::new(Point::new(20.0, 20.0), 6.0).to_path(0.1);
        surface.fill_path(&dot, &Paint::eraser()).unwrap();
        assert_eq!(surface.pixel(20, 20), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_put_pixels_round_trip() {
        let mut image = RasterImage::filled(8, 4, Color::rgb(10, 200, 30));
        image.set_pixel(3, 2, [255, 255, 0, 255]);
        let mut surface = PixmapSurface::new(8, 4).unwrap();
        surface.put_pixels(&image).unwrap();
        assert_eq!(surface.read_pixels(), image);

        let wrong = RasterImage::new(2, 2);
        assert!(matches!(surface.put_pixels(&wrong), Err(SurfaceError::SizeMismatch { .. })));
    }

    #[test]
    fn test_draw_image_translates() {
        let image = RasterImage::filled(4, 4, Color::rgb(0, 255, 0));
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface.draw_image(&image, Rect::new(5.0, 5.0, 9.0, 9.0), None).unwrap();
        assert_eq!(surface.pixel(6, 6), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(2, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_clipped() {
        let image = RasterImage::filled(20, 20, Color::rgb(255, 0, 0));
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        let clip = Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1);
        surface.draw_image(&image, surface.bounds(), Some(&clip)).unwrap();
        assert_eq!(surface.pixel(5, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(15, 10), Some([0, 0, 0, 0]));
    }
}
