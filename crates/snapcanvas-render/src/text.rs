//! Painting laid-out text into a shape's box.

use crate::surface::{Paint, StrokeStyle, Surface, SurfaceResult};
use kurbo::{Affine, BezPath, Point, Rect, Shape as _, Vec2};
use snapcanvas_core::text::{FontFeatures, TextLayout, TextMeasure, layout_text};

/// Paints the glyphs of one laid-out line.
pub trait GlyphPainter: Send + Sync {
    /// Paint `text` with its line box's top-left at `origin`.
    fn paint_line(
        &self,
        surface: &mut dyn Surface,
        text: &str,
        origin: Point,
        font: &FontFeatures,
        measure: &dyn TextMeasure,
        paint: &Paint,
    ) -> SurfaceResult<()>;
}

/// Draws every visible character as a solid block the size of its advance.
///
/// There is no font rasterizer in the pipeline; this keeps line extents,
/// alignment, color and decorations faithful without real glyph outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGlyphs;

impl GlyphPainter for BlockGlyphs {
    fn paint_line(
        &self,
        surface: &mut dyn Surface,
        text: &str,
        origin: Point,
        font: &FontFeatures,
        measure: &dyn TextMeasure,
        paint: &Paint,
    ) -> SurfaceResult<()> {
        let size = font.font_size;
        let glyph_top = origin.y + size * 0.3;
        let glyph_height = size * 0.7;
        let mut path = BezPath::new();
        let mut x = origin.x;
        for c in text.chars() {
            let advance = measure.char_width(c, font);
            if !c.is_whitespace() {
                let block = Rect::new(x + advance * 0.1, glyph_top, x + advance * 0.9, glyph_top + glyph_height);
                path.extend(block.path_elements(0.1));
            }
            x += advance;
        }
        if font.font_styles.italic {
            // Shear around the baseline.
            let baseline = glyph_top + glyph_height;
            path.apply_affine(
                Affine::translate(Vec2::new(0.0, baseline))
                    * Affine::skew(-0.2, 0.0)
                    * Affine::translate(Vec2::new(0.0, -baseline)),
            );
        }
        surface.fill_path(&path, paint)
    }
}

/// Where to put the caret, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caret {
    Hidden,
    Visible,
}

/// Lay out and paint `text` inside `rect`.
///
/// Underline and strikethrough are stroked per line, sized to the line's
/// measured width. Returns the layout used.
pub fn paint_text(
    surface: &mut dyn Surface,
    rect: Rect,
    text: &str,
    font: &FontFeatures,
    measure: &dyn TextMeasure,
    glyphs: &dyn GlyphPainter,
    caret: Caret,
) -> SurfaceResult<TextLayout> {
    let layout = layout_text(text, font, rect.width(), measure);
    let paint = Paint::from_fill(&font.text_color, rect);
    let decoration = StrokeStyle::solid((font.font_size / 16.0).max(1.0));

    for line in &layout.lines {
        let origin = Point::new(rect.x0 + line.x, rect.y0 + line.y);
        glyphs.paint_line(surface, &line.text, origin, font, measure, &paint)?;

        let styles = font.font_styles;
        for (enabled, offset) in [(styles.underline, 1.05), (styles.strikethrough, 0.65)] {
            if enabled && line.width > 0.0 {
                let y = origin.y + font.font_size * offset;
                let mut segment = BezPath::new();
                segment.move_to((origin.x, y));
                segment.line_to((origin.x + line.width, y));
                surface.stroke_path(&segment, &paint, &decoration)?;
            }
        }
    }

    if caret == Caret::Visible {
        let (cx, cy) = layout.caret();
        let x = rect.x0 + cx + 1.0;
        let mut bar = BezPath::new();
        bar.move_to((x, rect.y0 + cy));
        bar.line_to((x, rect.y0 + cy + layout.line_height));
        surface.stroke_path(&bar, &Paint::solid(font.text_color.primary()), &StrokeStyle::solid(1.0))?;
    }

    Ok(layout)
}
