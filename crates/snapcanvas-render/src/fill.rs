//! Bounded 4-connected flood fill over a straight RGBA buffer.

use kurbo::Point;
use snapcanvas_core::color::Color;
use snapcanvas_core::raster::RasterImage;

/// Result of a flood fill.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// The whole buffer with the region repainted.
    pub image: RasterImage,
    /// Pixels painted.
    pub filled: usize,
    /// Whether the fill stopped at the pixel cap, leaving the region partly
    /// painted.
    pub capped: bool,
}

/// Repaint the region of exactly-matching pixels connected to `at` with
/// `color`, painting at most `cap` pixels.
///
/// Returns `None` when `at` is outside the image or the pixel there already
/// has `color`.
pub fn flood_fill(source: &RasterImage, at: Point, color: Color, cap: usize) -> Option<FillOutcome> {
    let (width, height) = (source.width() as usize, source.height() as usize);
    if !(at.x >= 0.0 && at.y >= 0.0) {
        return None;
    }
    let (sx, sy) = (at.x.floor() as usize, at.y.floor() as usize);
    if sx >= width || sy >= height {
        return None;
    }

    let replacement = color.to_rgba();
    let target = source.pixel(sx as u32, sy as u32)?;
    if target == replacement {
        return None;
    }

    let mut image = source.clone();
    let mut visited = vec![false; width * height];
    let mut stack = vec![(sx, sy)];
    let mut filled = 0;
    let mut capped = false;

    while let Some((x, y)) = stack.pop() {
        let index = y * width + x;
        if visited[index] {
            continue;
        }
        visited[index] = true;

        let offset = index * 4;
        let pixels = image.pixels_mut();
        if pixels[offset..offset + 4] != target {
            continue;
        }
        pixels[offset..offset + 4].copy_from_slice(&replacement);
        filled += 1;
        if filled >= cap {
            capped = true;
            break;
        }

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    if capped {
        log::warn!("flood fill stopped at the {cap} pixel cap");
    }
    Some(FillOutcome { image, filled, capped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapcanvas_core::config::DEFAULT_FILL_PIXEL_CAP;

    const RED: Color = Color::rgb(255, 0, 0);

    /// 10x10 white with a black vertical wall at x = 5.
    fn walled() -> RasterImage {
        let mut image = RasterImage::filled(10, 10, Color::WHITE);
        for y in 0..10 {
            image.set_pixel(5, y, [0, 0, 0, 255]);
        }
        image
    }

    #[test]
    fn test_fill_stops_at_boundary() {
        let outcome = flood_fill(&walled(), Point::new(1.0, 1.0), RED, DEFAULT_FILL_PIXEL_CAP).unwrap();
        assert_eq!(outcome.filled, 50);
        assert!(!outcome.capped);
        assert_eq!(outcome.image.pixel(4, 9), Some([255, 0, 0, 255]));
        assert_eq!(outcome.image.pixel(5, 0), Some([0, 0, 0, 255]));
        assert_eq!(outcome.image.pixel(6, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_same_color_is_noop() {
        let image = walled();
        assert!(flood_fill(&image, Point::new(1.0, 1.0), Color::WHITE, DEFAULT_FILL_PIXEL_CAP).is_none());
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let image = walled();
        assert!(flood_fill(&image, Point::new(-1.0, 3.0), RED, DEFAULT_FILL_PIXEL_CAP).is_none());
        assert!(flood_fill(&image, Point::new(10.0, 3.0), RED, DEFAULT_FILL_PIXEL_CAP).is_none());
        assert!(flood_fill(&image, Point::new(f64::NAN, 3.0), RED, DEFAULT_FILL_PIXEL_CAP).is_none());
    }

    #[test]
    fn test_cap_leaves_partial_fill() {
        let image = RasterImage::filled(20, 20, Color::WHITE);
        let outcome = flood_fill(&image, Point::new(0.0, 0.0), RED, 100).unwrap();
        assert_eq!(outcome.filled, 100);
        assert!(outcome.capped);
        let painted = outcome
            .image
            .pixels()
            .chunks_exact(4)
            .filter(|p| *p == [255, 0, 0, 255])
            .count();
        assert_eq!(painted, 100);
    }

    #[test]
    fn test_diagonal_is_not_connected() {
        let mut image = RasterImage::filled(3, 3, Color::BLACK);
        image.set_pixel(0, 0, [255, 255, 255, 255]);
        image.set_pixel(1, 1, [255, 255, 255, 255]);
        let outcome = flood_fill(&image, Point::new(0.5, 0.5), RED, DEFAULT_FILL_PIXEL_CAP).unwrap();
        assert_eq!(outcome.filled, 1);
        assert_eq!(outcome.image.pixel(1, 1), Some([255, 255, 255, 255]));
    }
}
