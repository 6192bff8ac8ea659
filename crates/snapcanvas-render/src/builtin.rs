//! Built-in shape catalog.
//!
//! Every kind is an outline in the shape's box: the outline is filled with
//! the shape's fill color, an attached image is painted clipped to it, and
//! the border is stroked on top.

use crate::registry::{ShapeDrawArgs, ShapeRegistry};
use crate::surface::{Paint, StrokeStyle, Surface, SurfaceResult};
use kurbo::{Arc, BezPath, Ellipse, Point, Rect, RoundedRect, Shape as _, Vec2};
use snapcanvas_core::color::Color;
use snapcanvas_core::shapes::ShapeKind;
use std::f64::consts::{FRAC_PI_2, PI};

/// Fill used when a shape has no fill color.
pub const DEFAULT_SHAPE_FILL: Color = Color::rgb(210, 214, 220);

/// Stroke color of a `Line` without a fill color.
pub const DEFAULT_LINE_COLOR: Color = Color::BLACK;

const LINE_WIDTH: f64 = 2.0;
const TOLERANCE: f64 = 0.1;

/// Register a draw procedure for every built-in kind.
pub fn register_all(registry: &mut ShapeRegistry) {
    registry.register(ShapeKind::Line, draw_line);
    registry.register(ShapeKind::Image, draw_image);
    registry.register(ShapeKind::Text, draw_text_box);
    for (kind, draw) in OUTLINED {
        registry.register(kind.clone(), *draw);
    }
}

type Outlined = (ShapeKind, crate::registry::DrawFn);

macro_rules! outlined {
    ($($kind:ident => $fn_name:ident),* $(,)?) => {
        $(
            fn $fn_name(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<()> {
                let path = outline(&ShapeKind::$kind, args.rect).unwrap_or_else(|| args.rect.to_path(TOLERANCE));
                paint_outline(surface, args, &path)
            }
        )*
        const OUTLINED: &[Outlined] = &[$((ShapeKind::$kind, $fn_name)),*];
    };
}

outlined! {
    Rectangle => draw_rectangle,
    RoundedRectangle => draw_rounded_rectangle,
    Square => draw_square,
    Ellipse => draw_ellipse,
    Circle => draw_circle,
    Triangle => draw_triangle,
    RightTriangle => draw_right_triangle,
    Diamond => draw_diamond,
    Parallelogram => draw_parallelogram,
    Trapezoid => draw_trapezoid,
    Pentagon => draw_pentagon,
    Hexagon => draw_hexagon,
    Octagon => draw_octagon,
    Star => draw_star,
    Heart => draw_heart,
    Cross => draw_cross,
    ArrowRight => draw_arrow_right,
    ArrowLeft => draw_arrow_left,
    ArrowUp => draw_arrow_up,
    ArrowDown => draw_arrow_down,
    SpeechBubble => draw_speech_bubble,
    Cloud => draw_cloud,
    Cylinder => draw_cylinder,
}

fn paint_outline(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>, path: &BezPath) -> SurfaceResult<()> {
    surface.fill_path(path, &Paint::solid(args.fill.unwrap_or(DEFAULT_SHAPE_FILL)))?;
    if let Some(image) = args.image {
        surface.draw_image(image, args.rect, Some(path))?;
    }
    stroke_border(surface, args, path)
}

fn stroke_border(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>, path: &BezPath) -> SurfaceResult<()> {
    match args.border {
        Some(border) if border.size > 0.0 => surface.stroke_path(
            path,
            &Paint::solid(border.color),
            &StrokeStyle::for_border(border.style, border.size),
        ),
        _ => Ok(()),
    }
}

fn draw_line(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<()> {
    let r = args.rect;
    let mut path = BezPath::new();
    path.move_to((r.x0, r.y0));
    path.line_to((r.x1, r.y1));
    let width = args.border.map_or(LINE_WIDTH, |b| b.size.max(1.0));
    let color = args
        .border
        .map(|b| b.color)
        .or(args.fill)
        .unwrap_or(DEFAULT_LINE_COLOR);
    surface.stroke_path(&path, &Paint::solid(color), &StrokeStyle::round(width))
}

/// An image box. Without a decoded raster a placeholder is painted.
fn draw_image(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<()> {
    let path = args.rect.to_path(TOLERANCE);
    match args.image {
        Some(image) => surface.draw_image(image, args.rect, None)?,
        None => {
            surface.fill_path(&path, &Paint::solid(args.fill.unwrap_or(Color::rgb(240, 240, 240))))?;
            let r = args.rect;
            let mut cross = BezPath::new();
            cross.move_to((r.x0, r.y0));
            cross.line_to((r.x1, r.y1));
            cross.move_to((r.x1, r.y0));
            cross.line_to((r.x0, r.y1));
            surface.stroke_path(&cross, &Paint::solid(Color::rgb(180, 180, 180)), &StrokeStyle::solid(1.0))?;
        }
    }
    stroke_border(surface, args, &path)
}

/// Text boxes only paint their own fill and border; glyphs are the text
/// painter's job.
fn draw_text_box(surface: &mut dyn Surface, args: &ShapeDrawArgs<'_>) -> SurfaceResult<()> {
    let path = args.rect.to_path(TOLERANCE);
    if let Some(fill) = args.fill {
        surface.fill_path(&path, &Paint::solid(fill))?;
    }
    stroke_border(surface, args, &path)
}

/// Map unit-square coordinates into `rect`.
fn at(rect: Rect, u: f64, v: f64) -> Point {
    Point::new(rect.x0 + u * rect.width(), rect.y0 + v * rect.height())
}

fn polygon(rect: Rect, points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((&(u, v), rest)) = points.split_first() {
        path.move_to(at(rect, u, v));
        for &(u, v) in rest {
            path.line_to(at(rect, u, v));
        }
        path.close_path();
    }
    path
}

/// Regular `n`-gon inscribed in the ellipse of `rect`, first vertex at
/// `start` radians.
fn regular(rect: Rect, n: usize, start: f64) -> BezPath {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let a = start + i as f64 * 2.0 * PI / n as f64;
            (0.5 + 0.5 * a.cos(), 0.5 + 0.5 * a.sin())
        })
        .collect();
    polygon(rect, &points)
}

fn star(rect: Rect, spikes: usize, inner: f64) -> BezPath {
    let points: Vec<(f64, f64)> = (0..spikes * 2)
        .map(|i| {
            let a = -FRAC_PI_2 + i as f64 * PI / spikes as f64;
            let r = if i % 2 == 0 { 0.5 } else { 0.5 * inner };
            (0.5 + r * a.cos(), 0.5 + r * a.sin())
        })
        .collect();
    polygon(rect, &points)
}

const ARROW: [(f64, f64); 7] = [
    (0.0, 0.3),
    (0.6, 0.3),
    (0.6, 0.0),
    (1.0, 0.5),
    (0.6, 1.0),
    (0.6, 0.7),
    (0.0, 0.7),
];

fn arrow(rect: Rect, map: fn((f64, f64)) -> (f64, f64)) -> BezPath {
    let points: Vec<(f64, f64)> = ARROW.iter().copied().map(map).collect();
    polygon(rect, &points)
}

fn heart(rect: Rect) -> BezPath {
    let p = |u, v| at(rect, u, v);
    let mut path = BezPath::new();
    path.move_to(p(0.5, 0.3));
    path.curve_to(p(0.5, 0.27), p(0.45, 0.15), p(0.25, 0.15));
    path.curve_to(p(0.0, 0.15), p(0.0, 0.45), p(0.0, 0.45));
    path.curve_to(p(0.0, 0.6), p(0.15, 0.77), p(0.5, 0.95));
    path.curve_to(p(0.85, 0.77), p(1.0, 0.6), p(1.0, 0.45));
    path.curve_to(p(1.0, 0.45), p(1.0, 0.15), p(0.75, 0.15));
    path.curve_to(p(0.6, 0.15), p(0.5, 0.27), p(0.5, 0.3));
    path.close_path();
    path
}

fn speech_bubble(rect: Rect) -> BezPath {
    let body = Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + rect.height() * 0.75);
    let radius = body.width().min(body.height()) * 0.2;
    let mut path = RoundedRect::from_rect(body, radius).to_path(TOLERANCE);
    let tail = polygon(rect, &[(0.2, 0.74), (0.15, 1.0), (0.4, 0.74)]);
    path.extend(tail.elements().iter().copied());
    path
}

fn cloud(rect: Rect) -> BezPath {
    const PUFFS: [(f64, f64, f64); 5] = [
        (0.25, 0.6, 0.22),
        (0.45, 0.4, 0.28),
        (0.7, 0.45, 0.25),
        (0.75, 0.7, 0.2),
        (0.45, 0.72, 0.22),
    ];
    let mut path = BezPath::new();
    for (u, v, r) in PUFFS {
        let ellipse = Ellipse::new(at(rect, u, v), Vec2::new(r * rect.width(), r * rect.height()), 0.0);
        path.extend(ellipse.path_elements(TOLERANCE));
    }
    path
}

fn cylinder(rect: Rect) -> BezPath {
    let ry = rect.height() * 0.12;
    let radii = Vec2::new(rect.width() / 2.0, ry);
    let cx = rect.center().x;
    let (top, bottom) = (rect.y0 + ry, rect.y1 - ry);

    let mut path = BezPath::new();
    path.move_to((rect.x0, top));
    path.line_to((rect.x0, bottom));
    let lower = Arc {
        center: Point::new(cx, bottom),
        radii,
        start_angle: PI,
        sweep_angle: -PI,
        x_rotation: 0.0,
    };
    path.extend(lower.append_iter(TOLERANCE));
    path.line_to((rect.x1, top));
    let upper_back = Arc {
        center: Point::new(cx, top),
        radii,
        start_angle: 0.0,
        sweep_angle: -PI,
        x_rotation: 0.0,
    };
    path.extend(upper_back.append_iter(TOLERANCE));
    path.close_path();

    // Visible rim of the top face.
    path.extend(Ellipse::new(Point::new(cx, top), radii, 0.0).path_elements(TOLERANCE));
    path
}

/// Outline of a built-in kind in `rect`.
pub fn outline(kind: &ShapeKind, rect: Rect) -> Option<BezPath> {
    let path = match kind {
        ShapeKind::Rectangle | ShapeKind::Square | ShapeKind::Image | ShapeKind::Text => rect.to_path(TOLERANCE),
        ShapeKind::RoundedRectangle => {
            RoundedRect::from_rect(rect, rect.width().min(rect.height()) * 0.15).to_path(TOLERANCE)
        }
        ShapeKind::Ellipse | ShapeKind::Circle => Ellipse::from_rect(rect).to_path(TOLERANCE),
        ShapeKind::Triangle => polygon(rect, &[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        ShapeKind::RightTriangle => polygon(rect, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
        ShapeKind::Diamond => polygon(rect, &[(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)]),
        ShapeKind::Parallelogram => polygon(rect, &[(0.25, 0.0), (1.0, 0.0), (0.75, 1.0), (0.0, 1.0)]),
        ShapeKind::Trapezoid => polygon(rect, &[(0.2, 0.0), (0.8, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        ShapeKind::Pentagon => regular(rect, 5, -FRAC_PI_2),
        ShapeKind::Hexagon => regular(rect, 6, 0.0),
        ShapeKind::Octagon => regular(rect, 8, PI / 8.0),
        ShapeKind::Star => star(rect, 5, 0.4),
        ShapeKind::Heart => heart(rect),
        ShapeKind::Cross => {
            const A: f64 = 1.0 / 3.0;
            const B: f64 = 2.0 / 3.0;
            polygon(
                rect,
                &[
                    (A, 0.0),
                    (B, 0.0),
                    (B, A),
                    (1.0, A),
                    (1.0, B),
                    (B, B),
                    (B, 1.0),
                    (A, 1.0),
                    (A, B),
                    (0.0, B),
                    (0.0, A),
                    (A, A),
                ],
            )
        }
        ShapeKind::ArrowRight => arrow(rect, |p| p),
        ShapeKind::ArrowLeft => arrow(rect, |(u, v)| (1.0 - u, v)),
        ShapeKind::ArrowUp => arrow(rect, |(u, v)| (v, 1.0 - u)),
        ShapeKind::ArrowDown => arrow(rect, |(u, v)| (v, u)),
        ShapeKind::Line => {
            let mut path = BezPath::new();
            path.move_to((rect.x0, rect.y0));
            path.line_to((rect.x1, rect.y1));
            path
        }
        ShapeKind::SpeechBubble => speech_bubble(rect),
        ShapeKind::Cloud => cloud(rect),
        ShapeKind::Cylinder => cylinder(rect),
        ShapeKind::Other(_) => return None,
    };
    Some(path)
}
