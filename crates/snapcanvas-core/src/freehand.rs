//! Freehand strokes and the pencil/eraser capture state machine.

use crate::color::Color;
use crate::geometry::{bounding_box, distance};
use crate::panel::PanelId;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// Minimum distance between consecutive recorded points.
pub const MIN_SAMPLE_DISTANCE: f64 = 1.0;

/// Which freehand tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pencil,
    Eraser,
}

/// One continuous freehand stroke in panel-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    pub points: Vec<Point>,
    pub tool: StrokeTool,
    /// Stroke color; only pencil strokes carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub size: f64,
}

impl DrawingPath {
    pub fn pencil(start: Point, color: Color, size: f64) -> Self {
        Self {
            points: vec![start],
            tool: StrokeTool::Pencil,
            color: Some(color),
            size,
        }
    }

    pub fn eraser(start: Point, size: f64) -> Self {
        Self {
            points: vec![start],
            tool: StrokeTool::Eraser,
            color: None,
            size,
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == StrokeTool::Eraser
    }

    /// Whether the path has enough points to be stroked as a poly-line.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Bounding box of the sampled points, not inflated by stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        bounding_box(&self.points)
    }

    /// Bounding box grown by half the stroke width on every side.
    pub fn stroke_bounds(&self) -> Option<Rect> {
        self.bounds().map(|r| r.inflate(self.size / 2.0, self.size / 2.0))
    }

    /// The stroke as one continuous poly-line.
    pub fn to_path(&self) -> BezPath {
        polyline(&self.points)
    }
}

/// Build a poly-line through `points`.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// Pencil/eraser lifecycle: `Idle → Drawing → Idle`.
#[derive(Debug, Clone, Default)]
pub enum StrokeCapture {
    #[default]
    Idle,
    Drawing { panel: PanelId, path: DrawingPath },
}

impl StrokeCapture {
    /// Start capturing `path` on `panel`. Any abandoned stroke is dropped.
    pub fn begin(&mut self, panel: PanelId, path: DrawingPath) {
        *self = StrokeCapture::Drawing { panel, path };
    }

    /// Record `point` if it is at least `min_distance` from the last recorded
    /// point.
    ///
    /// Returns the segment to paint for live feedback when a point was added.
    pub fn extend(&mut self, panel: &PanelId, point: Point, min_distance: f64) -> Option<(Point, Point)> {
        let StrokeCapture::Drawing { panel: active, path } = self else {
            return None;
        };
        if active != panel {
            return None;
        }
        let last = *path.points.last()?;
        if distance(last, point) < min_distance {
            return None;
        }
        path.points.push(point);
        Some((last, point))
    }

    /// Finish the stroke, returning it with its panel.
    pub fn finish(&mut self) -> Option<(PanelId, DrawingPath)> {
        match std::mem::take(self) {
            StrokeCapture::Drawing { panel, path } => Some((panel, path)),
            StrokeCapture::Idle => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, StrokeCapture::Drawing { .. })
    }

    /// The in-progress path, if any.
    pub fn current(&self) -> Option<(&PanelId, &DrawingPath)> {
        match self {
            StrokeCapture::Drawing { panel, path } => Some((panel, path)),
            StrokeCapture::Idle => None,
        }
    }
}
