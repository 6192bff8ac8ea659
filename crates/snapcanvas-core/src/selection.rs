//! Selection, placement and the drag/resize handle system.

use crate::commands::ReplaceShapes;
use crate::panel::PanelId;
use crate::scene::Scene;
use crate::shapes::{MIN_SHAPE_SIZE, Shape, ShapeId, ShapeKind};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in panel units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Default extent of a placed shape.
pub const DEFAULT_PLACEMENT_SIZE: Size = Size::new(100.0, 100.0);

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// The corner point of `bounds`.
    pub fn of(self, bounds: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
            Corner::TopRight => Point::new(bounds.x1, bounds.y0),
            Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
        }
    }
}

/// A corner handle and its hit zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub corner: Corner,
    pub position: Point,
    pub size: f64,
}

impl Handle {
    /// The square hit zone centered on the corner.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, Size::new(self.size, self.size))
    }

    pub fn hit_test(&self, point: Point) -> bool {
        let r = self.rect();
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }
}

/// The four corner handles of `bounds`.
pub fn corner_handles(bounds: Rect, size: f64) -> [Handle; 4] {
    Corner::ALL.map(|corner| Handle {
        corner,
        position: corner.of(bounds),
        size,
    })
}

/// Find which corner handle of `shape` (if any) is hit at `point`.
pub fn hit_test_handles(shape: &Shape, point: Point, size: f64) -> Option<Corner> {
    corner_handles(shape.bounds(), size)
        .into_iter()
        .find(|h| h.hit_test(point))
        .map(|h| h.corner)
}

/// Move `corner` of `original` to `target`, keeping the opposite corner fixed.
///
/// The moving edge is clamped so width and height never drop below
/// `min_size`; the rectangle can never invert.
pub fn resize_rect(original: Rect, corner: Corner, target: Point, min_size: f64) -> Rect {
    let Rect { x0, y0, x1, y1 } = original;
    let left = || target.x.min(x1 - min_size);
    let right = || target.x.max(x0 + min_size);
    let top = || target.y.min(y1 - min_size);
    let bottom = || target.y.max(y0 + min_size);
    match corner {
        Corner::TopLeft => Rect::new(left(), top(), x1, y1),
        Corner::TopRight => Rect::new(x0, top(), right(), y1),
        Corner::BottomLeft => Rect::new(left(), y0, x1, bottom()),
        Corner::BottomRight => Rect::new(x0, y0, right(), bottom()),
    }
}

/// State of an active drag or resize of a single shape.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The shape being manipulated.
    pub shape_id: ShapeId,
    /// The handle being dragged (None = moving the whole shape).
    pub handle: Option<Corner>,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Pointer position relative to the grabbed corner at gesture start.
    pub offset: Vec2,
    /// Shape as it was at gesture start.
    pub original_shape: Shape,
}

impl ManipulationState {
    pub fn new(shape: &Shape, handle: Option<Corner>, start_point: Point) -> Self {
        let offset = handle.map_or(Vec2::ZERO, |c| start_point - c.of(shape.bounds()));
        Self {
            shape_id: shape.id,
            handle,
            start_point,
            current_point: start_point,
            offset,
            original_shape: shape.clone(),
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// The shape as it should look at the current pointer position.
    pub fn apply(&self, min_size: f64) -> Shape {
        let mut shape = self.original_shape.clone();
        match self.handle {
            None => shape.translate(self.delta()),
            Some(corner) => {
                let target = self.current_point - self.offset;
                shape.set_bounds(resize_rect(self.original_shape.bounds(), corner, target, min_size));
            }
        }
        shape
    }
}

/// `Idle ⇄ Dragging` / `Idle ⇄ Resizing` for one panel at a time.
#[derive(Debug, Clone, Default)]
pub enum ShapeGesture {
    #[default]
    Idle,
    Manipulating {
        panel: PanelId,
        state: ManipulationState,
        /// Shape list when the gesture began, for the single undo entry.
        before: Vec<Shape>,
    },
}

/// Select/place/drag/resize controller.
///
/// Drag and resize mutate the scene live; one `ReplaceShapes` command covering
/// the whole gesture is produced at pointer-up.
#[derive(Debug, Clone)]
pub struct ShapeController {
    gesture: ShapeGesture,
    pub handle_size: f64,
    pub min_size: f64,
    pub placement_size: Size,
}

impl Default for ShapeController {
    fn default() -> Self {
        Self {
            gesture: ShapeGesture::Idle,
            handle_size: HANDLE_SIZE,
            min_size: MIN_SHAPE_SIZE,
            placement_size: DEFAULT_PLACEMENT_SIZE,
        }
    }
}

impl ShapeController {
    pub fn new(handle_size: f64, min_size: f64, placement_size: Size) -> Self {
        Self {
            gesture: ShapeGesture::Idle,
            handle_size,
            min_size,
            placement_size,
        }
    }

    pub fn gesture(&self) -> &ShapeGesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, ShapeGesture::Idle)
    }

    /// Create a shape of `kind` centered on `point` and select it.
    ///
    /// A pending uploaded image is consumed and attached to the new shape.
    pub fn place(&self, scene: &mut Scene, panel: &PanelId, kind: ShapeKind, point: Point) -> ReplaceShapes {
        let before = scene.shapes.clone();
        let size = self.placement_size;
        let rect = Rect::from_origin_size(
            Point::new(point.x - size.width / 2.0, point.y - size.height / 2.0),
            size,
        );
        let mut shape = Shape::new(kind, rect, panel.clone()).with_z_index(scene.next_z_index());
        shape.image = scene.uploaded_image.take();
        shape.selected = true;

        let mut after: Vec<Shape> = before
            .iter()
            .cloned()
            .map(|mut s| {
                s.selected = false;
                s
            })
            .collect();
        log::debug!("place {} at ({}, {})", shape.kind, shape.x, shape.y);
        after.push(shape);
        ReplaceShapes::new("place shape", before, after)
    }

    /// Pointer down with the select tool and nothing armed.
    ///
    /// A handle of the selected shape starts a resize; otherwise the topmost
    /// shape under the pointer becomes the only selection and starts a drag.
    /// Empty space clears the selection.
    pub fn pointer_down(&mut self, scene: &mut Scene, panel: &PanelId, point: Point) {
        self.gesture = ShapeGesture::Idle;

        let resize = scene
            .selected_shape()
            .filter(|s| &s.panel_id == panel)
            .and_then(|s| hit_test_handles(s, point, self.handle_size).map(|c| (s.clone(), c)));
        if let Some((shape, corner)) = resize {
            self.gesture = ShapeGesture::Manipulating {
                panel: panel.clone(),
                state: ManipulationState::new(&shape, Some(corner), point),
                before: scene.shapes.clone(),
            };
            return;
        }

        let hit = scene.shape_at(panel, point).cloned();
        scene.select_only(hit.as_ref().map(|s| s.id));
        if let Some(mut shape) = hit {
            shape.selected = true;
            self.gesture = ShapeGesture::Manipulating {
                panel: panel.clone(),
                state: ManipulationState::new(&shape, None, point),
                before: scene.shapes.clone(),
            };
        }
    }

    /// Update the live drag/resize. Returns true when the scene changed.
    pub fn pointer_move(&mut self, scene: &mut Scene, panel: &PanelId, point: Point) -> bool {
        let ShapeGesture::Manipulating { panel: active, state, .. } = &mut self.gesture else {
            return false;
        };
        if active != panel {
            return false;
        }
        state.current_point = point;
        let updated = state.apply(self.min_size);
        match scene.shape_mut(state.shape_id) {
            Some(shape) => {
                *shape = updated;
                true
            }
            None => false,
        }
    }

    /// End the gesture, producing one command if the shapes changed.
    pub fn pointer_up(&mut self, scene: &Scene) -> Option<ReplaceShapes> {
        let ShapeGesture::Manipulating { state, before, .. } = std::mem::take(&mut self.gesture) else {
            return None;
        };
        let label = if state.handle.is_some() { "resize shape" } else { "move shape" };
        let command = ReplaceShapes::new(label, before, scene.shapes.clone());
        (!command.is_noop()).then_some(command)
    }

    /// Abandon the gesture, restoring the shapes it changed.
    pub fn cancel(&mut self, scene: &mut Scene) {
        if let ShapeGesture::Manipulating { before, .. } = std::mem::take(&mut self.gesture) {
            scene.shapes = before;
        }
    }
}
