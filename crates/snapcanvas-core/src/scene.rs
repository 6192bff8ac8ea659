//! The scene model: the canonical per-document editing state.

use crate::color::Fill;
use crate::freehand::DrawingPath;
use crate::geometry::rects_intersect;
use crate::panel::{PanelId, SplitMode};
use crate::raster::RasterImage;
use crate::shapes::{Shape, ShapeId, ShapeImage};
use kurbo::{Point, Rect};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A full-surface raster patch produced by a flood fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledImage {
    pub raster: Arc<RasterImage>,
}

impl FilledImage {
    pub fn new(raster: RasterImage) -> Self {
        Self {
            raster: Arc::new(raster),
        }
    }
}

/// Per-document state shared by every controller.
///
/// The order of `shapes` is the paint order. Panels own the subset of shapes
/// whose `panel_id` matches, plus their entries in the per-panel maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub drawings: BTreeMap<PanelId, Vec<DrawingPath>>,
    pub filled_images: BTreeMap<PanelId, FilledImage>,
    pub backgrounds: BTreeMap<PanelId, Fill>,
    pub split_mode: SplitMode,
    pub active_panel: PanelId,
    /// Image waiting to be attached by the next placement.
    pub uploaded_image: Option<ShapeImage>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panels that exist under the current split mode.
    pub fn panels(&self) -> Vec<PanelId> {
        self.split_mode.panel_ids()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Append a shape on top of the paint order.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// A z-index above every existing shape.
    pub fn next_z_index(&self) -> i64 {
        self.shapes.iter().map(|s| s.z_index).max().map_or(0, |z| z + 1)
    }

    /// Shapes drawn on `panel`, in paint order.
    pub fn shapes_on(&self, panel: &PanelId) -> impl Iterator<Item = &Shape> + use<'_> {
        let panel = panel.clone();
        self.shapes.iter().filter(move |s| s.panel_id == panel)
    }

    /// Select exactly `id`, or clear the selection when `None`.
    pub fn select_only(&mut self, id: Option<ShapeId>) {
        for shape in &mut self.shapes {
            shape.selected = Some(shape.id) == id;
        }
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.selected)
    }

    pub fn selected_id(&self) -> Option<ShapeId> {
        self.selected_shape().map(|s| s.id)
    }

    /// The shape currently in text edit mode, if any.
    pub fn editing_shape(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.is_editing)
    }

    /// Topmost shape on `panel` containing `point` (last match in list order).
    pub fn shape_at(&self, panel: &PanelId, point: Point) -> Option<&Shape> {
        self.shapes_on(panel).filter(|s| s.contains(point)).last()
    }

    /// First shape on `panel` containing `point`, in document order.
    pub fn first_shape_at(&self, panel: &PanelId, point: Point) -> Option<&Shape> {
        self.shapes_on(panel).find(|s| s.contains(point))
    }

    /// Topmost text shape on `panel` containing `point`.
    pub fn text_shape_at(&self, panel: &PanelId, point: Point) -> Option<&Shape> {
        self.shapes_on(panel)
            .filter(|s| s.is_text() && s.contains(point))
            .last()
    }

    /// Ids of shapes on `panel` whose bounds intersect `region`.
    pub fn shapes_intersecting(&self, panel: &PanelId, region: Rect) -> Vec<ShapeId> {
        self.shapes_on(panel)
            .filter(|s| rects_intersect(s.bounds(), region))
            .map(|s| s.id)
            .collect()
    }

    /// Background of `panel`, white when none is set.
    pub fn background(&self, panel: &PanelId) -> Fill {
        self.backgrounds.get(panel).copied().unwrap_or_default()
    }

    pub fn drawings_on(&self, panel: &PanelId) -> &[DrawingPath] {
        self.drawings.get(panel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filled_image(&self, panel: &PanelId) -> Option<&FilledImage> {
        self.filled_images.get(panel)
    }

    /// Capture the state a split mode change replaces.
    pub fn split_state(&self) -> SplitState {
        SplitState {
            mode: self.split_mode,
            drawings: self.drawings.clone(),
            filled_images: self.filled_images.clone(),
            active_panel: self.active_panel.clone(),
        }
    }

    pub fn restore_split_state(&mut self, state: &SplitState) {
        self.split_mode = state.mode;
        self.drawings = state.drawings.clone();
        self.filled_images = state.filled_images.clone();
        self.active_panel = state.active_panel.clone();
    }

    /// The state after switching to `mode`: paths and fills are discarded and
    /// the first panel of the new layout becomes active. Shapes and
    /// backgrounds are untouched.
    pub fn split_state_for(&self, mode: SplitMode) -> SplitState {
        SplitState {
            mode,
            drawings: BTreeMap::new(),
            filled_images: BTreeMap::new(),
            active_panel: mode.panel_ids().into_iter().next().unwrap_or_default(),
        }
    }
}

/// Everything a split mode change touches.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitState {
    pub mode: SplitMode,
    pub drawings: BTreeMap<PanelId, Vec<DrawingPath>>,
    pub filled_images: BTreeMap<PanelId, FilledImage>,
    pub active_panel: PanelId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shapes::ShapeKind;

    fn rect_shape(x: f64, y: f64, panel: PanelId) -> Shape {
        Shape::new(ShapeKind::Rectangle, Rect::new(x, y, x + 50.0, y + 50.0), panel)
    }

    #[test]
    fn test_shape_at_prefers_last() {
        let mut scene = Scene::new();
        let a = rect_shape(0.0, 0.0, PanelId::default());
        let b = rect_shape(25.0, 25.0, PanelId::default());
        let (a_id, b_id) = (a.id, b.id);
        scene.add_shape(a);
        scene.add_shape(b);

        let panel = PanelId::default();
        assert_eq!(scene.shape_at(&panel, Point::new(30.0, 30.0)).map(|s| s.id), Some(b_id));
        assert_eq!(scene.first_shape_at(&panel, Point::new(30.0, 30.0)).map(|s| s.id), Some(a_id));
        assert!(scene.shape_at(&panel, Point::new(200.0, 200.0)).is_none());
    }

    #[test]
    fn test_hit_testing_is_panel_scoped() {
        let mut scene = Scene::new();
        scene.add_shape(rect_shape(0.0, 0.0, PanelId::numbered(2)));
        assert!(scene.shape_at(&PanelId::numbered(1), Point::new(10.0, 10.0)).is_none());
        assert!(scene.shape_at(&PanelId::numbered(2), Point::new(10.0, 10.0)).is_some());
    }

    #[test]
    fn test_hit_outlives_panel_argument() {
        let mut scene = Scene::new();
        let shape = rect_shape(0.0, 0.0, PanelId::default());
        let id = shape.id;
        scene.add_shape(shape);

        let hit = scene.shape_at(&PanelId::default(), Point::new(10.0, 10.0));
        let listed: Vec<_> = scene.shapes_on(&PanelId::default()).collect();
        assert_eq!(hit.map(|s| s.id), Some(id));
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_select_only() {
        let mut scene = Scene::new();
        let a = rect_shape(0.0, 0.0, PanelId::default());
        let b = rect_shape(100.0, 0.0, PanelId::default());
        let b_id = b.id;
        scene.add_shape(a);
        scene.add_shape(b);

        scene.select_only(Some(b_id));
        assert_eq!(scene.selected_id(), Some(b_id));
        assert_eq!(scene.shapes.iter().filter(|s| s.selected).count(), 1);

        scene.select_only(None);
        assert!(scene.selected_shape().is_none());
    }

    #[test]
    fn test_background_defaults_to_white() {
        let scene = Scene::new();
        assert_eq!(scene.background(&PanelId::default()), Fill::solid(Color::WHITE));
    }

    #[test]
    fn test_split_state_for_resets_paths() {
        let mut scene = Scene::new();
        scene
            .drawings
            .entry(PanelId::default())
            .or_default()
            .push(DrawingPath::pencil(Point::ZERO, Color::BLACK, 2.0));
        let state = scene.split_state_for(SplitMode::TwoWay);
        assert!(state.drawings.is_empty());
        assert_eq!(state.active_panel, PanelId::numbered(1));
    }

    #[test]
    fn test_next_z_index() {
        let mut scene = Scene::new();
        assert_eq!(scene.next_z_index(), 0);
        scene.add_shape(rect_shape(0.0, 0.0, PanelId::default()).with_z_index(7));
        assert_eq!(scene.next_z_index(), 8);
    }
}
