//! Snapshot commands for every undoable scene edit.

use crate::color::Fill;
use crate::freehand::DrawingPath;
use crate::history::Command;
use crate::panel::PanelId;
use crate::scene::{FilledImage, Scene, SplitState};
use crate::shapes::Shape;

/// Replace the whole shape list.
///
/// Used for every shape edit: placement, drag, resize, text commits, layer
/// moves, style changes and eraser baking.
#[derive(Debug, Clone)]
pub struct ReplaceShapes {
    label: &'static str,
    before: Vec<Shape>,
    after: Vec<Shape>,
}

impl ReplaceShapes {
    pub fn new(label: &'static str, before: Vec<Shape>, after: Vec<Shape>) -> Self {
        Self { label, before, after }
    }

    /// Whether executing this would change anything.
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

impl Command for ReplaceShapes {
    fn execute(&self, scene: &mut Scene) {
        scene.shapes = self.after.clone();
    }

    fn undo(&self, scene: &mut Scene) {
        scene.shapes = self.before.clone();
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Append a finished freehand stroke to a panel.
///
/// Eraser strokes also carry the shape list before and after baking so the
/// stroke and the rasterized shapes undo together.
#[derive(Debug, Clone)]
pub struct AddStroke {
    panel: PanelId,
    path: DrawingPath,
    shapes: Option<(Vec<Shape>, Vec<Shape>)>,
}

impl AddStroke {
    pub fn new(panel: PanelId, path: DrawingPath) -> Self {
        Self {
            panel,
            path,
            shapes: None,
        }
    }

    pub fn with_shapes(mut self, before: Vec<Shape>, after: Vec<Shape>) -> Self {
        self.shapes = Some((before, after));
        self
    }
}

impl Command for AddStroke {
    fn execute(&self, scene: &mut Scene) {
        scene
            .drawings
            .entry(self.panel.clone())
            .or_default()
            .push(self.path.clone());
        if let Some((_, after)) = &self.shapes {
            scene.shapes = after.clone();
        }
    }

    fn undo(&self, scene: &mut Scene) {
        if let Some(paths) = scene.drawings.get_mut(&self.panel) {
            if paths.last() == Some(&self.path) {
                paths.pop();
            }
            if paths.is_empty() {
                scene.drawings.remove(&self.panel);
            }
        }
        if let Some((before, _)) = &self.shapes {
            scene.shapes = before.clone();
        }
    }

    fn label(&self) -> &'static str {
        if self.path.is_eraser() { "erase" } else { "draw" }
    }
}

/// Replace a panel's flood-fill patch.
#[derive(Debug, Clone)]
pub struct ReplaceFilledImage {
    panel: PanelId,
    before: Option<FilledImage>,
    after: Option<FilledImage>,
}

impl ReplaceFilledImage {
    pub fn new(panel: PanelId, before: Option<FilledImage>, after: Option<FilledImage>) -> Self {
        Self { panel, before, after }
    }

    fn install(scene: &mut Scene, panel: &PanelId, patch: &Option<FilledImage>) {
        match patch {
            Some(patch) => {
                scene.filled_images.insert(panel.clone(), patch.clone());
            }
            None => {
                scene.filled_images.remove(panel);
            }
        }
    }
}

impl Command for ReplaceFilledImage {
    fn execute(&self, scene: &mut Scene) {
        Self::install(scene, &self.panel, &self.after);
    }

    fn undo(&self, scene: &mut Scene) {
        Self::install(scene, &self.panel, &self.before);
    }

    fn label(&self) -> &'static str {
        "flood fill"
    }
}

/// Set a panel background.
#[derive(Debug, Clone)]
pub struct SetBackground {
    panel: PanelId,
    before: Option<Fill>,
    after: Fill,
}

impl SetBackground {
    pub fn new(panel: PanelId, before: Option<Fill>, after: Fill) -> Self {
        Self { panel, before, after }
    }
}

impl Command for SetBackground {
    fn execute(&self, scene: &mut Scene) {
        scene.backgrounds.insert(self.panel.clone(), self.after);
    }

    fn undo(&self, scene: &mut Scene) {
        match self.before {
            Some(fill) => {
                scene.backgrounds.insert(self.panel.clone(), fill);
            }
            None => {
                scene.backgrounds.remove(&self.panel);
            }
        }
    }

    fn label(&self) -> &'static str {
        "set background"
    }
}

/// Switch split mode, discarding per-panel paths and fills.
#[derive(Debug, Clone)]
pub struct ChangeSplitMode {
    before: SplitState,
    after: SplitState,
}

impl ChangeSplitMode {
    pub fn new(before: SplitState, after: SplitState) -> Self {
        Self { before, after }
    }
}

impl Command for ChangeSplitMode {
    fn execute(&self, scene: &mut Scene) {
        scene.restore_split_state(&self.after);
    }

    fn undo(&self, scene: &mut Scene) {
        scene.restore_split_state(&self.before);
    }

    fn label(&self) -> &'static str {
        "change split mode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::history::History;
    use crate::panel::SplitMode;
    use crate::raster::RasterImage;
    use crate::shapes::ShapeKind;
    use kurbo::{Point, Rect};

    #[test]
    fn test_add_stroke_undo_removes_path() {
        let mut scene = Scene::new();
        let mut history = History::new();
        let mut path = DrawingPath::pencil(Point::ZERO, Color::BLACK, 2.0);
        path.points.push(Point::new(10.0, 10.0));

        history.execute_command(&mut scene, Box::new(AddStroke::new(PanelId::default(), path)));
        assert_eq!(scene.drawings_on(&PanelId::default()).len(), 1);

        history.undo(&mut scene);
        assert!(scene.drawings.is_empty());
    }

    #[test]
    fn test_erase_stroke_restores_shapes() {
        let mut scene = Scene::new();
        let shape = Shape::new(ShapeKind::Rectangle, Rect::new(0.0, 0.0, 100.0, 100.0), PanelId::default());
        scene.add_shape(shape);
        let before = scene.shapes.clone();
        let mut after = before.clone();
        after[0].rasterized = true;

        let mut history = History::new();
        let cmd = AddStroke::new(PanelId::default(), DrawingPath::eraser(Point::ZERO, 10.0))
            .with_shapes(before.clone(), after);
        history.execute_command(&mut scene, Box::new(cmd));
        assert!(scene.shapes[0].rasterized);

        history.undo(&mut scene);
        assert_eq!(scene.shapes, before);
    }

    #[test]
    fn test_filled_image_replace_and_undo() {
        let mut scene = Scene::new();
        let mut history = History::new();
        let patch = FilledImage::new(RasterImage::filled(4, 4, Color::rgb(0, 255, 0)));
        history.execute_command(
            &mut scene,
            Box::new(ReplaceFilledImage::new(PanelId::default(), None, Some(patch.clone()))),
        );
        assert_eq!(scene.filled_image(&PanelId::default()), Some(&patch));
        history.undo(&mut scene);
        assert!(scene.filled_images.is_empty());
    }

    #[test]
    fn test_background_undo_restores_absence() {
        let mut scene = Scene::new();
        let mut history = History::new();
        let fill = Fill::gradient(Color::BLACK, Color::WHITE);
        history.execute_command(&mut scene, Box::new(SetBackground::new(PanelId::default(), None, fill)));
        assert_eq!(scene.background(&PanelId::default()), fill);
        history.undo(&mut scene);
        assert!(scene.backgrounds.is_empty());
    }

    #[test]
    fn test_split_change_undo_restores_paths() {
        let mut scene = Scene::new();
        scene
            .drawings
            .entry(PanelId::default())
            .or_default()
            .push(DrawingPath::pencil(Point::ZERO, Color::BLACK, 2.0));
        let before = scene.split_state();
        let after = scene.split_state_for(SplitMode::FourWay);

        let mut history = History::new();
        history.execute_command(&mut scene, Box::new(ChangeSplitMode::new(before, after)));
        assert!(scene.drawings.is_empty());
        assert_eq!(scene.split_mode, SplitMode::FourWay);

        history.undo(&mut scene);
        assert_eq!(scene.split_mode, SplitMode::None);
        assert_eq!(scene.drawings_on(&PanelId::default()).len(), 1);
    }
}
