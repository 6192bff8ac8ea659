//! The page-level state owner.
//!
//! One `Editor` holds the scene, the history, the active tool and every
//! controller, plus a raster surface per panel. Pointer and key events are
//! routed to the controller of the active tool; everything that changes the
//! scene ends up as a command in the history, and affected panels are
//! re-rendered right away.

use crate::compositor::{Compositor, RenderOptions};
use crate::export::{ExportError, render_panel_image};
use crate::fill::flood_fill;
use crate::pixmap::PixmapSurface;
use crate::rasterize::bake_eraser;
use crate::surface::{Paint, StrokeStyle, Surface, SurfaceError};
use kurbo::{BezPath, Point, Vec2};
use snapcanvas_core::color::{Color, Fill};
use snapcanvas_core::commands::{AddStroke, ChangeSplitMode, ReplaceFilledImage, ReplaceShapes, SetBackground};
use snapcanvas_core::config::EditorConfig;
use snapcanvas_core::document::{DocumentError, DocumentPayload};
use snapcanvas_core::freehand::{DrawingPath, StrokeCapture};
use snapcanvas_core::history::History;
use snapcanvas_core::layers::LayerOp;
use snapcanvas_core::panel::{PanelId, SplitMode};
use snapcanvas_core::raster::RasterError;
use snapcanvas_core::scene::{FilledImage, Scene};
use snapcanvas_core::selection::ShapeController;
use snapcanvas_core::shapes::{Border, Shape, ShapeId, ShapeImage, ShapeKind};
use snapcanvas_core::text::{FontFeatures, TextController, TextEditResult, TextKey, TextModifiers};
use snapcanvas_core::tools::{ActiveTool, Permission, ToolManager, ToolSettings};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;

/// Offset applied to a duplicated shape.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Why an editor operation did not happen.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("permission {0:?} does not allow editing")]
    PermissionDenied(Permission),
    #[error("operation not applicable: {0}")]
    NotApplicable(&'static str),
    #[error("image error: {0}")]
    Raster(#[from] RasterError),
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

pub type EditResult<T> = Result<T, EditError>;

pub struct Editor {
    scene: Scene,
    history: History,
    tools: ToolManager,
    permission: Permission,
    compositor: Compositor,
    surfaces: BTreeMap<PanelId, PixmapSurface>,
    strokes: StrokeCapture,
    shapes: ShapeController,
    text: TextController,
    config: EditorConfig,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tool", &self.tools.current_tool())
            .field("permission", &self.permission)
            .field("split_mode", &self.scene.split_mode)
            .field("shapes", &self.scene.shapes.len())
            .field("undo", &self.history.undo_len())
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> EditResult<Self> {
        let mut editor = Self {
            scene: Scene::new(),
            history: History::with_limit(config.history_limit),
            tools: ToolManager::new(config.tools.clone()),
            permission: Permission::default(),
            compositor: Compositor::default(),
            surfaces: BTreeMap::new(),
            strokes: StrokeCapture::default(),
            shapes: ShapeController::new(config.handle_size, config.min_shape_size, config.placement_size),
            text: TextController::new(config.text_box_size, config.min_shape_size, config.caret_blink_period()),
            config,
        };
        editor.sync_surfaces()?;
        editor.render_all()?;
        Ok(editor)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tool_settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.tools.settings
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Access to the registry, e.g. to register extra shape kinds.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    /// The rendered surface of `panel`.
    pub fn surface(&self, panel: &PanelId) -> Option<&PixmapSurface> {
        self.surfaces.get(panel)
    }

    pub fn active_panel(&self) -> &PanelId {
        &self.scene.active_panel
    }

    pub fn is_text_editing(&self) -> bool {
        self.text.is_editing()
    }

    /// The live text buffer while editing.
    pub fn text_buffer(&self) -> Option<&str> {
        self.text.buffer()
    }

    // ---- tools -------------------------------------------------------------

    /// Activate `tool`. Leaving the text tool commits any open edit.
    pub fn set_tool(&mut self, tool: ActiveTool) -> EditResult<()> {
        if tool != ActiveTool::Text {
            self.commit_text();
        }
        self.tools.set_tool(tool);
        self.render_all()
    }

    /// Arm `kind` so the next click places it.
    pub fn arm_shape(&mut self, kind: ShapeKind) -> EditResult<()> {
        self.commit_text();
        self.tools.arm_shape(kind);
        self.render_all()
    }

    /// Font features used for new text and stamped on the next commit.
    pub fn set_font(&mut self, font: FontFeatures) {
        self.tools.settings.font = font;
    }

    // ---- pointer events ----------------------------------------------------

    fn accepts_pointer(&self, panel: &PanelId) -> bool {
        if !self.permission.can_edit() {
            log::debug!("pointer event ignored: permission {:?}", self.permission);
            return false;
        }
        if !self.surfaces.contains_key(panel) {
            log::debug!("pointer event ignored: no panel {panel}");
            return false;
        }
        true
    }

    pub fn pointer_down(&mut self, panel: &PanelId, point: Point) -> EditResult<()> {
        if !self.accepts_pointer(panel) {
            return Ok(());
        }
        self.scene.active_panel = panel.clone();

        match self.tools.current_tool() {
            ActiveTool::Pencil => {
                let settings = &self.tools.settings;
                let path = DrawingPath::pencil(point, settings.pencil_color, settings.pencil_size);
                self.strokes.begin(panel.clone(), path);
                Ok(())
            }
            ActiveTool::Eraser => {
                let path = DrawingPath::eraser(point, self.tools.settings.eraser_size);
                self.strokes.begin(panel.clone(), path);
                Ok(())
            }
            ActiveTool::Fill => self.fill_at(panel, point),
            ActiveTool::Text => {
                let font = self.tools.settings.font.clone();
                if let Some(command) = self.text.pointer_down(&mut self.scene, panel, point, &font) {
                    self.history.record(Box::new(command));
                }
                self.render_all()
            }
            ActiveTool::Select => {
                if let Some(kind) = self.tools.take_armed_shape() {
                    let command = self.shapes.place(&mut self.scene, panel, kind, point);
                    self.history.execute_command(&mut self.scene, Box::new(command));
                } else {
                    self.shapes.pointer_down(&mut self.scene, panel, point);
                }
                self.render_all()
            }
        }
    }

    pub fn pointer_move(&mut self, panel: &PanelId, point: Point) -> EditResult<()> {
        if !self.accepts_pointer(panel) {
            return Ok(());
        }
        match self.tools.current_tool() {
            ActiveTool::Pencil | ActiveTool::Eraser => {
                if let Some((from, to)) = self.strokes.extend(panel, point, self.config.min_sample_distance) {
                    self.paint_live_segment(panel, from, to)?;
                }
                Ok(())
            }
            ActiveTool::Select => {
                if self.shapes.pointer_move(&mut self.scene, panel, point) {
                    self.render_panel(panel)?;
                }
                Ok(())
            }
            ActiveTool::Fill | ActiveTool::Text => Ok(()),
        }
    }

    /// Global pointer release: ends whatever gesture is in progress, on any
    /// panel.
    pub fn pointer_up(&mut self) -> EditResult<()> {
        if let Some((panel, path)) = self.strokes.finish() {
            self.commit_stroke(panel, path)?;
        }
        if let Some(command) = self.shapes.pointer_up(&self.scene) {
            self.history.record(Box::new(command));
            let panel = self.scene.active_panel.clone();
            self.render_panel(&panel)?;
        }
        Ok(())
    }

    /// Paint one sampled segment straight onto the surface for feedback; the
    /// full path is committed at pointer-up.
    fn paint_live_segment(&mut self, panel: &PanelId, from: Point, to: Point) -> EditResult<()> {
        let Some((_, path)) = self.strokes.current() else {
            return Ok(());
        };
        let paint = if path.is_eraser() {
            Paint::eraser()
        } else {
            Paint::solid(path.color.unwrap_or(Color::BLACK))
        };
        let style = StrokeStyle::round(path.size);
        if let Some(surface) = self.surfaces.get_mut(panel) {
            let mut segment = BezPath::new();
            segment.move_to(from);
            segment.line_to(to);
            surface.stroke_path(&segment, &paint, &style)?;
        }
        Ok(())
    }

    fn commit_stroke(&mut self, panel: PanelId, path: DrawingPath) -> EditResult<()> {
        let mut command = AddStroke::new(panel.clone(), path.clone());
        if path.is_eraser() {
            if let Some(after) = bake_eraser(&self.compositor, &self.scene, &panel, &path) {
                command = command.with_shapes(self.scene.shapes.clone(), after);
            }
        }
        self.history.execute_command(&mut self.scene, Box::new(command));
        self.render_panel(&panel)
    }

    /// Fill tool click: recolor the first shape under `point`, or flood fill
    /// the panel's pixels.
    fn fill_at(&mut self, panel: &PanelId, point: Point) -> EditResult<()> {
        let color = self.tools.settings.fill_color;

        if let Some(hit) = self.scene.first_shape_at(panel, point) {
            let id = hit.id;
            self.edit_shapes("fill shape", |shapes| {
                if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
                    shape.fill_color = Some(color);
                }
            });
            return self.render_panel(panel);
        }

        let Some(surface) = self.surfaces.get_mut(panel) else {
            return Ok(());
        };
        self.compositor
            .render_panel(surface, &self.scene, panel, &RenderOptions::new().without_chrome())?;
        let pixels = surface.read_pixels();
        match flood_fill(&pixels, point, color, self.config.fill_pixel_cap) {
            Some(outcome) => {
                surface.put_pixels(&outcome.image)?;
                log::debug!("flood fill painted {} pixels on {panel}", outcome.filled);
                let before = self.scene.filled_image(panel).cloned();
                let command = ReplaceFilledImage::new(panel.clone(), before, Some(FilledImage::new(outcome.image)));
                self.history.execute_command(&mut self.scene, Box::new(command));
            }
            None => log::debug!("flood fill at ({}, {}) changes nothing", point.x, point.y),
        }
        self.render_panel(panel)
    }

    // ---- keyboard ----------------------------------------------------------

    /// Forward a key to the text controller. Returns whether it was consumed.
    pub fn key(&mut self, key: TextKey, modifiers: TextModifiers) -> EditResult<bool> {
        if !self.permission.can_edit() {
            return Ok(false);
        }
        let panel = self.scene.editing_shape().map(|s| s.panel_id.clone());
        let font = self.tools.settings.font.clone();
        let handled = match self.text.key(&mut self.scene, &key, modifiers, &font) {
            TextEditResult::Handled => true,
            TextEditResult::Committed(command) => {
                if let Some(command) = command {
                    self.history.record(Box::new(command));
                }
                true
            }
            TextEditResult::NotHandled => false,
        };
        if handled {
            if let Some(panel) = panel {
                self.render_panel(&panel)?;
            }
        }
        Ok(handled)
    }

    /// When the caret next blinks, if a text edit is open.
    pub fn next_caret_toggle(&self, now: Instant) -> Option<Instant> {
        self.text.is_editing().then(|| self.text.blink.next_toggle(now))
    }

    /// Re-render the panel being text-edited so the caret blinks.
    pub fn refresh_caret(&mut self) -> EditResult<()> {
        match self.scene.editing_shape().map(|s| s.panel_id.clone()) {
            Some(panel) => self.render_panel(&panel),
            None => Ok(()),
        }
    }

    fn commit_text(&mut self) {
        let font = self.tools.settings.font.clone();
        if let Some(command) = self.text.commit(&mut self.scene, &font) {
            self.history.record(Box::new(command));
        }
    }

    /// Settle every open gesture before a command replaces scene state.
    fn settle(&mut self) {
        self.commit_text();
        self.shapes.cancel(&mut self.scene);
        if self.strokes.finish().is_some() {
            log::debug!("abandoned an in-progress stroke");
        }
    }

    // ---- commands ----------------------------------------------------------

    fn ensure_can_edit(&self) -> EditResult<()> {
        if self.permission.can_edit() {
            Ok(())
        } else {
            log::debug!("edit rejected: permission {:?}", self.permission);
            Err(EditError::PermissionDenied(self.permission))
        }
    }

    fn selected_id(&self) -> EditResult<ShapeId> {
        self.scene
            .selected_id()
            .ok_or(EditError::NotApplicable("no shape selected"))
    }

    /// Apply `edit` to a copy of the shape list and execute the change as one
    /// command. Returns false when nothing changed.
    fn edit_shapes(&mut self, label: &'static str, edit: impl FnOnce(&mut Vec<Shape>)) -> bool {
        let before = self.scene.shapes.clone();
        let mut after = before.clone();
        edit(&mut after);
        let command = ReplaceShapes::new(label, before, after);
        if command.is_noop() {
            return false;
        }
        self.history.execute_command(&mut self.scene, Box::new(command));
        true
    }

    pub fn undo(&mut self) -> EditResult<bool> {
        self.ensure_can_edit()?;
        self.settle();
        let undone = self.history.undo(&mut self.scene);
        self.after_structural_change()?;
        Ok(undone)
    }

    pub fn redo(&mut self) -> EditResult<bool> {
        self.ensure_can_edit()?;
        self.settle();
        let redone = self.history.redo(&mut self.scene);
        self.after_structural_change()?;
        Ok(redone)
    }

    /// Reorder the selected shape. Returns false when it is already at the
    /// extreme or nothing is selected.
    pub fn apply_layer_op(&mut self, op: LayerOp) -> EditResult<bool> {
        self.ensure_can_edit()?;
        self.settle();
        let changed = match op.apply(&self.scene.shapes) {
            Some(after) => self.edit_shapes(op.label(), |shapes| *shapes = after),
            None => false,
        };
        if changed {
            self.render_all()?;
        }
        Ok(changed)
    }

    pub fn set_background(&mut self, panel: &PanelId, fill: Fill) -> EditResult<()> {
        self.ensure_can_edit()?;
        if !self.scene.split_mode.has_panel(panel) {
            return Err(EditError::NotApplicable("unknown panel"));
        }
        let before = self.scene.backgrounds.get(panel).copied();
        self.history
            .execute_command(&mut self.scene, Box::new(SetBackground::new(panel.clone(), before, fill)));
        self.render_panel(panel)
    }

    /// Switch split mode. Freehand paths and fill patches of every panel are
    /// discarded; shapes stay. Returns false when `mode` is already active.
    pub fn set_split_mode(&mut self, mode: SplitMode) -> EditResult<bool> {
        self.ensure_can_edit()?;
        if mode == self.scene.split_mode {
            return Ok(false);
        }
        self.settle();
        let before = self.scene.split_state();
        let after = self.scene.split_state_for(mode);
        log::debug!("split mode {:?} -> {:?}", before.mode, mode);
        self.history
            .execute_command(&mut self.scene, Box::new(ChangeSplitMode::new(before, after)));
        self.after_structural_change()?;
        Ok(true)
    }

    pub fn delete_selected(&mut self) -> EditResult<ShapeId> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        self.edit_shapes("delete shape", |shapes| shapes.retain(|s| s.id != id));
        self.render_all()?;
        Ok(id)
    }

    /// Copy the selected shape on top of the paint order and select the copy.
    pub fn duplicate_selected(&mut self) -> EditResult<ShapeId> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        let z_index = self.scene.next_z_index();
        let Some(mut copy) = self.scene.shape(id).map(|s| s.duplicated(DUPLICATE_OFFSET)) else {
            return Err(EditError::NotApplicable("no shape selected"));
        };
        copy.z_index = z_index;
        copy.selected = true;
        let copy_id = copy.id;
        self.edit_shapes("duplicate shape", |shapes| {
            for shape in shapes.iter_mut() {
                shape.selected = false;
            }
            shapes.push(copy);
        });
        self.render_all()?;
        Ok(copy_id)
    }

    /// Remove the selected shape's image. A bare image box is deleted.
    pub fn clear_image(&mut self) -> EditResult<()> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        let Some(shape) = self.scene.shape(id) else {
            return Err(EditError::NotApplicable("no shape selected"));
        };
        if shape.image.is_none() {
            return Err(EditError::NotApplicable("selected shape has no image"));
        }
        if shape.is_image_only() {
            self.edit_shapes("clear image", |shapes| shapes.retain(|s| s.id != id));
        } else {
            self.edit_shapes("clear image", |shapes| {
                if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
                    shape.image = None;
                    shape.rasterized = false;
                }
            });
        }
        self.render_all()
    }

    /// Decode uploaded image bytes into the pending upload. The next
    /// placement, or `apply_uploaded_image`, consumes it.
    pub fn upload_image(&mut self, bytes: &[u8]) -> EditResult<()> {
        self.ensure_can_edit()?;
        let image = ShapeImage::from_bytes(bytes)?;
        self.scene.uploaded_image = Some(image);
        Ok(())
    }

    /// Attach the pending upload to the selected shape.
    pub fn apply_uploaded_image(&mut self) -> EditResult<()> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        let Some(image) = self.scene.uploaded_image.take() else {
            return Err(EditError::NotApplicable("no uploaded image"));
        };
        self.edit_shapes("apply image", |shapes| {
            if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
                shape.image = Some(image);
                shape.rasterized = false;
            }
        });
        self.render_all()
    }

    pub fn set_fill_color(&mut self, color: Color) -> EditResult<()> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        self.edit_shapes("set fill", |shapes| {
            if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
                shape.fill_color = Some(color);
            }
        });
        self.render_all()
    }

    pub fn set_border(&mut self, border: Option<Border>) -> EditResult<()> {
        self.ensure_can_edit()?;
        self.settle();
        let id = self.selected_id()?;
        self.edit_shapes("set border", |shapes| {
            if let Some(shape) = shapes.iter_mut().find(|s| s.id == id) {
                shape.border = border;
            }
        });
        self.render_all()
    }

    // ---- documents ---------------------------------------------------------

    /// Replace the scene with a loaded document. History is cleared.
    pub fn load(&mut self, payload: DocumentPayload) -> EditResult<()> {
        self.strokes = StrokeCapture::default();
        self.shapes = ShapeController::new(self.shapes.handle_size, self.shapes.min_size, self.shapes.placement_size);
        self.text = TextController::new(self.text.box_size, self.text.min_size, self.config.caret_blink_period());

        let mut scene = payload.into_scene();
        for shape in &mut scene.shapes {
            shape.is_editing = false;
        }
        self.scene = scene;
        self.history.clear();
        log::debug!("loaded document with {} shapes", self.scene.shapes.len());
        self.after_structural_change()
    }

    pub fn load_json(&mut self, json: &str) -> EditResult<()> {
        let payload = DocumentPayload::from_json(json)?;
        self.load(payload)
    }

    /// Capture the committed scene. An open text edit is not included.
    pub fn save(&self) -> EditResult<DocumentPayload> {
        Ok(DocumentPayload::from_scene(&self.scene)?)
    }

    pub fn save_json(&self) -> EditResult<String> {
        Ok(self.save()?.to_json()?)
    }

    /// PNG of `panel` as currently composited, without selection chrome.
    pub fn export_png(&self, panel: &PanelId) -> EditResult<Vec<u8>> {
        let surface = self
            .surfaces
            .get(panel)
            .ok_or(EditError::NotApplicable("unknown panel"))?;
        let image = render_panel_image(&self.compositor, &self.scene, panel, surface.width(), surface.height())?;
        Ok(image.encode_png()?)
    }

    // ---- rendering ---------------------------------------------------------

    /// Match the surfaces to the current split layout, keeping surfaces whose
    /// panel and size did not change.
    fn sync_surfaces(&mut self) -> EditResult<()> {
        let mut surfaces = BTreeMap::new();
        for (panel, rect) in self.scene.split_mode.layout(self.config.surface_size()) {
            let width = rect.width().round().max(1.0) as u32;
            let height = rect.height().round().max(1.0) as u32;
            let surface = match self.surfaces.remove(&panel) {
                Some(surface) if surface.width() == width && surface.height() == height => surface,
                _ => PixmapSurface::new(width, height)?,
            };
            surfaces.insert(panel, surface);
        }
        self.surfaces = surfaces;
        if !self.scene.split_mode.has_panel(&self.scene.active_panel) {
            self.scene.active_panel = self.scene.panels().into_iter().next().unwrap_or_default();
        }
        Ok(())
    }

    fn after_structural_change(&mut self) -> EditResult<()> {
        self.sync_surfaces()?;
        self.render_all()
    }

    pub fn render_panel(&mut self, panel: &PanelId) -> EditResult<()> {
        let Some(surface) = self.surfaces.get_mut(panel) else {
            return Ok(());
        };
        let mut options = RenderOptions::new()
            .with_selection_color(self.config.selection_color)
            .with_handle_size(self.config.handle_size);
        if let (Some(id), Some(buffer)) = (self.text.editing_id(), self.text.buffer()) {
            options = options
                .with_editing(id, buffer)
                .with_caret_visible(self.text.blink.is_visible());
        }
        self.compositor.render_panel(surface, &self.scene, panel, &options)?;
        Ok(())
    }

    pub fn render_all(&mut self) -> EditResult<()> {
        for panel in self.scene.panels() {
            self.render_panel(&panel)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use snapcanvas_core::raster::RasterImage;

    fn editor() -> Editor {
        let config = EditorConfig {
            surface_width: 200,
            surface_height: 200,
            ..EditorConfig::default()
        };
        Editor::new(config).unwrap()
    }

    fn panel() -> PanelId {
        PanelId::default()
    }

    fn place(editor: &mut Editor, kind: ShapeKind, at: Point) -> ShapeId {
        editor.arm_shape(kind).unwrap();
        editor.pointer_down(&panel(), at).unwrap();
        editor.pointer_up().unwrap();
        editor.scene().selected_id().unwrap()
    }

    fn pixel(editor: &Editor, x: u32, y: u32) -> [u8; 4] {
        editor.surface(&panel()).unwrap().pixel(x, y).unwrap()
    }

    #[test]
    fn test_read_permission_blocks_everything() {
        let mut editor = editor();
        editor.set_permission(Permission::Read);
        editor.set_tool(ActiveTool::Pencil).unwrap();
        editor.pointer_down(&panel(), Point::new(10.0, 10.0)).unwrap();
        editor.pointer_move(&panel(), Point::new(50.0, 10.0)).unwrap();
        editor.pointer_up().unwrap();
        assert!(editor.scene().drawings.is_empty());
        assert!(matches!(editor.undo(), Err(EditError::PermissionDenied(Permission::Read))));

        editor.set_permission(Permission::Comment);
        assert!(matches!(
            editor.set_split_mode(SplitMode::TwoWay),
            Err(EditError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_pencil_stroke_is_undoable() {
        let mut editor = editor();
        editor.set_tool(ActiveTool::Pencil).unwrap();
        editor.pointer_down(&panel(), Point::new(10.0, 10.0)).unwrap();
        editor.pointer_move(&panel(), Point::new(50.0, 10.0)).unwrap();
        assert_eq!(pixel(&editor, 30, 10), [0, 0, 0, 255]);
        editor.pointer_up().unwrap();
        assert_eq!(editor.scene().drawings_on(&panel()).len(), 1);
        assert_eq!(pixel(&editor, 30, 10), [0, 0, 0, 255]);

        assert!(editor.undo().unwrap());
        assert!(editor.scene().drawings.is_empty());
        assert_eq!(pixel(&editor, 30, 10), [255, 255, 255, 255]);
    }

    #[test]
    fn test_place_renders_with_chrome() {
        let mut editor = editor();
        let id = place(&mut editor, ShapeKind::Rectangle, Point::new(100.0, 100.0));
        assert_eq!(editor.scene().shape(id).unwrap().bounds(), Rect::new(50.0, 50.0, 150.0, 150.0));
        assert!(editor.tools().armed_shape().is_none());
        // Handle at the top-left corner.
        assert_eq!(pixel(&editor, 50, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn test_fill_on_shape_sets_fill_color() {
        let mut editor = editor();
        let id = place(&mut editor, ShapeKind::Rectangle, Point::new(100.0, 100.0));
        editor.tool_settings_mut().fill_color = Color::rgb(0, 200, 0);
        editor.set_tool(ActiveTool::Fill).unwrap();
        editor.pointer_down(&panel(), Point::new(100.0, 100.0)).unwrap();
        assert_eq!(editor.scene().shape(id).unwrap().fill_color, Some(Color::rgb(0, 200, 0)));
        assert!(editor.scene().filled_images.is_empty());
        assert_eq!(pixel(&editor, 100, 100), [0, 200, 0, 255]);
    }

    #[test]
    fn test_flood_fill_background_is_undoable() {
        let mut editor = editor();
        editor.set_tool(ActiveTool::Fill).unwrap();
        editor.pointer_down(&panel(), Point::new(5.0, 5.0)).unwrap();
        assert!(editor.scene().filled_image(&panel()).is_some());
        assert_eq!(pixel(&editor, 150, 150), [59, 130, 246, 255]);

        editor.undo().unwrap();
        assert!(editor.scene().filled_images.is_empty());
        assert_eq!(pixel(&editor, 150, 150), [255, 255, 255, 255]);
    }

    #[test]
    fn test_text_commits_when_switching_tool() {
        let mut editor = editor();
        editor.set_tool(ActiveTool::Text).unwrap();
        editor.pointer_down(&panel(), Point::new(10.0, 10.0)).unwrap();
        for c in "hey".chars() {
            assert!(editor.key(TextKey::Character(c.to_string()), TextModifiers::default()).unwrap());
        }
        assert_eq!(editor.text_buffer(), Some("hey"));
        editor.set_tool(ActiveTool::Select).unwrap();
        assert!(!editor.is_text_editing());
        let shape = &editor.scene().shapes[0];
        assert_eq!(shape.text_str(), "hey");
        assert!(!shape.is_editing);
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_delete_and_duplicate() {
        let mut editor = editor();
        assert!(matches!(editor.delete_selected(), Err(EditError::NotApplicable(_))));

        let id = place(&mut editor, ShapeKind::Star, Point::new(60.0, 60.0));
        let copy = editor.duplicate_selected().unwrap();
        assert_ne!(copy, id);
        assert_eq!(editor.scene().selected_id(), Some(copy));
        let copy_shape = editor.scene().shape(copy).unwrap();
        assert!((copy_shape.x - 30.0).abs() < f64::EPSILON);
        assert!(copy_shape.z_index > editor.scene().shape(id).unwrap().z_index);

        assert_eq!(editor.delete_selected().unwrap(), copy);
        assert!(editor.scene().shape(copy).is_none());
        editor.undo().unwrap();
        assert!(editor.scene().shape(copy).is_some());
    }

    #[test]
    fn test_upload_and_apply_image() {
        let mut editor = editor();
        let png = RasterImage::filled(4, 4, Color::rgb(255, 0, 255)).encode_png().unwrap();
        editor.upload_image(&png).unwrap();
        assert!(matches!(
            editor.apply_uploaded_image(),
            Err(EditError::NotApplicable("no shape selected"))
        ));
        // The failed apply leaves the upload pending.
        assert!(editor.scene().uploaded_image.is_some());

        let id = place(&mut editor, ShapeKind::Square, Point::new(100.0, 100.0));
        // Placement consumed the upload.
        assert!(editor.scene().shape(id).unwrap().image.is_some());
        assert!(editor.scene().uploaded_image.is_none());
        assert_eq!(pixel(&editor, 100, 100), [255, 0, 255, 255]);

        editor.clear_image().unwrap();
        assert!(editor.scene().shape(id).unwrap().image.is_none());
        assert!(matches!(editor.clear_image(), Err(EditError::NotApplicable(_))));
    }

    #[test]
    fn test_clear_image_deletes_bare_image_box() {
        let mut editor = editor();
        let png = RasterImage::filled(2, 2, Color::BLACK).encode_png().unwrap();
        editor.upload_image(&png).unwrap();
        let id = place(&mut editor, ShapeKind::Image, Point::new(100.0, 100.0));
        editor.clear_image().unwrap();
        assert!(editor.scene().shape(id).is_none());
    }

    #[test]
    fn test_split_mode_resizes_surfaces() {
        let mut editor = editor();
        assert!(editor.set_split_mode(SplitMode::TwoWay).unwrap());
        assert!(!editor.set_split_mode(SplitMode::TwoWay).unwrap());
        assert!(editor.surface(&PanelId::default()).is_none());
        let left = editor.surface(&PanelId::numbered(1)).unwrap();
        assert_eq!((left.width(), left.height()), (100, 200));
        assert_eq!(editor.active_panel(), &PanelId::numbered(1));

        editor.undo().unwrap();
        assert_eq!(editor.scene().split_mode, SplitMode::None);
        assert!(editor.surface(&PanelId::default()).is_some());
    }

    #[test]
    fn test_layer_op_through_editor() {
        let mut editor = editor();
        let a = place(&mut editor, ShapeKind::Rectangle, Point::new(60.0, 60.0));
        let b = place(&mut editor, ShapeKind::Rectangle, Point::new(90.0, 90.0));
        assert_eq!(editor.scene().selected_id(), Some(b));
        assert!(!editor.apply_layer_op(LayerOp::BringToFront).unwrap());
        assert!(editor.apply_layer_op(LayerOp::SendToBack).unwrap());
        assert_eq!(editor.scene().shapes[0].id, b);
        assert_eq!(editor.scene().shapes[1].id, a);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut editor = editor();
        place(&mut editor, ShapeKind::Hexagon, Point::new(100.0, 100.0));
        editor.set_background(&panel(), Fill::gradient(Color::BLACK, Color::WHITE)).unwrap();
        let json = editor.save_json().unwrap();

        let mut other = self::editor();
        other.load_json(&json).unwrap();
        assert_eq!(other.scene().shapes, editor.scene().shapes);
        assert_eq!(other.scene().backgrounds, editor.scene().backgrounds);
        assert!(!other.history().can_undo());
        assert_eq!(
            other.surface(&panel()).unwrap().read_pixels(),
            editor.surface(&panel()).unwrap().read_pixels()
        );
    }
}
