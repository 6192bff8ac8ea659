//! Text create/edit controller.

use super::features::FontFeatures;
use crate::commands::ReplaceShapes;
use crate::panel::PanelId;
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Size};
use std::time::{Duration, Instant};

/// Default extent of a newly created text box.
pub const DEFAULT_TEXT_BOX: Size = Size::new(200.0, 60.0);

/// Caret blink half-period.
pub const CARET_BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Text editing key events.
#[derive(Debug, Clone, PartialEq)]
pub enum TextKey {
    Character(String),
    Backspace,
    Enter,
    Escape,
    /// Any key the controller does not handle.
    Other,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Result of handling a text editing event.
#[derive(Debug, Clone)]
pub enum TextEditResult {
    /// Event was handled, the buffer may have changed.
    Handled,
    /// Editing ended; carries the undo entry for the whole edit, if anything
    /// changed.
    Committed(Option<ReplaceShapes>),
    /// Event was not handled (pass to other handlers).
    NotHandled,
}

/// Caret visibility timer.
#[derive(Debug, Clone, Copy)]
pub struct CaretBlink {
    start: Instant,
    period: Duration,
}

impl CaretBlink {
    pub fn new(period: Duration) -> Self {
        Self {
            start: Instant::now(),
            period,
        }
    }

    /// Restart with the caret visible.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        let period = self.period.as_millis().max(1);
        (now.saturating_duration_since(self.start).as_millis() / period) % 2 == 0
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }

    /// When the caret next toggles, for scheduling the re-render.
    pub fn next_toggle(&self, now: Instant) -> Instant {
        let period = self.period.as_nanos().max(1);
        let phase = now.saturating_duration_since(self.start).as_nanos();
        let next = (phase / period + 1) * period;
        self.start + Duration::from_nanos(u64::try_from(next).unwrap_or(u64::MAX))
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self::new(CARET_BLINK_PERIOD)
    }
}

/// One edit session, from pointer-down to commit.
#[derive(Debug, Clone)]
struct EditSession {
    shape_id: ShapeId,
    buffer: String,
    /// Shape list before the session touched anything.
    before: Vec<Shape>,
    /// Whether the session created the shape.
    created: bool,
}

/// Text tool state machine.
///
/// While editing, the typed text lives in the controller's buffer; the shape
/// only receives it on commit.
#[derive(Debug, Clone)]
pub struct TextController {
    session: Option<EditSession>,
    pub box_size: Size,
    pub min_size: f64,
    pub blink: CaretBlink,
}

impl Default for TextController {
    fn default() -> Self {
        Self {
            session: None,
            box_size: DEFAULT_TEXT_BOX,
            min_size: crate::shapes::MIN_SHAPE_SIZE,
            blink: CaretBlink::default(),
        }
    }
}

impl TextController {
    pub fn new(box_size: Size, min_size: f64, blink_period: Duration) -> Self {
        Self {
            session: None,
            box_size,
            min_size,
            blink: CaretBlink::new(blink_period),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn editing_id(&self) -> Option<ShapeId> {
        self.session.as_ref().map(|s| s.shape_id)
    }

    /// The live buffer of the shape being edited.
    pub fn buffer(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.buffer.as_str())
    }

    /// Pointer down with the text tool active.
    ///
    /// An open session is committed first; its undo entry is returned. Then
    /// the topmost text shape under `point` enters edit mode, or a new text
    /// box is created there.
    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        panel: &PanelId,
        point: Point,
        font: &FontFeatures,
    ) -> Option<ReplaceShapes> {
        let committed = self.commit(scene, font);
        let before = scene.shapes.clone();

        let (shape_id, buffer, created) = match scene.text_shape_at(panel, point) {
            Some(shape) => (shape.id, shape.text_str().to_string(), false),
            None => {
                let size = Size::new(
                    self.box_size.width.max(self.min_size),
                    self.box_size.height.max(self.min_size),
                );
                let mut shape = Shape::new_text(Rect::from_origin_size(point, size), panel.clone(), font.clone());
                shape.z_index = scene.next_z_index();
                let id = shape.id;
                scene.add_shape(shape);
                (id, String::new(), true)
            }
        };

        for shape in &mut scene.shapes {
            let is_target = shape.id == shape_id;
            shape.selected = is_target;
            shape.is_editing = is_target;
        }
        log::debug!("text edit on {shape_id} (new: {created})");

        self.session = Some(EditSession {
            shape_id,
            buffer,
            before,
            created,
        });
        self.blink.reset();
        committed
    }

    /// Handle a key while editing.
    pub fn key(&mut self, scene: &mut Scene, key: &TextKey, modifiers: TextModifiers, font: &FontFeatures) -> TextEditResult {
        let Some(session) = self.session.as_mut() else {
            return TextEditResult::NotHandled;
        };

        match key {
            TextKey::Enter | TextKey::Escape => TextEditResult::Committed(self.commit(scene, font)),
            TextKey::Backspace => {
                session.buffer.pop();
                self.blink.reset();
                TextEditResult::Handled
            }
            TextKey::Character(s) if !modifiers.ctrl && !modifiers.meta && is_printable(s) => {
                session.buffer.push_str(s);
                self.blink.reset();
                TextEditResult::Handled
            }
            _ => TextEditResult::NotHandled,
        }
    }

    /// Write the buffer into the shape, stamp `font` and leave edit mode.
    ///
    /// A shape created by this session that ends up empty is removed.
    /// Returns one command spanning the whole session, or `None` when nothing
    /// changed.
    pub fn commit(&mut self, scene: &mut Scene, font: &FontFeatures) -> Option<ReplaceShapes> {
        let session = self.session.take()?;

        if session.created && session.buffer.is_empty() {
            scene.remove_shape(session.shape_id);
        } else if let Some(shape) = scene.shape_mut(session.shape_id) {
            let content = shape.text.get_or_insert_with(Default::default);
            content.text = session.buffer;
            content.font = font.clone();
            shape.is_editing = false;
        }

        let command = ReplaceShapes::new("edit text", session.before, scene.shapes.clone());
        (!command.is_noop()).then_some(command)
    }

    /// Leave edit mode without a trace: the scene goes back to how it was
    /// before the session.
    pub fn cancel(&mut self, scene: &mut Scene) {
        if let Some(session) = self.session.take() {
            scene.shapes = session.before;
        }
    }
}

fn is_printable(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{Command, History};
    use crate::shapes::ShapeKind;

    fn type_str(ctl: &mut TextController, scene: &mut Scene, text: &str) {
        for c in text.chars() {
            ctl.key(scene, &TextKey::Character(c.to_string()), TextModifiers::default(), &FontFeatures::default());
        }
    }

    #[test]
    fn test_create_type_commit() {
        let mut scene = Scene::new();
        let mut ctl = TextController::default();
        let font = FontFeatures::default();
        assert!(ctl.pointer_down(&mut scene, &PanelId::default(), Point::new(10.0, 10.0), &font).is_none());

        let shape = scene.editing_shape().unwrap();
        assert_eq!(shape.bounds(), Rect::new(10.0, 10.0, 210.0, 70.0));
        assert!(shape.selected);

        type_str(&mut ctl, &mut scene, "hi!");
        ctl.key(&mut scene, &TextKey::Backspace, TextModifiers::default(), &font);
        assert_eq!(ctl.buffer(), Some("hi"));
        assert_eq!(scene.shapes[0].text_str(), "");

        let result = ctl.key(&mut scene, &TextKey::Enter, TextModifiers::default(), &font);
        assert!(matches!(result, TextEditResult::Committed(Some(_))));
        assert_eq!(scene.shapes[0].text_str(), "hi");
        assert!(!scene.shapes[0].is_editing);
        assert!(!ctl.is_editing());
    }

    #[test]
    fn test_modified_characters_ignored() {
        let mut scene = Scene::new();
        let mut ctl = TextController::default();
        let font = FontFeatures::default();
        ctl.pointer_down(&mut scene, &PanelId::default(), Point::ZERO, &font);
        let ctrl = TextModifiers {
            ctrl: true,
            ..TextModifiers::default()
        };
        let result = ctl.key(&mut scene, &TextKey::Character("z".into()), ctrl, &font);
        assert!(matches!(result, TextEditResult::NotHandled));
        let result = ctl.key(&mut scene, &TextKey::Character("ab".into()), TextModifiers::default(), &font);
        assert!(matches!(result, TextEditResult::NotHandled));
        assert_eq!(ctl.buffer(), Some(""));
    }

    #[test]
    fn test_empty_new_text_is_discarded() {
        let mut scene = Scene::new();
        let mut ctl = TextController::default();
        let font = FontFeatures::default();
        ctl.pointer_down(&mut scene, &PanelId::default(), Point::ZERO, &font);
        assert_eq!(scene.shapes.len(), 1);
        assert!(ctl.commit(&mut scene, &font).is_none());
        assert!(scene.shapes.is_empty());
    }

    #[test]
    fn test_edit_existing_stamps_font() {
        let mut scene = Scene::new();
        let mut shape = Shape::new_text(Rect::new(0.0, 0.0, 200.0, 60.0), PanelId::default(), FontFeatures::default());
        shape.text.as_mut().unwrap().text = "old".into();
        let id = shape.id;
        scene.add_shape(shape);
        scene.add_shape(Shape::new(ShapeKind::Rectangle, Rect::new(300.0, 0.0, 400.0, 100.0), PanelId::default()));

        let mut ctl = TextController::default();
        let mut font = FontFeatures::default();
        ctl.pointer_down(&mut scene, &PanelId::default(), Point::new(50.0, 30.0), &font);
        assert_eq!(ctl.editing_id(), Some(id));
        assert_eq!(ctl.buffer(), Some("old"));

        font.font_size = 32.0;
        font.font_styles.italic = true;
        type_str(&mut ctl, &mut scene, "er");
        let mut history = History::new();
        let TextEditResult::Committed(Some(cmd)) = ctl.key(&mut scene, &TextKey::Escape, TextModifiers::default(), &font)
        else {
            panic!("expected commit");
        };
        assert_eq!(cmd.label(), "edit text");
        history.execute_command(&mut scene, Box::new(cmd));

        let content = scene.shape(id).unwrap().text.clone().unwrap();
        assert_eq!(content.text, "older");
        assert!((content.font.font_size - 32.0).abs() < f64::EPSILON);
        assert!(content.font.font_styles.italic);

        history.undo(&mut scene);
        assert_eq!(scene.shape(id).unwrap().text_str(), "old");
        assert!(!scene.shape(id).unwrap().is_editing);
    }

    #[test]
    fn test_single_editing_shape() {
        let mut scene = Scene::new();
        let mut ctl = TextController::default();
        let font = FontFeatures::default();
        ctl.pointer_down(&mut scene, &PanelId::default(), Point::ZERO, &font);
        type_str(&mut ctl, &mut scene, "a");
        let committed = ctl.pointer_down(&mut scene, &PanelId::default(), Point::new(400.0, 400.0), &font);
        assert!(committed.is_some());
        assert_eq!(scene.shapes.iter().filter(|s| s.is_editing).count(), 1);
    }

    #[test]
    fn test_caret_blink() {
        let blink = CaretBlink::new(Duration::from_millis(500));
        let start = blink.start;
        assert!(blink.is_visible_at(start + Duration::from_millis(100)));
        assert!(!blink.is_visible_at(start + Duration::from_millis(600)));
        assert!(blink.is_visible_at(start + Duration::from_millis(1100)));
        assert_eq!(blink.next_toggle(start + Duration::from_millis(100)), start + Duration::from_millis(500));
    }
}
