//! Tool system for the canvas editor.

use crate::color::Color;
use crate::shapes::ShapeKind;
use crate::text::FontFeatures;
use serde::{Deserialize, Serialize};

/// The single active tool. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTool {
    /// Select, place, drag and resize shapes.
    #[default]
    Select,
    Pencil,
    Eraser,
    Fill,
    Text,
}

/// Caller access level supplied by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Permission {
    #[default]
    Owner,
    Write,
    /// Treated as read-only by the editor.
    Comment,
    Read,
}

impl Permission {
    /// Only owners and writers may mutate the scene.
    pub fn can_edit(self) -> bool {
        matches!(self, Permission::Owner | Permission::Write)
    }
}

/// Settings applied to new strokes, fills and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolSettings {
    pub pencil_color: Color,
    pub pencil_size: f64,
    pub eraser_size: f64,
    pub fill_color: Color,
    pub font: FontFeatures,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pencil_color: Color::BLACK,
            pencil_size: 2.0,
            eraser_size: 10.0,
            fill_color: Color::rgb(59, 130, 246),
            font: FontFeatures::default(),
        }
    }
}

/// Owns the current tool, the armed shape and tool settings.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    current_tool: ActiveTool,
    /// Shape kind waiting to be placed by the next click.
    armed_shape: Option<ShapeKind>,
    pub settings: ToolSettings,
}

impl ToolManager {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn current_tool(&self) -> ActiveTool {
        self.current_tool
    }

    /// Activate `tool`. Any armed shape is cleared.
    pub fn set_tool(&mut self, tool: ActiveTool) {
        if self.current_tool != tool {
            log::debug!("tool {:?} -> {:?}", self.current_tool, tool);
        }
        self.current_tool = tool;
        self.armed_shape = None;
    }

    /// Arm `kind` for placement; switches back to the select tool.
    pub fn arm_shape(&mut self, kind: ShapeKind) {
        self.current_tool = ActiveTool::Select;
        self.armed_shape = Some(kind);
    }

    pub fn armed_shape(&self) -> Option<&ShapeKind> {
        self.armed_shape.as_ref()
    }

    /// Take the armed shape, clearing the armed state.
    pub fn take_armed_shape(&mut self) -> Option<ShapeKind> {
        self.armed_shape.take()
    }
}
