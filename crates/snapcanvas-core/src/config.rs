//! Editor configuration.

use crate::color::Color;
use crate::freehand::MIN_SAMPLE_DISTANCE;
use crate::selection::{DEFAULT_PLACEMENT_SIZE, HANDLE_SIZE};
use crate::shapes::MIN_SHAPE_SIZE;
use crate::text::DEFAULT_TEXT_BOX;
use crate::tools::ToolSettings;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default cap on pixels a single flood fill may paint.
pub const DEFAULT_FILL_PIXEL_CAP: usize = 2_000_000;

/// Default number of undo entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tunables for an editor instance. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Size of each panel surface in pixels.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Undo depth; `None` keeps everything.
    pub history_limit: Option<usize>,
    pub fill_pixel_cap: usize,
    pub min_sample_distance: f64,
    pub min_shape_size: f64,
    pub placement_size: Size,
    pub text_box_size: Size,
    pub caret_blink_ms: u64,
    pub handle_size: f64,
    pub selection_color: Color,
    pub tools: ToolSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            surface_width: 800,
            surface_height: 600,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            fill_pixel_cap: DEFAULT_FILL_PIXEL_CAP,
            min_sample_distance: MIN_SAMPLE_DISTANCE,
            min_shape_size: MIN_SHAPE_SIZE,
            placement_size: DEFAULT_PLACEMENT_SIZE,
            text_box_size: DEFAULT_TEXT_BOX,
            caret_blink_ms: 500,
            handle_size: HANDLE_SIZE,
            selection_color: Color::rgb(59, 130, 246),
            tools: ToolSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn caret_blink_period(&self) -> Duration {
        Duration::from_millis(self.caret_blink_ms)
    }

    pub fn surface_size(&self) -> Size {
        Size::new(f64::from(self.surface_width), f64::from(self.surface_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"surfaceWidth": 320, "historyLimit": null}"#).unwrap();
        assert_eq!(config.surface_width, 320);
        assert_eq!(config.surface_height, 600);
        assert_eq!(config.history_limit, None);
        assert_eq!(config.fill_pixel_cap, 2_000_000);
        assert!((config.min_shape_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r##"{"selectionColor": "#ff0000", "tools": {"eraserSize": 24}}"##).unwrap();
        let config = EditorConfig::from_file(&path).unwrap();
        assert_eq!(config.selection_color, Color::rgb(255, 0, 0));
        assert!((config.tools.eraser_size - 24.0).abs() < f64::EPSILON);
        assert!((config.tools.pencil_size - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            EditorConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
