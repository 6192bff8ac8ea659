//! Font features carried by text shapes and the text tool.

use crate::color::{Color, Fill};
use serde::{Deserialize, Serialize};

/// Bold/italic/underline/strikethrough toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyles {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

/// Horizontal alignment of laid-out lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Rendered as `Left`; lines are not stretched.
    Justify,
}

/// List marker injected in front of each laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    #[default]
    None,
    Bullet,
    Numbered,
}

/// Everything needed to lay out and paint a run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontFeatures {
    pub font_family: String,
    pub font_size: f64,
    pub font_styles: FontStyles,
    pub text_color: Fill,
    pub text_alignment: TextAlign,
    pub list_type: ListType,
}

impl FontFeatures {
    pub const DEFAULT_FAMILY: &'static str = "Arial";
    pub const DEFAULT_SIZE: f64 = 16.0;
}

impl Default for FontFeatures {
    fn default() -> Self {
        Self {
            font_family: Self::DEFAULT_FAMILY.to_string(),
            font_size: Self::DEFAULT_SIZE,
            font_styles: FontStyles::default(),
            text_color: Fill::solid(Color::BLACK),
            text_alignment: TextAlign::default(),
            list_type: ListType::default(),
        }
    }
}

/// The text payload of a `text` shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub font: FontFeatures,
}

impl TextContent {
    pub fn new(text: impl Into<String>, font: FontFeatures) -> Self {
        Self { text: text.into(), font }
    }
}
