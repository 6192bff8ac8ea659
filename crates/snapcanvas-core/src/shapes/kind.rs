//! Shape type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type tag selecting a shape's draw procedure.
///
/// Built-in kinds map to the registry's catalog. Anything else is kept
/// verbatim in `Other` so documents written by newer versions survive a
/// load/save cycle; such shapes are simply not painted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Square,
    Ellipse,
    Circle,
    Triangle,
    RightTriangle,
    Diamond,
    Parallelogram,
    Trapezoid,
    Pentagon,
    Hexagon,
    Octagon,
    Star,
    Heart,
    Cross,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Line,
    SpeechBubble,
    Cloud,
    Cylinder,
    Image,
    Text,
    Other(String),
}

impl ShapeKind {
    /// All kinds with a built-in draw procedure.
    pub const BUILTIN: &'static [ShapeKind] = &[
        ShapeKind::Rectangle,
        ShapeKind::RoundedRectangle,
        ShapeKind::Square,
        ShapeKind::Ellipse,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::RightTriangle,
        ShapeKind::Diamond,
        ShapeKind::Parallelogram,
        ShapeKind::Trapezoid,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Octagon,
        ShapeKind::Star,
        ShapeKind::Heart,
        ShapeKind::Cross,
        ShapeKind::ArrowRight,
        ShapeKind::ArrowLeft,
        ShapeKind::ArrowUp,
        ShapeKind::ArrowDown,
        ShapeKind::Line,
        ShapeKind::SpeechBubble,
        ShapeKind::Cloud,
        ShapeKind::Cylinder,
        ShapeKind::Image,
        ShapeKind::Text,
    ];

    /// The wire name of this kind.
    pub fn name(&self) -> &str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::RoundedRectangle => "RoundedRectangle",
            ShapeKind::Square => "Square",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::RightTriangle => "RightTriangle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Parallelogram => "Parallelogram",
            ShapeKind::Trapezoid => "Trapezoid",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Octagon => "Octagon",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Cross => "Cross",
            ShapeKind::ArrowRight => "ArrowRight",
            ShapeKind::ArrowLeft => "ArrowLeft",
            ShapeKind::ArrowUp => "ArrowUp",
            ShapeKind::ArrowDown => "ArrowDown",
            ShapeKind::Line => "Line",
            ShapeKind::SpeechBubble => "SpeechBubble",
            ShapeKind::Cloud => "Cloud",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Image => "Image",
            ShapeKind::Text => "text",
            ShapeKind::Other(name) => name,
        }
    }

    /// Whether this is the text kind.
    pub fn is_text(&self) -> bool {
        matches!(self, ShapeKind::Text)
    }
}

impl From<&str> for ShapeKind {
    fn from(name: &str) -> Self {
        ShapeKind::BUILTIN
            .iter()
            .find(|kind| kind.name() == name)
            .cloned()
            .unwrap_or_else(|| ShapeKind::Other(name.to_string()))
    }
}

impl From<String> for ShapeKind {
    fn from(name: String) -> Self {
        ShapeKind::from(name.as_str())
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
