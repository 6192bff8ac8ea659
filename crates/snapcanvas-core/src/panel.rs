//! Panels and split-view layouts.

use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one renderable sub-surface of the document.
///
/// `"default"` when the document is not split, `"panel-1"` to `"panel-4"`
/// under split modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub const DEFAULT: &'static str = "default";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The single panel of an unsplit document.
    pub fn default_panel() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// The `n`th split panel (1-based).
    pub fn numbered(n: usize) -> Self {
        Self(format!("panel-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PanelId {
    fn default() -> Self {
        Self::default_panel()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How the document surface is divided into panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplitMode {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "2-way")]
    TwoWay,
    #[serde(rename = "3-way-left")]
    ThreeWayLeft,
    #[serde(rename = "3-way-right")]
    ThreeWayRight,
    #[serde(rename = "4-way")]
    FourWay,
}

impl SplitMode {
    /// Number of panels this mode produces.
    pub fn panel_count(self) -> usize {
        match self {
            SplitMode::None => 1,
            SplitMode::TwoWay => 2,
            SplitMode::ThreeWayLeft | SplitMode::ThreeWayRight => 3,
            SplitMode::FourWay => 4,
        }
    }

    /// The panel identifiers, in layout order.
    pub fn panel_ids(self) -> Vec<PanelId> {
        match self {
            SplitMode::None => vec![PanelId::default_panel()],
            _ => (1..=self.panel_count()).map(PanelId::numbered).collect(),
        }
    }

    /// Whether `panel` exists under this mode.
    pub fn has_panel(self, panel: &PanelId) -> bool {
        self.panel_ids().contains(panel)
    }

    /// Panel rectangles within a document of `size`.
    ///
    /// `ThreeWayLeft` puts the tall panel on the left with two stacked on the
    /// right; `ThreeWayRight` mirrors it.
    pub fn layout(self, size: Size) -> Vec<(PanelId, Rect)> {
        let (w, h) = (size.width, size.height);
        let (hw, hh) = (w / 2.0, h / 2.0);
        let rects = match self {
            SplitMode::None => vec![Rect::new(0.0, 0.0, w, h)],
            SplitMode::TwoWay => vec![Rect::new(0.0, 0.0, hw, h), Rect::new(hw, 0.0, w, h)],
            SplitMode::ThreeWayLeft => vec![
                Rect::new(0.0, 0.0, hw, h),
                Rect::new(hw, 0.0, w, hh),
                Rect::new(hw, hh, w, h),
            ],
            SplitMode::ThreeWayRight => vec![
                Rect::new(0.0, 0.0, hw, hh),
                Rect::new(0.0, hh, hw, h),
                Rect::new(hw, 0.0, w, h),
            ],
            SplitMode::FourWay => vec![
                Rect::new(0.0, 0.0, hw, hh),
                Rect::new(hw, 0.0, w, hh),
                Rect::new(0.0, hh, hw, h),
                Rect::new(hw, hh, w, h),
            ],
        };
        self.panel_ids().into_iter().zip(rects).collect()
    }
}
