//! Greedy word-wrap layout for text shapes.

use super::features::{FontFeatures, ListType, TextAlign};

/// Horizontal padding inside a text box, per side.
pub const TEXT_PADDING: f64 = 5.0;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Measures rendered text width.
pub trait TextMeasure {
    fn char_width(&self, c: char, font: &FontFeatures) -> f64;

    fn text_width(&self, text: &str, font: &FontFeatures) -> f64 {
        text.chars().map(|c| self.char_width(c, font)).sum()
    }
}

/// Fixed-advance measurement: every character is a fraction of the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl ApproxMeasure {
    pub const ADVANCE: f64 = 0.6;
    pub const BOLD_ADVANCE: f64 = 0.65;
}

impl TextMeasure for ApproxMeasure {
    fn char_width(&self, _c: char, font: &FontFeatures) -> f64 {
        let advance = if font.font_styles.bold { Self::BOLD_ADVANCE } else { Self::ADVANCE };
        font.font_size * advance
    }
}

/// One laid-out line in shape-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    /// Left edge of the line after alignment.
    pub x: f64,
    /// Top of the line box.
    pub y: f64,
    /// Measured width, used for underline and strikethrough.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub lines: Vec<LayoutLine>,
    pub line_height: f64,
}

impl TextLayout {
    /// Caret position after the last character: (x, top of line).
    pub fn caret(&self) -> (f64, f64) {
        match self.lines.last() {
            Some(line) => (line.x + line.width, line.y),
            None => (TEXT_PADDING, 0.0),
        }
    }

    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }
}

fn marker(list: ListType, index: usize) -> String {
    match list {
        ListType::None => String::new(),
        ListType::Bullet => "• ".to_string(),
        ListType::Numbered => format!("{}. ", index + 1),
    }
}

/// Split `word` into pieces no wider than `available`, at least one char each.
fn hard_break(word: &str, available: f64, font: &FontFeatures, measure: &dyn TextMeasure) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;
    for c in word.chars() {
        let w = measure.char_width(c, font);
        if !current.is_empty() && width + w > available {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Wrap one paragraph greedily into lines no wider than `available`.
fn wrap_paragraph(text: &str, available: f64, font: &FontFeatures, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measure.text_width(&candidate, font) <= available {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure.text_width(word, font) <= available {
            current = word.to_string();
        } else {
            let mut pieces = hard_break(word, available, font, measure);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }
    lines.push(current);
    lines
}

/// Lay out `text` inside a box `box_width` wide.
///
/// Each paragraph gets its list marker on its first line only; wrapped
/// continuation lines are not re-prefixed. `Justify` is laid out as `Left`.
pub fn layout_text(text: &str, font: &FontFeatures, box_width: f64, measure: &dyn TextMeasure) -> TextLayout {
    let available = (box_width - 2.0 * TEXT_PADDING).max(0.0);
    let line_height = font.font_size * LINE_HEIGHT_FACTOR;

    let mut lines = Vec::new();
    for (index, paragraph) in text.split('\n').enumerate() {
        let prefixed = format!("{}{}", marker(font.list_type, index), paragraph);
        for wrapped in wrap_paragraph(&prefixed, available, font, measure) {
            let width = measure.text_width(&wrapped, font);
            let x = match font.text_alignment {
                TextAlign::Left | TextAlign::Justify => TEXT_PADDING,
                TextAlign::Center => (box_width - width) / 2.0,
                TextAlign::Right => box_width - TEXT_PADDING - width,
            };
            let y = lines.len() as f64 * line_height;
            lines.push(LayoutLine { text: wrapped, x, y, width });
        }
    }

    TextLayout { lines, line_height }
}
