//! Rich text: font features, the editing controller and line layout.

mod editor;
mod features;
mod layout;

pub use editor::{
    CARET_BLINK_PERIOD, CaretBlink, DEFAULT_TEXT_BOX, TextController, TextEditResult, TextKey, TextModifiers,
};
pub use features::{FontFeatures, FontStyles, ListType, TextAlign, TextContent};
pub use layout::{
    ApproxMeasure, LINE_HEIGHT_FACTOR, LayoutLine, TEXT_PADDING, TextLayout, TextMeasure, layout_text,
};
