//! SnapCanvas Core Library
//!
//! Platform-agnostic data structures and editing logic for the SnapCanvas
//! drawing engine: the scene model, undo/redo, and the per-tool interaction
//! controllers. Pixel work lives in `snapcanvas-render`.

pub mod color;
pub mod commands;
pub mod config;
pub mod document;
pub mod freehand;
pub mod geometry;
pub mod history;
pub mod layers;
pub mod panel;
pub mod raster;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod text;
pub mod tools;

pub use color::{Color, Fill};
pub use config::{ConfigError, EditorConfig};
pub use document::{DocumentError, DocumentPayload};
pub use freehand::{DrawingPath, StrokeCapture, StrokeTool};
pub use history::{Command, History};
pub use layers::LayerOp;
pub use panel::{PanelId, SplitMode};
pub use raster::{RasterError, RasterImage};
pub use scene::{FilledImage, Scene};
pub use selection::{Corner, ManipulationState, ShapeController};
pub use shapes::{Border, BorderStyle, ImageSource, Shape, ShapeId, ShapeImage, ShapeKind};
pub use text::{FontFeatures, TextController, TextKey};
pub use tools::{ActiveTool, Permission, ToolManager, ToolSettings};
