//! Z-order operations over the shape list.
//!
//! Each operation is a pure function from the current list to a reordered
//! copy; callers wrap the result in a `ReplaceShapes` command.

use crate::shapes::Shape;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerOp {
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

impl LayerOp {
    pub fn label(self) -> &'static str {
        match self {
            LayerOp::BringForward => "bring forward",
            LayerOp::SendBackward => "send backward",
            LayerOp::BringToFront => "bring to front",
            LayerOp::SendToBack => "send to back",
        }
    }

    /// Apply to the selected shape. `None` when nothing would change.
    pub fn apply(self, shapes: &[Shape]) -> Option<Vec<Shape>> {
        match self {
            LayerOp::BringForward => bring_forward(shapes),
            LayerOp::SendBackward => send_backward(shapes),
            LayerOp::BringToFront => bring_to_front(shapes),
            LayerOp::SendToBack => send_to_back(shapes),
        }
    }
}

fn selected_index(shapes: &[Shape]) -> Option<usize> {
    shapes.iter().position(|s| s.selected)
}

fn others(shapes: &[Shape], index: usize) -> impl Iterator<Item = i64> + use<'_> {
    shapes
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, s)| s.z_index)
}

/// Stable sort by z-index so list order (paint order) follows it; ties keep
/// insertion order.
fn sorted(mut shapes: Vec<Shape>) -> Vec<Shape> {
    shapes.sort_by_key(|s| s.z_index);
    shapes
}

/// Swap z-index with the next-higher neighbor.
pub fn bring_forward(shapes: &[Shape]) -> Option<Vec<Shape>> {
    let index = selected_index(shapes)?;
    let z = shapes[index].z_index;
    let neighbor = shapes
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != index && s.z_index > z)
        .min_by_key(|(_, s)| s.z_index)
        .map(|(i, _)| i)?;

    let mut out = shapes.to_vec();
    let neighbor_z = out[neighbor].z_index;
    out[neighbor].z_index = z;
    out[index].z_index = neighbor_z;
    Some(sorted(out))
}

/// Swap z-index with the next-lower neighbor.
pub fn send_backward(shapes: &[Shape]) -> Option<Vec<Shape>> {
    let index = selected_index(shapes)?;
    let z = shapes[index].z_index;
    let neighbor = shapes
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != index && s.z_index < z)
        .max_by_key(|(_, s)| s.z_index)
        .map(|(i, _)| i)?;

    let mut out = shapes.to_vec();
    let neighbor_z = out[neighbor].z_index;
    out[neighbor].z_index = z;
    out[index].z_index = neighbor_z;
    Some(sorted(out))
}

/// Set z-index to one above the current maximum. `None` when the shape is
/// already strictly above every other.
pub fn bring_to_front(shapes: &[Shape]) -> Option<Vec<Shape>> {
    let index = selected_index(shapes)?;
    let z = shapes[index].z_index;
    let max = others(shapes, index).max()?;
    if z > max {
        return None;
    }
    let mut out = shapes.to_vec();
    out[index].z_index = max + 1;
    Some(sorted(out))
}

/// Set z-index to one below the current minimum. `None` when the shape is
/// already strictly below every other.
pub fn send_to_back(shapes: &[Shape]) -> Option<Vec<Shape>> {
    let index = selected_index(shapes)?;
    let z = shapes[index].z_index;
    let min = others(shapes, index).min()?;
    if z < min {
        return None;
    }
    let mut out = shapes.to_vec();
    out[index].z_index = min - 1;
    Some(sorted(out))
}
