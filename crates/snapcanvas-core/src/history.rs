//! Linear undo/redo over reversible scene commands.

use crate::scene::Scene;
use std::fmt;

/// A reversible scene mutation.
///
/// Commands capture full before/after values of whatever they touch when
/// they are built; `execute` and `undo` only install one or the other.
pub trait Command: fmt::Debug + Send {
    fn execute(&self, scene: &mut Scene);
    fn undo(&self, scene: &mut Scene);
    /// Short name used in logs.
    fn label(&self) -> &'static str;
}

/// Undo and redo stacks.
///
/// Executing a new command clears the redo stack; there are no branching
/// timelines. With a `limit`, the oldest entries are evicted first.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    limit: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` undo entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Execute `command` and record it.
    pub fn execute_command(&mut self, scene: &mut Scene, command: Box<dyn Command>) {
        log::debug!("execute {}", command.label());
        command.execute(scene);
        self.push(command);
    }

    /// Record a command whose effect the scene already shows, such as a drag
    /// applied live during the gesture.
    pub fn record(&mut self, command: Box<dyn Command>) {
        log::debug!("record {}", command.label());
        self.push(command);
    }

    fn push(&mut self, command: Box<dyn Command>) {
        self.undo_stack.push(command);
        self.redo_stack.clear();

        if let Some(limit) = self.limit {
            let excess = self.undo_stack.len().saturating_sub(limit);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Undo the most recent command. Returns false when there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("undo {}", command.label());
        command.undo(scene);
        self.redo_stack.push(command);
        true
    }

    /// Redo the most recently undone command. Returns false when there is
    /// nothing to redo.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("redo {}", command.label());
        command.execute(scene);
        self.undo_stack.push(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
