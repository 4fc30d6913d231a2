//! Undo/redo over reversible commands

use shared::{GridCell, Marker, MarkerId, Point2D};

use super::points::PointStore;

/// Position plus derived grid cell, the part of a marker a move changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point2D,
    pub cell: Option<GridCell>,
}

/// One state-changing operation on the point store
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Marker inserted at `index`
    Add { marker: Marker, index: usize },
    Move {
        id: MarkerId,
        from: Placement,
        to: Placement,
    },
    /// Marker removed from `index`
    Delete { marker: Marker, index: usize },
    /// Whole store emptied
    Clear { removed: Vec<Marker> },
    /// Inverse of `Clear`; never recorded on its own
    Restore { markers: Vec<Marker> },
}

impl Command {
    /// The command that exactly undoes this one
    pub fn invert(&self) -> Command {
        match self {
            Command::Add { marker, index } => Command::Delete {
                marker: marker.clone(),
                index: *index,
            },
            Command::Delete { marker, index } => Command::Add {
                marker: marker.clone(),
                index: *index,
            },
            Command::Move { id, from, to } => Command::Move {
                id: id.clone(),
                from: *to,
                to: *from,
            },
            Command::Clear { removed } => Command::Restore {
                markers: removed.clone(),
            },
            Command::Restore { markers } => Command::Clear {
                removed: markers.clone(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Move { .. } => "move",
            Command::Delete { .. } => "delete",
            Command::Clear { .. } => "clear",
            Command::Restore { .. } => "restore",
        }
    }
}

/// Two-stack history
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Push a freshly executed command; invalidates the redo branch
    pub fn record(&mut self, command: Command) {
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo last command
    pub fn undo(&mut self, store: &mut PointStore) -> Option<&Command> {
        let command = self.undo_stack.pop()?;
        store.apply(&command.invert());
        self.redo_stack.push(command);
        self.redo_stack.last()
    }

    /// Redo last undone command
    pub fn redo(&mut self, store: &mut PointStore) -> Option<&Command> {
        let command = self.redo_stack.pop()?;
        store.apply(&command);
        self.undo_stack.push(command);
        self.undo_stack.last()
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

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[Command] {
        &self.undo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
