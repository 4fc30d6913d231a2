//! Undo/redo functionality

use super::Session;
use crate::state::operation_log::Operation;

impl Session {
    /// Undo last change. `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.interrupt_playback();
        match self.history.undo(&mut self.points) {
            Some(command) => {
                tracing::debug!("Undo {}", command.name());
                self.log.record(Operation::Undone);
                true
            }
            None => false,
        }
    }

    /// Redo last undone change. `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.interrupt_playback();
        match self.history.redo(&mut self.points) {
            Some(command) => {
                tracing::debug!("Redo {}", command.name());
                self.log.record(Operation::Redone);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
