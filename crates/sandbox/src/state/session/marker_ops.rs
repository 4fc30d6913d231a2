//! Marker editing: add, move, delete, clear

use shared::{Marker, Point2D};

use super::Session;
use crate::error::PlacementError;
use crate::state::history::Command;
use crate::state::operation_log::Operation;

impl Session {
    /// Stop a running playback before the learner changes anything
    pub(crate) fn interrupt_playback(&mut self) {
        if self.playback.cancel() {
            tracing::debug!("Playback cancelled by edit");
        }
    }

    fn note_rejection(&mut self, err: &PlacementError) {
        tracing::warn!("Placement rejected: {err}");
        if !matches!(err, PlacementError::NotFound(_)) {
            self.log.record(Operation::Rejected);
        }
    }

    /// Place a marker at surface coordinates
    pub fn add_marker(&mut self, position: Point2D) -> Result<Marker, PlacementError> {
        self.interrupt_playback();
        match self.points.add(position, self.method, &self.scenario) {
            Ok((marker, command)) => {
                tracing::info!(
                    "Added {} at ({:.2}, {:.2})",
                    marker.label,
                    marker.position.x,
                    marker.position.y
                );
                self.history.record(command);
                self.log.record(Operation::Added);
                Ok(marker)
            }
            Err(e) => {
                self.note_rejection(&e);
                Err(e)
            }
        }
    }

    /// Place a marker under a screen position (canvas click)
    pub fn add_marker_at_screen(&mut self, screen: Point2D) -> Result<Marker, PlacementError> {
        let position = self.view().screen_to_surface(screen);
        self.add_marker(position)
    }

    /// Move a marker. Returns `false` when it already sits at the target.
    pub fn move_marker(&mut self, id: &str, position: Point2D) -> Result<bool, PlacementError> {
        self.interrupt_playback();
        match self
            .points
            .move_marker(id, position, self.method, &self.scenario)
        {
            Ok(Some(command)) => {
                if let Command::Move { to, .. } = &command {
                    tracing::info!(
                        "Moved {id} to ({:.2}, {:.2})",
                        to.position.x,
                        to.position.y
                    );
                }
                self.history.record(command);
                self.log.record(Operation::Moved);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                self.note_rejection(&e);
                Err(e)
            }
        }
    }

    /// Remove a marker, returning it
    pub fn delete_marker(&mut self, id: &str) -> Result<Marker, PlacementError> {
        self.interrupt_playback();
        match self.points.delete(id) {
            Ok((marker, command)) => {
                tracing::info!("Deleted {}", marker.label);
                self.history.record(command);
                self.log.record(Operation::Deleted);
                Ok(marker)
            }
            Err(e) => {
                self.note_rejection(&e);
                Err(e)
            }
        }
    }

    /// Remove every marker as one undoable step. Returns how many were removed.
    pub fn clear_markers(&mut self) -> usize {
        self.interrupt_playback();
        match self.points.clear() {
            Some(command) => {
                let removed = match &command {
                    Command::Clear { removed } => removed.len(),
                    _ => 0,
                };
                tracing::info!("Cleared {removed} markers");
                self.history.record(command);
                self.log.record(Operation::Cleared);
                removed
            }
            None => 0,
        }
    }
}
