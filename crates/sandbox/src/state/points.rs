//! Point store: the ordered collection of placed markers.
//!
//! Mutating operations return the `Command` that describes them; the caller
//! records it in `History`. `apply` replays any command without producing a
//! new one, which is what undo/redo use.

use std::collections::BTreeSet;

use shared::{Marker, PlacementMethod, Point2D};

use super::history::{Command, Placement};
use crate::error::PlacementError;
use crate::grid::{intersection_index, snap_to_grid};
use crate::scenario::Scenario;
use crate::settings::{LabelPolicy, LabelSettings};

#[derive(Debug, Clone)]
pub struct PointStore {
    markers: Vec<Marker>,
    labels: LabelSettings,
    /// Next logical creation stamp
    next_seq: u64,
    /// Next suffix under `LabelPolicy::Monotonic`
    next_suffix: u32,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new(LabelSettings::default())
    }
}

impl PointStore {
    pub fn new(labels: LabelSettings) -> Self {
        Self {
            markers: Vec::new(),
            labels,
            next_seq: 0,
            next_suffix: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.markers.iter().position(|m| m.id == id)
    }

    fn suffix_of(&self, label: &str) -> Option<u32> {
        label.strip_prefix(self.labels.prefix.as_str())?.parse().ok()
    }

    /// Label the next created marker will receive
    pub fn next_label(&self) -> String {
        let n = match self.labels.policy {
            LabelPolicy::Monotonic => self.next_suffix,
            LabelPolicy::SmallestUnused => {
                let used: BTreeSet<u32> = self
                    .markers
                    .iter()
                    .filter_map(|m| self.suffix_of(&m.label))
                    .collect();
                (1..).find(|n| !used.contains(n)).unwrap_or(1)
            }
        };
        format!("{}{}", self.labels.prefix, n)
    }

    /// Candidate placement for a raw position under a method
    fn place(position: Point2D, method: PlacementMethod, scenario: &Scenario) -> Placement {
        if method.config().snap {
            let snapped = snap_to_grid(position, scenario.cell_size());
            Placement {
                position: snapped,
                cell: Some(intersection_index(snapped, scenario.cell_size())),
            }
        } else {
            Placement { position, cell: None }
        }
    }

    /// Create a marker at `position`. Returns the new marker and its `Add` command.
    pub fn add(
        &mut self,
        position: Point2D,
        method: PlacementMethod,
        scenario: &Scenario,
    ) -> Result<(Marker, Command), PlacementError> {
        let placement = Self::place(position, method, scenario);
        scenario.check_placement(placement.position)?;

        let marker = Marker {
            id: uuid::Uuid::new_v4().to_string(),
            label: self.next_label(),
            position: placement.position,
            cell: placement.cell,
            created_at: self.next_seq,
        };
        let command = Command::Add {
            marker: marker.clone(),
            index: self.markers.len(),
        };
        self.apply(&command);
        Ok((marker, command))
    }

    /// Move a marker. `Ok(None)` when the target equals the current position.
    pub fn move_marker(
        &mut self,
        id: &str,
        position: Point2D,
        method: PlacementMethod,
        scenario: &Scenario,
    ) -> Result<Option<Command>, PlacementError> {
        let current = self
            .get(id)
            .ok_or_else(|| PlacementError::NotFound(id.to_string()))?;
        let to = Self::place(position, method, scenario);
        scenario.check_placement(to.position)?;

        let from = Placement {
            position: current.position,
            cell: current.cell,
        };
        if from == to {
            return Ok(None);
        }
        let command = Command::Move {
            id: id.to_string(),
            from,
            to,
        };
        self.apply(&command);
        Ok(Some(command))
    }

    /// Remove a marker. Returns the removed marker and its `Delete` command.
    pub fn delete(&mut self, id: &str) -> Result<(Marker, Command), PlacementError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| PlacementError::NotFound(id.to_string()))?;
        let marker = self.markers[index].clone();
        let command = Command::Delete {
            marker: marker.clone(),
            index,
        };
        self.apply(&command);
        Ok((marker, command))
    }

    /// Remove every marker. `None` when already empty.
    pub fn clear(&mut self) -> Option<Command> {
        if self.markers.is_empty() {
            return None;
        }
        let command = Command::Clear {
            removed: self.markers.clone(),
        };
        self.apply(&command);
        Some(command)
    }

    /// Apply a command without recording anything
    pub fn apply(&mut self, command: &Command) {
        match command {
            Command::Add { marker, index } => {
                let at = (*index).min(self.markers.len());
                self.markers.insert(at, marker.clone());
                self.note_issued(marker);
            }
            Command::Move { id, to, .. } => {
                if let Some(m) = self.markers.iter_mut().find(|m| m.id == *id) {
                    m.position = to.position;
                    m.cell = to.cell;
                }
            }
            Command::Delete { marker, .. } => {
                self.markers.retain(|m| m.id != marker.id);
            }
            Command::Clear { .. } => {
                self.markers.clear();
            }
            Command::Restore { markers } => {
                self.markers.extend(markers.iter().cloned());
                for m in markers {
                    self.note_issued(m);
                }
            }
        }
    }

    /// Replace the whole collection (import); counters continue after the loaded markers
    pub fn load(&mut self, markers: Vec<Marker>) {
        self.reset();
        for m in &markers {
            self.note_issued(m);
        }
        self.markers = markers;
    }

    /// Drop all markers and restart counters
    pub fn reset(&mut self) {
        self.markers.clear();
        self.next_seq = 0;
        self.next_suffix = 1;
    }

    fn note_issued(&mut self, marker: &Marker) {
        self.next_seq = self.next_seq.max(marker.created_at.saturating_add(1));
        if let Some(n) = self.suffix_of(&marker.label) {
            self.next_suffix = self.next_suffix.max(n.saturating_add(1));
        }
    }
}
