//! Export/import of the persisted session record

use std::collections::HashSet;
use std::time::Instant;

use shared::SessionRecord;

use super::Session;
use crate::error::SessionError;

impl Session {
    /// Snapshot for the host's storage
    pub fn export_state(&self) -> SessionRecord {
        SessionRecord {
            scenario_id: self.scenario.id().to_string(),
            markers: self.points.markers().to_vec(),
            elapsed_time: self.elapsed_seconds(),
            method: self.method,
        }
    }

    /// Restore markers from a record. History and the operation log start over.
    pub fn import_state(&mut self, record: SessionRecord) -> Result<(), SessionError> {
        self.check_record(&record).map_err(|e| {
            tracing::warn!("Import rejected: {e}");
            e
        })?;
        self.interrupt_playback();
        tracing::info!(
            "Imported {} markers for scenario '{}'",
            record.markers.len(),
            record.scenario_id
        );
        self.reset_editing_state();
        self.points.load(record.markers);
        self.method = record.method;
        self.elapsed_offset = record.elapsed_time;
        self.started = Instant::now();
        Ok(())
    }

    fn check_record(&self, record: &SessionRecord) -> Result<(), SessionError> {
        if record.scenario_id != self.scenario.id() {
            return Err(SessionError::ScenarioMismatch {
                expected: self.scenario.id().to_string(),
                found: record.scenario_id.clone(),
            });
        }
        let mut ids = HashSet::new();
        let mut labels = HashSet::new();
        for m in &record.markers {
            if !ids.insert(m.id.as_str()) {
                return Err(SessionError::DuplicateMarkerId(m.id.clone()));
            }
            if !labels.insert(m.label.as_str()) {
                return Err(SessionError::DuplicateLabel(m.label.clone()));
            }
            let p = m.position;
            if !(p.x.is_finite() && p.y.is_finite() && self.scenario.contains(p)) {
                return Err(SessionError::MarkerOutOfBounds(m.id.clone()));
            }
        }
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(&self.export_state())?)
    }

    pub fn import_json(&mut self, json: &str) -> Result<(), SessionError> {
        let record: SessionRecord = serde_json::from_str(json)?;
        self.import_state(record)
    }
}
