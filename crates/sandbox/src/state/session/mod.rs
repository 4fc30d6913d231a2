//! Session state management
//!
//! A session owns one loaded scenario and everything the learner does to it:
//! markers, undo/redo history, the operation log, view state and guided playback.

mod history_ops;
mod marker_ops;
mod persistence;
mod playback_ops;

use std::time::Instant;

use shared::{Judgment, Marker, PlacementMethod, ScenarioDescriptor};

use super::history::History;
use super::operation_log::OperationLog;
use super::playback::Playback;
use super::points::PointStore;
use crate::error::ScenarioError;
use crate::grid::ViewTransform;
use crate::scenario::Scenario;
use crate::scoring::{self, ScoreReport, Submission};
use crate::settings::SandboxSettings;
use crate::validation::{PlacementValidator, ReferenceComparison, ValidationReport};

/// Single-owner editing context for one scenario
pub struct Session {
    scenario: Scenario,
    pub(crate) points: PointStore,
    pub(crate) history: History,
    pub(crate) log: OperationLog,
    pub(crate) playback: Playback,
    method: PlacementMethod,
    view: ViewTransform,
    settings: SandboxSettings,
    /// Start of the current timing run
    started: Instant,
    /// Seconds carried over from an imported record
    elapsed_offset: u64,
}

impl Session {
    pub fn new(scenario: Scenario, settings: SandboxSettings) -> Self {
        let mut view = ViewTransform::default();
        view.set_zoom(settings.view.initial_zoom);
        Self {
            scenario,
            points: PointStore::new(settings.labels.clone()),
            history: History::new(settings.history.limit),
            log: OperationLog::default(),
            playback: Playback::default(),
            method: PlacementMethod::default(),
            view,
            settings,
            started: Instant::now(),
            elapsed_offset: 0,
        }
    }

    /// Validate a descriptor and start over with it. On error the current scenario stays.
    pub fn load_scenario(&mut self, descriptor: ScenarioDescriptor) -> Result<(), ScenarioError> {
        let scenario = Scenario::load(descriptor).map_err(|e| {
            tracing::warn!("Scenario rejected: {e}");
            e
        })?;
        tracing::info!(
            "Loaded scenario '{}' ({} valid, {} invalid regions, minimum {} points)",
            scenario.id(),
            scenario.valid_regions().len(),
            scenario.invalid_regions().len(),
            scenario.minimum_points()
        );
        self.scenario = scenario;
        self.reset_editing_state();
        Ok(())
    }

    /// Drop markers, history, log and playback; restart the clock
    pub(crate) fn reset_editing_state(&mut self) {
        self.points = PointStore::new(self.settings.labels.clone());
        self.history.clear();
        self.log.clear();
        self.playback.reset();
        self.started = Instant::now();
        self.elapsed_offset = 0;
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn markers(&self) -> &[Marker] {
        self.points.markers()
    }

    pub fn points(&self) -> &PointStore {
        &self.points
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn settings(&self) -> &SandboxSettings {
        &self.settings
    }

    pub fn method(&self) -> PlacementMethod {
        self.method
    }

    /// Switch placement method. Existing markers stay where they are.
    pub fn set_method(&mut self, method: PlacementMethod) {
        if self.method != method {
            tracing::info!("Placement method: {}", method.display_name());
            self.method = method;
        }
    }

    /// Seconds spent in this session, including time carried over from an import
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_offset + self.started.elapsed().as_secs()
    }

    // ── View ────────────────────────────────────────────────────

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.view.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_by(self.settings.view.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_by(-self.settings.view.zoom_step);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view.pan_by(dx, dy);
    }

    // ── Evaluation ──────────────────────────────────────────────

    fn validator(&self) -> PlacementValidator<'_> {
        PlacementValidator::new(
            &self.scenario,
            self.points.markers(),
            &self.settings.validation,
        )
    }

    pub fn validate(&self) -> ValidationReport {
        self.validator().validate()
    }

    pub fn compare_reference(&self) -> Option<ReferenceComparison> {
        self.validator().compare_to_reference()
    }

    /// Score the current configuration with the active method
    pub fn calculate(&self, judgment: Option<Judgment>) -> ScoreReport {
        let submission = Submission {
            method: self.method,
            judgment,
        };
        scoring::calculate(
            &self.scenario,
            self.points.markers(),
            &self.log,
            &submission,
            &self.settings.validation,
        )
    }
}
