//! Guided playback of the reference layout

use shared::Point2D;

use super::Session;
use crate::error::SessionError;
use crate::layout::{suggest_layout, DEFAULT_SEED};
use crate::state::playback::PlaybackStep;

impl Session {
    /// Points shown by playback: the scenario's reference layout, or a suggested
    /// layout for the recommended method when the scenario has none
    pub fn playback_points(&self) -> Vec<Point2D> {
        let reference = self.scenario.reference_points();
        if !reference.is_empty() {
            return reference.to_vec();
        }
        suggest_layout(
            self.scenario.recommended_method(),
            &self.scenario,
            self.scenario.minimum_points(),
            DEFAULT_SEED,
        )
    }

    /// Start playback, returning the number of steps queued
    pub fn start_playback(&mut self) -> Result<usize, SessionError> {
        let points = self.playback_points();
        if points.is_empty() {
            tracing::warn!("No playback layout for scenario '{}'", self.scenario.id());
            return Err(SessionError::EmptyPlayback);
        }
        self.playback
            .start(&points, self.settings.view.playback_delay_ms);
        tracing::debug!("Playback started with {} steps", points.len());
        Ok(points.len())
    }

    /// Next playback step; `None` once finished or cancelled
    pub fn advance_playback(&mut self) -> Option<PlaybackStep> {
        let step = self.playback.advance()?;
        tracing::debug!("Playback step {}", step.label);
        Some(step)
    }

    pub fn cancel_playback(&mut self) -> bool {
        self.playback.cancel()
    }
}
