//! Guided playback of a reference layout as a queue of discrete steps.
//!
//! The host drives it: call `advance` whenever its timer fires (each step
//! carries the suggested delay). Playback owns a copy of the points it shows
//! and never touches the point store or history.

use std::collections::VecDeque;

use serde::Serialize;
use shared::Point2D;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackStep {
    pub index: usize,
    pub label: String,
    pub position: Point2D,
    /// Suggested pause before the next step
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct Playback {
    pending: VecDeque<PlaybackStep>,
    shown: Vec<PlaybackStep>,
    status: PlaybackStatus,
}

impl Playback {
    /// Queue one step per point, labelled R1, R2, ...
    pub fn start(&mut self, points: &[Point2D], delay_ms: u64) {
        self.pending = points
            .iter()
            .enumerate()
            .map(|(index, &position)| PlaybackStep {
                index,
                label: format!("R{}", index + 1),
                position,
                delay_ms,
            })
            .collect();
        self.shown.clear();
        self.status = if self.pending.is_empty() {
            PlaybackStatus::Finished
        } else {
            PlaybackStatus::Running
        };
    }

    /// Next step, or `None` once finished or cancelled
    pub fn advance(&mut self) -> Option<PlaybackStep> {
        if self.status != PlaybackStatus::Running {
            return None;
        }
        let step = self.pending.pop_front()?;
        self.shown.push(step.clone());
        if self.pending.is_empty() {
            self.status = PlaybackStatus::Finished;
        }
        Some(step)
    }

    /// Stop a running playback. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.status != PlaybackStatus::Running {
            return false;
        }
        self.pending.clear();
        self.status = PlaybackStatus::Cancelled;
        true
    }

    pub fn is_active(&self) -> bool {
        self.status == PlaybackStatus::Running
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Steps already shown
    pub fn shown(&self) -> &[PlaybackStep] {
        &self.shown
    }

    /// (shown, total) for the current run
    pub fn progress(&self) -> (usize, usize) {
        (self.shown.len(), self.shown.len() + self.pending.len())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts() -> Vec<Point2D> {
        vec![Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0)]
    }

    #[test]
    fn test_runs_to_completion() {
        let mut p = Playback::default();
        p.start(&pts(), 500);
        assert!(p.is_active());
        let first = p.advance().unwrap();
        assert_eq!(first.label, "R1");
        assert_eq!(first.delay_ms, 500);
        assert_eq!(p.progress(), (1, 2));
        assert_eq!(p.advance().unwrap().label, "R2");
        assert_eq!(p.status(), PlaybackStatus::Finished);
        assert!(p.advance().is_none());
    }

    #[test]
    fn test_cancel_stops_steps() {
        let mut p = Playback::default();
        p.start(&pts(), 0);
        p.advance();
        assert!(p.cancel());
        assert_eq!(p.status(), PlaybackStatus::Cancelled);
        assert!(p.advance().is_none());
        assert_eq!(p.shown().len(), 1);
        assert!(!p.cancel());
    }

    #[test]
    fn test_empty_start_is_finished() {
        let mut p = Playback::default();
        p.start(&[], 0);
        assert_eq!(p.status(), PlaybackStatus::Finished);
        assert!(!p.is_active());
    }
}
