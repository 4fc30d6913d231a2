//! JSON command protocol for the host (or an automated agent).
//!
//! Every session operation is reachable as a tagged JSON command; responses
//! carry `success`, an optional `error` and optional `data`.

use serde::{Deserialize, Serialize};
use shared::{Judgment, PlacementMethod, Point2D, ScenarioDescriptor, SessionRecord};

use crate::state::Session;

/// A command the host can execute against a session.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SandboxCommand {
    /// Replace the scenario; markers and history start over
    LoadScenario { scenario: ScenarioDescriptor },
    /// Place a marker. With `screen` the coordinates go through the view transform.
    AddMarker {
        x: f64,
        y: f64,
        #[serde(default)]
        screen: bool,
    },
    MoveMarker { id: String, x: f64, y: f64 },
    DeleteMarker { id: String },
    /// Remove every marker.
    Clear,
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    SetMethod { method: PlacementMethod },
    SetZoom { zoom: f64 },
    /// One zoom step in (wheel up)
    ZoomIn,
    /// One zoom step out (wheel down)
    ZoomOut,
    Pan { dx: f64, dy: f64 },
    /// Run validation and report reference agreement.
    Validate,
    /// Score the configuration with an optional final judgment.
    Score {
        #[serde(default)]
        judgment: Option<Judgment>,
    },
    /// Inspect the session: scenario summary and all markers.
    Inspect,
    ExportState,
    ImportState { record: SessionRecord },
    StartPlayback,
    AdvancePlayback,
    CancelPlayback,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(format!("Failed to serialize response: {e}")),
        }
    }
}

/// Execute a single command on the session.
pub fn execute_command(session: &mut Session, cmd: SandboxCommand) -> CommandResponse {
    match cmd {
        SandboxCommand::LoadScenario { scenario } => match session.load_scenario(scenario) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({
                "id": session.scenario().id(),
                "minimum_points": session.scenario().minimum_points(),
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SandboxCommand::AddMarker { x, y, screen } => {
            let p = Point2D::new(x, y);
            let result = if screen {
                session.add_marker_at_screen(p)
            } else {
                session.add_marker(p)
            };
            match result {
                Ok(marker) => CommandResponse::from_value(&marker),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        SandboxCommand::MoveMarker { id, x, y } => {
            match session.move_marker(&id, Point2D::new(x, y)) {
                Ok(moved) => CommandResponse::ok_with_data(serde_json::json!({ "moved": moved })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        SandboxCommand::DeleteMarker { id } => match session.delete_marker(&id) {
            Ok(marker) => CommandResponse::ok_with_data(serde_json::json!({ "removed": marker.label })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SandboxCommand::Clear => {
            let removed = session.clear_markers();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        SandboxCommand::Undo => {
            let success = session.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        SandboxCommand::Redo => {
            let success = session.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        SandboxCommand::SetMethod { method } => {
            session.set_method(method);
            CommandResponse::ok_with_data(serde_json::json!({ "method": method }))
        }

        SandboxCommand::SetZoom { zoom } => {
            session.set_zoom(zoom);
            CommandResponse::ok_with_data(serde_json::json!({ "zoom": session.view().zoom() }))
        }

        SandboxCommand::ZoomIn => {
            session.zoom_in();
            CommandResponse::ok_with_data(serde_json::json!({ "zoom": session.view().zoom() }))
        }

        SandboxCommand::ZoomOut => {
            session.zoom_out();
            CommandResponse::ok_with_data(serde_json::json!({ "zoom": session.view().zoom() }))
        }

        SandboxCommand::Pan { dx, dy } => {
            session.pan_by(dx, dy);
            CommandResponse::from_value(session.view())
        }

        SandboxCommand::Validate => {
            let report = session.validate();
            let reference = session.compare_reference();
            CommandResponse::from_value(&serde_json::json!({
                "report": report,
                "reference": reference,
            }))
        }

        SandboxCommand::Score { judgment } => CommandResponse::from_value(&session.calculate(judgment)),

        SandboxCommand::Inspect => {
            let scenario = session.scenario();
            let markers: Vec<serde_json::Value> = session
                .markers()
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id,
                        "label": m.label,
                        "x": m.position.x,
                        "y": m.position.y,
                        "cell": m.cell,
                        "legal": scenario.is_legal(m.position),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "scenario": scenario.id(),
                "method": session.method(),
                "minimum_points": scenario.minimum_points(),
                "can_undo": session.can_undo(),
                "can_redo": session.can_redo(),
                "markers": markers,
            }))
        }

        SandboxCommand::ExportState => CommandResponse::from_value(&session.export_state()),

        SandboxCommand::ImportState { record } => match session.import_state(record) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "markers": session.markers().len() })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SandboxCommand::StartPlayback => match session.start_playback() {
            Ok(steps) => CommandResponse::ok_with_data(serde_json::json!({ "steps": steps })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        SandboxCommand::AdvancePlayback => match session.advance_playback() {
            Some(step) => CommandResponse::from_value(&step),
            None => CommandResponse::ok(),
        },

        SandboxCommand::CancelPlayback => {
            let cancelled = session.cancel_playback();
            CommandResponse::ok_with_data(serde_json::json!({ "cancelled": cancelled }))
        }
    }
}

/// Parse and execute a single JSON command.
pub fn execute_json(session: &mut Session, json: &str) -> Result<CommandResponse, String> {
    let cmd: SandboxCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(session, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    session: &mut Session,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<SandboxCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(session, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let json = r#"{"command": "undo"}"#;
        let cmd: SandboxCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, SandboxCommand::Undo));
    }

    #[test]
    fn test_command_serde_add_marker_defaults_to_surface() {
        let json = r#"{"command": "add_marker", "x": 10.0, "y": 20.0}"#;
        let cmd: SandboxCommand = serde_json::from_str(json).unwrap();
        match cmd {
            SandboxCommand::AddMarker { x, y, screen } => {
                assert_eq!((x, y), (10.0, 20.0));
                assert!(!screen);
            }
            _ => panic!("Expected AddMarker"),
        }
    }

    #[test]
    fn test_command_serde_set_method() {
        let json = r#"{"command": "set_method", "method": "diagonal"}"#;
        let cmd: SandboxCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            SandboxCommand::SetMethod {
                method: PlacementMethod::Diagonal
            }
        ));
    }

    #[test]
    fn test_command_serde_score_judgment() {
        let json = r#"{"command": "score", "judgment": "qualified"}"#;
        let cmd: SandboxCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            SandboxCommand::Score {
                judgment: Some(Judgment::Qualified)
            }
        ));
        let bare: SandboxCommand = serde_json::from_str(r#"{"command": "score"}"#).unwrap();
        assert!(matches!(bare, SandboxCommand::Score { judgment: None }));
    }

    #[test]
    fn test_unknown_command_rejected() {
        let json = r#"{"command": "explode"}"#;
        assert!(serde_json::from_str::<SandboxCommand>(json).is_err());
    }

    #[test]
    fn test_response_skips_empty_fields() {
        let json = serde_json::to_string(&CommandResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
