use shared::MarkerId;
use thiserror::Error;

/// Scenario descriptor rejected at load time
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("scenario has no valid regions")]
    MissingValidRegions,

    #[error("capacity must be positive, got {0}")]
    NonPositiveCapacity(f64),

    #[error("surface must have positive size, got {width} x {height}")]
    InvalidSurface { width: f64, height: f64 },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f64),

    #[error("cell size {cell_size} splits the surface into too many cells ({cells})")]
    GridTooFine { cell_size: f64, cells: u64 },

    #[error("region '{region}' is malformed: {reason}")]
    InvalidRegion { region: String, reason: String },

    #[error("duplicate region id '{0}'")]
    DuplicateRegionId(String),

    #[error("reference point {index} lies outside the surface")]
    ReferenceOutsideSurface { index: usize },

    #[error("scenario JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A placement or edit the point store refused; state is unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("position ({x:.2}, {y:.2}) is outside the surface")]
    OutOfBounds { x: f64, y: f64 },

    #[error("position ({x:.2}, {y:.2}) lies inside invalid region '{region}'")]
    InInvalidRegion { region: String, x: f64, y: f64 },

    #[error("marker {0} not found")]
    NotFound(MarkerId),
}

/// Session-level failures: imports and playback
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("record belongs to scenario '{found}', active scenario is '{expected}'")]
    ScenarioMismatch { expected: String, found: String },

    #[error("duplicate marker id '{0}' in record")]
    DuplicateMarkerId(String),

    #[error("duplicate marker label '{0}' in record")]
    DuplicateLabel(String),

    #[error("marker '{0}' lies outside the surface")]
    MarkerOutOfBounds(String),

    #[error("nothing to play back for this scenario")]
    EmptyPlayback,

    #[error("record JSON error: {0}")]
    Parse(#[from] serde_json::Error),
}
