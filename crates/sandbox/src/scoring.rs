//! Weighted score over four components, plus grade and achievement bonus.

use serde::{Deserialize, Serialize};
use shared::{Judgment, Marker, PlacementMethod};

use crate::scenario::Scenario;
use crate::settings::ValidationSettings;
use crate::state::operation_log::{Operation, OperationLog};
use crate::validation::PlacementValidator;

/// Component weights; must sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    pub count: f64,
    pub distribution: f64,
    pub method: f64,
    pub operation: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.count + self.distribution + self.method + self.operation
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-9
    }
}

pub const WEIGHTS: ScoreWeights = ScoreWeights {
    count: 0.30,
    distribution: 0.30,
    method: 0.20,
    operation: 0.20,
};

const WEIGHT_SUM: f64 = WEIGHTS.count + WEIGHTS.distribution + WEIGHTS.method + WEIGHTS.operation;
const _: () = assert!(
    WEIGHT_SUM > 1.0 - 1e-9 && WEIGHT_SUM < 1.0 + 1e-9,
    "score weights must sum to 1"
);

/// Added when the count hits the minimum exactly and the judgment is right
pub const ACHIEVEMENT_BONUS: f64 = 5.0;

/// Method score lost per rank step away from the recommended method
pub const METHOD_RANK_PENALTY: f64 = 25.0;

// Operation-standard penalties
pub const REJECTED_PENALTY: f64 = 5.0;
pub const DELETE_PENALTY: f64 = 3.0;
pub const CLEAR_PENALTY: f64 = 10.0;
pub const UNDO_PENALTY: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Pass,
    Fail,
}

impl Grade {
    pub fn from_total(total: f64) -> Self {
        if total >= 80.0 {
            Grade::Excellent
        } else if total >= 60.0 {
            Grade::Pass
        } else {
            Grade::Fail
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Pass => "Pass",
            Grade::Fail => "Fail",
        }
    }
}

/// What the learner submits alongside the configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Submission {
    pub method: PlacementMethod,
    #[serde(default)]
    pub judgment: Option<Judgment>,
}

/// Component scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub count: f64,
    pub distribution: f64,
    pub method: f64,
    pub operation: f64,
    pub bonus: f64,
}

impl ScoreBreakdown {
    /// Σ weight·component, without the bonus
    pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
        self.count * weights.count
            + self.distribution * weights.distribution
            + self.method * weights.method
            + self.operation * weights.operation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub breakdown: ScoreBreakdown,
    pub weighted: f64,
    pub total: f64,
    pub grade: Grade,
    pub coverage: f64,
    pub legal_fraction: f64,
}

/// `100 − 25·|rank(used) − rank(recommended)|`, floored at 0
pub fn method_score(used: PlacementMethod, recommended: PlacementMethod) -> f64 {
    let diff = (used.rank() as f64 - recommended.rank() as f64).abs();
    (100.0 - METHOD_RANK_PENALTY * diff).max(0.0)
}

/// Starts at 100 and loses points for rejected, deleted, cleared and undone work
pub fn operation_score(log: &OperationLog) -> f64 {
    let penalty = REJECTED_PENALTY * log.count(Operation::Rejected) as f64
        + DELETE_PENALTY * log.count(Operation::Deleted) as f64
        + CLEAR_PENALTY * log.count(Operation::Cleared) as f64
        + UNDO_PENALTY * log.count(Operation::Undone) as f64;
    (100.0 - penalty).max(0.0)
}

/// Score a configuration. Read-only.
pub fn calculate(
    scenario: &Scenario,
    markers: &[Marker],
    log: &OperationLog,
    submission: &Submission,
    settings: &ValidationSettings,
) -> ScoreReport {
    let validator = PlacementValidator::new(scenario, markers, settings);
    let n = markers.len();
    let required = scenario.minimum_points();

    let count = (n as f64 / required as f64).min(1.0) * 100.0;

    let coverage = validator.coverage().ratio;
    let legal_fraction = validator.legal_fraction();
    let threshold = settings.coverage_threshold;
    let coverage_share = if threshold > 0.0 {
        (coverage / threshold).min(1.0)
    } else {
        1.0
    };
    let distribution = coverage_share * 100.0 * legal_fraction;

    let method = method_score(submission.method, scenario.recommended_method());
    let operation = operation_score(log);

    let judged_right =
        submission.judgment.is_some() && submission.judgment == scenario.expected_judgment();
    let bonus = if n == required && judged_right {
        ACHIEVEMENT_BONUS
    } else {
        0.0
    };

    let breakdown = ScoreBreakdown {
        count,
        distribution,
        method,
        operation,
        bonus,
    };
    let weighted = breakdown.weighted(&WEIGHTS);
    let total = (weighted + bonus).clamp(0.0, 100.0);

    ScoreReport {
        breakdown,
        weighted,
        total,
        grade: Grade::from_total(total),
        coverage,
        legal_fraction,
    }
}
