//! Placement validation.
//!
//! `PlacementValidator` checks a marker configuration against a scenario:
//! required count, grid coverage of the valid area and position legality.
//! Nothing here mutates state; reports are snapshots.

use std::collections::BTreeSet;

use serde::Serialize;
use shared::{GridCell, Marker, Point2D};

use crate::geometry::distance;
use crate::grid::surface_to_grid_cell;
use crate::scenario::Scenario;
use crate::settings::ValidationSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Count,
    Distribution,
    Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationItem {
    pub kind: CheckKind,
    pub name: String,
    pub passed: bool,
    pub message: String,
}

/// Occupied relevant cells over all relevant cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub occupied: usize,
    pub relevant: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub items: Vec<ValidationItem>,
    pub suggestions: Vec<String>,
    pub coverage: Coverage,
    pub required: usize,
    /// Labels of markers failing the legality check
    pub illegal: Vec<String>,
}

impl ValidationReport {
    pub fn item(&self, kind: CheckKind) -> Option<&ValidationItem> {
        self.items.iter().find(|i| i.kind == kind)
    }
}

/// How closely the placed markers reproduce the reference layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceComparison {
    pub matched: usize,
    pub total: usize,
    pub ratio: f64,
    /// Reference positions with no placed marker nearby
    pub unmatched: Vec<Point2D>,
}

/// Validator for a marker configuration in a scenario.
pub struct PlacementValidator<'a> {
    scenario: &'a Scenario,
    markers: &'a [Marker],
    settings: &'a ValidationSettings,
}

impl<'a> PlacementValidator<'a> {
    pub fn new(
        scenario: &'a Scenario,
        markers: &'a [Marker],
        settings: &'a ValidationSettings,
    ) -> Self {
        Self {
            scenario,
            markers,
            settings,
        }
    }

    /// Required minimum marker count.
    pub fn required_count(&self) -> usize {
        self.scenario.minimum_points()
    }

    pub fn is_count_sufficient(&self) -> bool {
        self.markers.len() >= self.required_count()
    }

    /// Grid cell holding a marker, clamped so points on the far edge land in the last cell.
    fn marker_cell(&self, position: Point2D) -> GridCell {
        let (cols, rows) = self.scenario.grid_dimensions();
        let cell = surface_to_grid_cell(position, self.scenario.cell_size());
        GridCell::new(
            cell.col.clamp(0, (cols - 1).max(0)),
            cell.row.clamp(0, (rows - 1).max(0)),
        )
    }

    /// Cells overlapping at least one valid region.
    pub fn relevant_cells(&self) -> BTreeSet<GridCell> {
        let (cols, rows) = self.scenario.grid_dimensions();
        let mut cells = BTreeSet::new();
        for row in 0..rows {
            for col in 0..cols {
                if self.scenario.cell_is_relevant(self.scenario.cell_rect(col, row)) {
                    cells.insert(GridCell::new(col, row));
                }
            }
        }
        cells
    }

    /// Compute coverage of the relevant cells.
    pub fn coverage(&self) -> Coverage {
        let relevant = self.relevant_cells();
        let occupied: BTreeSet<GridCell> = self
            .markers
            .iter()
            .filter(|m| m.position.x.is_finite() && m.position.y.is_finite())
            .map(|m| self.marker_cell(m.position))
            .filter(|c| relevant.contains(c))
            .collect();
        let ratio = if relevant.is_empty() {
            0.0
        } else {
            occupied.len() as f64 / relevant.len() as f64
        };
        Coverage {
            occupied: occupied.len(),
            relevant: relevant.len(),
            ratio,
        }
    }

    pub fn is_distribution_sufficient(&self) -> bool {
        self.coverage().ratio >= self.settings.coverage_threshold
    }

    /// Markers outside the surface, outside every valid region, or inside an invalid one.
    pub fn illegal_markers(&self) -> Vec<&'a Marker> {
        self.markers
            .iter()
            .filter(|m| !self.scenario.is_legal(m.position))
            .collect()
    }

    /// Share of markers passing the legality check; 1 for an empty configuration.
    pub fn legal_fraction(&self) -> f64 {
        if self.markers.is_empty() {
            return 1.0;
        }
        let legal = self.markers.len() - self.illegal_markers().len();
        legal as f64 / self.markers.len() as f64
    }

    fn illegal_reason(&self, position: Point2D) -> String {
        if !self.scenario.contains(position) {
            "outside the surface".to_string()
        } else if let Some(region) = self.scenario.invalid_region_at(position) {
            format!("inside '{}'", region.display_name())
        } else {
            "outside every valid region".to_string()
        }
    }

    /// Run all checks and build the report.
    pub fn validate(&self) -> ValidationReport {
        let n = self.markers.len();
        let required = self.required_count();
        let coverage = self.coverage();
        let threshold = self.settings.coverage_threshold;
        let illegal = self.illegal_markers();

        let mut items = Vec::with_capacity(3);
        let mut suggestions = Vec::new();

        let count_ok = n >= required;
        items.push(ValidationItem {
            kind: CheckKind::Count,
            name: "Point count".to_string(),
            passed: count_ok,
            message: format!("{n} of {required} required points placed"),
        });
        if !count_ok {
            suggestions.push(format!(
                "Add at least {} more point(s): this capacity needs {required}",
                required - n
            ));
        }

        let distribution_ok = coverage.relevant > 0 && coverage.ratio >= threshold;
        items.push(ValidationItem {
            kind: CheckKind::Distribution,
            name: "Distribution".to_string(),
            passed: distribution_ok,
            message: format!(
                "{} of {} grid cells covered ({:.0}%, need {:.0}%)",
                coverage.occupied,
                coverage.relevant,
                coverage.ratio * 100.0,
                threshold * 100.0
            ),
        });
        if !distribution_ok {
            suggestions.push(
                "Spread the points more evenly: some parts of the valid area have no points"
                    .to_string(),
            );
        }

        let position_ok = illegal.is_empty();
        let position_message = if position_ok {
            "All points lie in valid areas".to_string()
        } else {
            let details: Vec<String> = illegal
                .iter()
                .take(5)
                .map(|m| format!("{} {}", m.label, self.illegal_reason(m.position)))
                .collect();
            format!("{} illegal point(s): {}", illegal.len(), details.join(", "))
        };
        items.push(ValidationItem {
            kind: CheckKind::Position,
            name: "Position legality".to_string(),
            passed: position_ok,
            message: position_message,
        });
        if !position_ok {
            suggestions.push(
                "Move or delete points placed outside the valid area or inside excluded zones"
                    .to_string(),
            );
        }

        ValidationReport {
            passed: count_ok && distribution_ok && position_ok,
            items,
            suggestions,
            coverage,
            required,
            illegal: illegal.iter().map(|m| m.label.clone()).collect(),
        }
    }

    /// Match reference points to placed markers within the tolerance radius.
    /// Each marker matches at most one reference point. `None` without a reference layout.
    pub fn compare_to_reference(&self) -> Option<ReferenceComparison> {
        let reference = self.scenario.reference_points();
        if reference.is_empty() {
            return None;
        }
        let radius = self.settings.reference_tolerance * self.scenario.cell_size();
        let mut used = vec![false; self.markers.len()];
        let mut unmatched = Vec::new();

        for &target in reference {
            let nearest = self
                .markers
                .iter()
                .enumerate()
                .filter(|(i, _)| !used[*i])
                .map(|(i, m)| (i, distance(m.position, target)))
                .filter(|(_, d)| *d <= radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match nearest {
                Some((i, _)) => used[i] = true,
                None => unmatched.push(target),
            }
        }

        let total = reference.len();
        let matched = total - unmatched.len();
        Some(ReferenceComparison {
            matched,
            total,
            ratio: matched as f64 / total as f64,
            unmatched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn scenario() -> Scenario {
        Scenario::load(default_scenario()).unwrap()
    }

    fn reference_markers() -> Vec<Marker> {
        reference_layout()
            .iter()
            .enumerate()
            .map(|(i, p)| marker(&format!("m{i}"), &format!("S{}", i + 1), p.x, p.y))
            .collect()
    }

    #[test]
    fn test_reference_layout_passes() {
        let s = scenario();
        let markers = reference_markers();
        let settings = ValidationSettings::default();
        let report = PlacementValidator::new(&s, &markers, &settings).validate();
        assert!(report.passed, "Report: {:?}", report);
        assert!(report.suggestions.is_empty());
        assert_eq!(report.coverage.relevant, 20);
        assert_eq!(report.coverage.occupied, 12);
        assert_eq!(report.required, 12);
    }

    #[test]
    fn test_empty_fails_count_and_distribution() {
        let s = scenario();
        let settings = ValidationSettings::default();
        let report = PlacementValidator::new(&s, &[], &settings).validate();
        assert!(!report.passed);
        assert!(!report.item(CheckKind::Count).unwrap().passed);
        assert!(!report.item(CheckKind::Distribution).unwrap().passed);
        assert!(report.item(CheckKind::Position).unwrap().passed);
        assert_eq!(report.suggestions.len(), 2);
        assert_eq!(report.coverage.ratio, 0.0);
    }

    #[test]
    fn test_clustered_points_fail_distribution() {
        let s = scenario();
        let markers: Vec<Marker> = (0..12)
            .map(|i| marker(&format!("m{i}"), &format!("S{}", i + 1), 5.0 + i as f64 * 0.1, 5.0))
            .collect();
        let settings = ValidationSettings::default();
        let v = PlacementValidator::new(&s, &markers, &settings);
        let report = v.validate();
        assert!(report.item(CheckKind::Count).unwrap().passed);
        assert!(!report.item(CheckKind::Distribution).unwrap().passed);
        assert_eq!(report.coverage.occupied, 1);
        assert_eq!(report.suggestions.len(), 1);
    }

    #[test]
    fn test_illegal_marker_reported() {
        let s = scenario();
        // (1, 1) is on the surface but outside the storage floor
        let markers = vec![marker("a", "S1", 1.0, 1.0), marker("b", "S2", 20.0, 20.0)];
        let settings = ValidationSettings::default();
        let v = PlacementValidator::new(&s, &markers, &settings);
        let report = v.validate();
        assert!(!report.item(CheckKind::Position).unwrap().passed);
        assert_eq!(report.illegal, vec!["S1".to_string()]);
        assert_eq!(v.legal_fraction(), 0.5);
    }

    #[test]
    fn test_point_on_far_edge_counts_in_last_cell() {
        let s = Scenario::load(open_square_scenario()).unwrap();
        let markers = vec![marker("a", "S1", 20.0, 20.0)];
        let settings = ValidationSettings::default();
        let c = PlacementValidator::new(&s, &markers, &settings).coverage();
        assert_eq!(c.relevant, 4);
        assert_eq!(c.occupied, 1);
    }

    #[test]
    fn test_full_cover_with_fractional_cell_size() {
        let mut d = scenario_with(
            vec![polygon_region(
                "all",
                &[(0.0, 0.0), (2.1, 0.0), (2.1, 2.1), (0.0, 2.1)],
            )],
            vec![],
        );
        d.surface = shared::Surface {
            width: 2.1,
            height: 2.1,
        };
        d.cell_size = 0.3;
        let s = Scenario::load(d).unwrap();
        let markers: Vec<Marker> = (0..49)
            .map(|i| {
                let (col, row) = ((i % 7) as f64, (i / 7) as f64);
                marker(&format!("m{i}"), &format!("S{}", i + 1), col * 0.3 + 0.15, row * 0.3 + 0.15)
            })
            .collect();
        let settings = ValidationSettings::default();
        let c = PlacementValidator::new(&s, &markers, &settings).coverage();
        assert_eq!(c.relevant, 49);
        assert_eq!(c.occupied, 49);
        assert_eq!(c.ratio, 1.0);
    }

    #[test]
    fn test_no_relevant_cells_gives_zero_coverage() {
        // valid region lies entirely off the surface
        let d = scenario_with(vec![rect_region("far", 200.0, 200.0, 5.0, 5.0)], vec![]);
        let s = Scenario::load(d).unwrap();
        let markers = vec![marker("a", "S1", 10.0, 10.0)];
        let settings = ValidationSettings::default();
        let c = PlacementValidator::new(&s, &markers, &settings).coverage();
        assert_eq!(c.relevant, 0);
        assert_eq!(c.ratio, 0.0);
    }

    #[test]
    fn test_reference_comparison() {
        let s = scenario();
        let mut markers = reference_markers();
        markers.truncate(6);
        // Slightly off target still matches
        markers[0].position = Point2D::new(12.0, 11.0);
        let settings = ValidationSettings::default();
        let cmp = PlacementValidator::new(&s, &markers, &settings)
            .compare_to_reference()
            .unwrap();
        assert_eq!(cmp.total, 12);
        assert_eq!(cmp.matched, 6);
        assert_eq!(cmp.unmatched.len(), 6);
        assert!((cmp.ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reference_comparison_absent_without_reference() {
        let s = Scenario::load(open_square_scenario()).unwrap();
        let settings = ValidationSettings::default();
        assert!(PlacementValidator::new(&s, &[], &settings)
            .compare_to_reference()
            .is_none());
    }
}
