//! Scenario model: validated, immutable exercise definition.
//!
//! A `ScenarioDescriptor` arrives from the host as plain data. `Scenario::load`
//! checks it once; everything downstream can rely on positive sizes, at least
//! one valid region and well-formed shapes.

use std::collections::HashSet;

use kurbo::Rect;
use shared::{Judgment, PlacementMethod, Point2D, Region, RegionShape, ScenarioDescriptor, Surface};

use crate::error::{PlacementError, ScenarioError};
use crate::geometry::{point_in_rectangle, rect_overlaps_region, region_contains};

/// Nominal area one sampling unit is presumed to cover
pub const UNIT_AREA: f64 = 4.0;
/// Hard floor on the required marker count
pub const MIN_POINTS: usize = 5;
/// Upper bound on grid cells, keeps coverage evaluation bounded
pub const MAX_GRID_CELLS: u64 = 250_000;

/// Relative slack when an extent is a whole number of cells
const CELL_FIT_EPS: f64 = 1e-9;

/// Cells needed to cover `extent`. An extent within rounding error of a
/// whole multiple gets no extra sliver cell.
fn cells_along(extent: f64, cell: f64) -> f64 {
    let q = extent / cell;
    let whole = q.round();
    if whole >= 1.0 && (whole * cell - extent).abs() <= CELL_FIT_EPS * extent {
        whole
    } else {
        q.ceil()
    }
}

/// `max(5, ceil(sqrt(capacity / UNIT_AREA)))`
pub fn minimum_points(capacity: f64) -> usize {
    if !(capacity.is_finite() && capacity > 0.0) {
        return MIN_POINTS;
    }
    let raw = (capacity / UNIT_AREA).sqrt().ceil() as usize;
    raw.max(MIN_POINTS)
}

/// Loaded scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    descriptor: ScenarioDescriptor,
}

impl Scenario {
    /// Validate a descriptor and build the scenario
    pub fn load(descriptor: ScenarioDescriptor) -> Result<Self, ScenarioError> {
        let Surface { width, height } = descriptor.surface;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ScenarioError::InvalidSurface { width, height });
        }
        if !(descriptor.capacity.is_finite() && descriptor.capacity > 0.0) {
            return Err(ScenarioError::NonPositiveCapacity(descriptor.capacity));
        }
        let cell = descriptor.cell_size;
        if !(cell.is_finite() && cell > 0.0) {
            return Err(ScenarioError::InvalidCellSize(cell));
        }
        let cells = cells_along(width, cell) * cells_along(height, cell);
        if !cells.is_finite() || cells > MAX_GRID_CELLS as f64 {
            return Err(ScenarioError::GridTooFine {
                cell_size: cell,
                // saturates for huge products
                cells: cells as u64,
            });
        }
        if descriptor.valid_regions.is_empty() {
            return Err(ScenarioError::MissingValidRegions);
        }

        let mut seen = HashSet::new();
        for region in descriptor.valid_regions.iter().chain(&descriptor.invalid_regions) {
            if !seen.insert(region.id.as_str()) {
                return Err(ScenarioError::DuplicateRegionId(region.id.clone()));
            }
            check_region(region)?;
        }

        for (index, p) in descriptor.reference_points.iter().enumerate() {
            if !point_in_rectangle(*p, 0.0, 0.0, width, height) {
                return Err(ScenarioError::ReferenceOutsideSurface { index });
            }
        }

        Ok(Self { descriptor })
    }

    /// Parse and validate a JSON descriptor
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let descriptor: ScenarioDescriptor = serde_json::from_str(json)?;
        Self::load(descriptor)
    }

    pub fn descriptor(&self) -> &ScenarioDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn surface(&self) -> Surface {
        self.descriptor.surface
    }

    pub fn valid_regions(&self) -> &[Region] {
        &self.descriptor.valid_regions
    }

    pub fn invalid_regions(&self) -> &[Region] {
        &self.descriptor.invalid_regions
    }

    pub fn capacity(&self) -> f64 {
        self.descriptor.capacity
    }

    pub fn cell_size(&self) -> f64 {
        self.descriptor.cell_size
    }

    pub fn recommended_method(&self) -> PlacementMethod {
        self.descriptor.recommended_method
    }

    pub fn reference_points(&self) -> &[Point2D] {
        &self.descriptor.reference_points
    }

    pub fn expected_judgment(&self) -> Option<Judgment> {
        self.descriptor.expected_judgment
    }

    /// Required minimum marker count for this scenario's capacity
    pub fn minimum_points(&self) -> usize {
        minimum_points(self.descriptor.capacity)
    }

    /// Grid columns and rows covering the surface
    pub fn grid_dimensions(&self) -> (i64, i64) {
        let Surface { width, height } = self.descriptor.surface;
        let cell = self.descriptor.cell_size;
        (
            cells_along(width, cell) as i64,
            cells_along(height, cell) as i64,
        )
    }

    /// Cell rectangle, clipped to the surface
    pub fn cell_rect(&self, col: i64, row: i64) -> Rect {
        let Surface { width, height } = self.descriptor.surface;
        let cell = self.descriptor.cell_size;
        let x0 = col as f64 * cell;
        let y0 = row as f64 * cell;
        Rect::new(x0, y0, (x0 + cell).min(width), (y0 + cell).min(height))
    }

    pub fn contains(&self, p: Point2D) -> bool {
        let Surface { width, height } = self.descriptor.surface;
        point_in_rectangle(p, 0.0, 0.0, width, height)
    }

    /// First invalid region containing `p`
    pub fn invalid_region_at(&self, p: Point2D) -> Option<&Region> {
        self.descriptor
            .invalid_regions
            .iter()
            .find(|r| region_contains(&r.shape, p))
    }

    /// First valid region containing `p`
    pub fn valid_region_at(&self, p: Point2D) -> Option<&Region> {
        self.descriptor
            .valid_regions
            .iter()
            .find(|r| region_contains(&r.shape, p))
    }

    /// Whether a cell rectangle overlaps any valid region
    pub fn cell_is_relevant(&self, cell: Rect) -> bool {
        self.descriptor
            .valid_regions
            .iter()
            .any(|r| rect_overlaps_region(cell, &r.shape))
    }

    /// Insertion rule: inside the surface and outside every invalid region.
    /// Being inside a valid region is left to the validator.
    pub fn check_placement(&self, p: Point2D) -> Result<(), PlacementError> {
        if !p.x.is_finite() || !p.y.is_finite() || !self.contains(p) {
            return Err(PlacementError::OutOfBounds { x: p.x, y: p.y });
        }
        if let Some(region) = self.invalid_region_at(p) {
            return Err(PlacementError::InInvalidRegion {
                region: region.display_name().to_string(),
                x: p.x,
                y: p.y,
            });
        }
        Ok(())
    }

    /// Full legality: placement rule plus membership in a valid region
    pub fn is_legal(&self, p: Point2D) -> bool {
        self.check_placement(p).is_ok() && self.valid_region_at(p).is_some()
    }
}

fn check_region(region: &Region) -> Result<(), ScenarioError> {
    let bad = |reason: &str| ScenarioError::InvalidRegion {
        region: region.id.clone(),
        reason: reason.to_string(),
    };
    match &region.shape {
        RegionShape::Rectangle { x, y, width, height } => {
            if ![*x, *y, *width, *height].iter().all(|v| v.is_finite()) {
                return Err(bad("non-finite coordinates"));
            }
            if *width <= 0.0 || *height <= 0.0 {
                return Err(bad("rectangle needs positive width and height"));
            }
        }
        RegionShape::Polygon { points } => {
            if points.len() < 3 {
                return Err(bad("polygon needs at least 3 vertices"));
            }
            if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                return Err(bad("non-finite coordinates"));
            }
        }
        RegionShape::Circle { center, radius } => {
            if !center.x.is_finite() || !center.y.is_finite() {
                return Err(bad("non-finite coordinates"));
            }
            if !(radius.is_finite() && *radius > 0.0) {
                return Err(bad("circle needs a positive radius"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{circle_region, default_scenario, rect_region, scenario_with};

    #[test]
    fn test_minimum_points_formula() {
        assert_eq!(minimum_points(200.0), 8);
        assert_eq!(minimum_points(400.0), 10);
    }

    #[test]
    fn test_minimum_points_floor() {
        assert_eq!(minimum_points(1.0), MIN_POINTS);
        assert_eq!(minimum_points(100.0), MIN_POINTS);
        assert_eq!(minimum_points(0.0), MIN_POINTS);
        assert_eq!(minimum_points(f64::NAN), MIN_POINTS);
    }

    #[test]
    fn test_load_default_scenario() {
        let s = Scenario::load(default_scenario()).unwrap();
        assert_eq!(s.minimum_points(), 12);
        assert_eq!(s.grid_dimensions(), (5, 4));
    }

    #[test]
    fn test_load_rejects_missing_valid_regions() {
        let mut d = default_scenario();
        d.valid_regions.clear();
        assert!(matches!(Scenario::load(d), Err(ScenarioError::MissingValidRegions)));
    }

    #[test]
    fn test_load_rejects_non_positive_capacity() {
        let mut d = default_scenario();
        d.capacity = 0.0;
        assert!(matches!(Scenario::load(d), Err(ScenarioError::NonPositiveCapacity(_))));
    }

    #[test]
    fn test_load_rejects_bad_cell_size() {
        let mut d = default_scenario();
        d.cell_size = -2.0;
        assert!(matches!(Scenario::load(d), Err(ScenarioError::InvalidCellSize(_))));

        let mut d = default_scenario();
        d.cell_size = 0.05;
        assert!(matches!(Scenario::load(d), Err(ScenarioError::GridTooFine { .. })));
    }

    #[test]
    fn test_load_rejects_huge_surface() {
        let mut d = default_scenario();
        d.surface = Surface {
            width: 1e10,
            height: 1e10,
        };
        d.cell_size = 1.0;
        match Scenario::load(d) {
            Err(ScenarioError::GridTooFine { cells, .. }) => assert!(cells > MAX_GRID_CELLS),
            other => panic!("Expected GridTooFine, got {other:?}"),
        }

        let mut d = default_scenario();
        d.surface = Surface {
            width: f64::MAX,
            height: f64::MAX,
        };
        d.cell_size = 1e-300;
        assert!(matches!(Scenario::load(d), Err(ScenarioError::GridTooFine { .. })));
    }

    #[test]
    fn test_grid_dimensions_with_fractional_cell() {
        // 2.1 / 0.3 lands just above 7 in floating point
        let mut d = default_scenario();
        d.surface = Surface {
            width: 2.1,
            height: 2.1,
        };
        d.cell_size = 0.3;
        d.valid_regions = vec![rect_region("all", 0.0, 0.0, 2.1, 2.1)];
        d.invalid_regions.clear();
        d.reference_points.clear();
        let s = Scenario::load(d).unwrap();
        assert_eq!(s.grid_dimensions(), (7, 7));
        let last = s.cell_rect(6, 6);
        assert!(last.width() > 0.29);
    }

    #[test]
    fn test_grid_dimensions_partial_cell_kept() {
        let mut d = default_scenario();
        d.cell_size = 15.0;
        let s = Scenario::load(d).unwrap();
        // 50 / 15 and 40 / 15 leave partial cells
        assert_eq!(s.grid_dimensions(), (4, 3));
    }

    #[test]
    fn test_load_rejects_degenerate_region() {
        let d = scenario_with(
            vec![rect_region("floor", 0.0, 0.0, 100.0, 60.0)],
            vec![circle_region("hole", 10.0, 10.0, 0.0)],
        );
        let err = Scenario::load(d).unwrap_err();
        assert!(err.to_string().contains("hole"));
    }

    #[test]
    fn test_load_rejects_duplicate_region_ids() {
        let d = scenario_with(
            vec![rect_region("a", 0.0, 0.0, 10.0, 10.0)],
            vec![rect_region("a", 20.0, 20.0, 5.0, 5.0)],
        );
        assert!(matches!(Scenario::load(d), Err(ScenarioError::DuplicateRegionId(_))));
    }

    #[test]
    fn test_load_rejects_reference_outside_surface() {
        let mut d = default_scenario();
        d.reference_points.push(Point2D::new(500.0, 5.0));
        assert!(matches!(
            Scenario::load(d),
            Err(ScenarioError::ReferenceOutsideSurface { .. })
        ));
    }

    #[test]
    fn test_from_json_parse_error() {
        assert!(matches!(Scenario::from_json("{"), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn test_check_placement_names_region() {
        let s = Scenario::load(default_scenario()).unwrap();
        match s.check_placement(Point2D::new(25.0, 20.0)) {
            Err(PlacementError::InInvalidRegion { region, .. }) => {
                assert_eq!(region, "Ventilation shaft")
            }
            other => panic!("Expected InInvalidRegion, got {other:?}"),
        }
        assert!(matches!(
            s.check_placement(Point2D::new(-1.0, 30.0)),
            Err(PlacementError::OutOfBounds { .. })
        ));
        assert!(s.check_placement(Point2D::new(20.0, 20.0)).is_ok());
    }

    #[test]
    fn test_is_legal_requires_valid_region() {
        let s = Scenario::load(default_scenario()).unwrap();
        // Inside the surface margin but outside the storage floor
        assert!(s.check_placement(Point2D::new(1.0, 1.0)).is_ok());
        assert!(!s.is_legal(Point2D::new(1.0, 1.0)));
        assert!(s.is_legal(Point2D::new(20.0, 20.0)));
    }

    #[test]
    fn test_cell_rect_is_clipped() {
        let mut d = default_scenario();
        d.cell_size = 40.0;
        let s = Scenario::load(d).unwrap();
        assert_eq!(s.grid_dimensions(), (2, 1));
        let last = s.cell_rect(1, 0);
        assert_eq!(last.x0, 40.0);
        assert_eq!(last.x1, 50.0);
        assert_eq!(last.y1, 40.0);
    }
}
