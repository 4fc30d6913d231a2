//! Factory functions for scenarios and markers.
//!
//! Used by tests, and by the binary as the fallback scenario when the host
//! supplies none or a malformed one.

use shared::*;

// ── Region factories ────────────────────────────────────────────

/// Rectangle region without a display label.
pub fn rect_region(id: &str, x: f64, y: f64, width: f64, height: f64) -> Region {
    Region {
        id: id.to_string(),
        label: None,
        shape: RegionShape::Rectangle { x, y, width, height },
    }
}

/// Circle region without a display label.
pub fn circle_region(id: &str, cx: f64, cy: f64, radius: f64) -> Region {
    Region {
        id: id.to_string(),
        label: None,
        shape: RegionShape::Circle {
            center: Point2D::new(cx, cy),
            radius,
        },
    }
}

/// Polygon region from `(x, y)` pairs.
pub fn polygon_region(id: &str, points: &[(f64, f64)]) -> Region {
    Region {
        id: id.to_string(),
        label: None,
        shape: RegionShape::Polygon {
            points: points.iter().map(|&(x, y)| Point2D::new(x, y)).collect(),
        },
    }
}

/// Attach a display label.
pub fn labeled(mut region: Region, label: &str) -> Region {
    region.label = Some(label.to_string());
    region
}

// ── Scenario factories ──────────────────────────────────────────

/// Stockpile exercise: 50 × 40 surface, 10-unit grid, capacity 500
/// (minimum 12 markers), a ventilation shaft and a loading bay to avoid.
/// The reference layout covers exactly 60% of the grid cells.
pub fn default_scenario() -> ScenarioDescriptor {
    let mut reference_points = Vec::new();
    for y in [10.0, 20.0, 30.0] {
        for x in [10.0, 20.0, 30.0, 40.0] {
            reference_points.push(Point2D::new(x, y));
        }
    }

    ScenarioDescriptor {
        id: "stockpile-basic".to_string(),
        name: "Warehouse stockpile".to_string(),
        description: "Place sampling points over the storage floor, avoiding the shaft and the loading bay."
            .to_string(),
        surface: Surface {
            width: 50.0,
            height: 40.0,
        },
        valid_regions: vec![labeled(rect_region("floor", 2.0, 2.0, 46.0, 36.0), "Storage floor")],
        invalid_regions: vec![
            labeled(circle_region("shaft", 25.0, 20.0, 4.0), "Ventilation shaft"),
            labeled(rect_region("bay", 42.0, 2.0, 6.0, 6.0), "Loading bay"),
        ],
        capacity: 500.0,
        cell_size: 10.0,
        recommended_method: PlacementMethod::Systematic,
        reference_points,
        expected_judgment: Some(Judgment::Qualified),
    }
}

/// Scenario on a 100 × 60 surface with the given regions and default numbers.
pub fn scenario_with(valid: Vec<Region>, invalid: Vec<Region>) -> ScenarioDescriptor {
    ScenarioDescriptor {
        id: "custom".to_string(),
        name: "Custom".to_string(),
        description: String::new(),
        surface: Surface {
            width: 100.0,
            height: 60.0,
        },
        valid_regions: valid,
        invalid_regions: invalid,
        capacity: 200.0,
        cell_size: 10.0,
        recommended_method: PlacementMethod::Systematic,
        reference_points: vec![],
        expected_judgment: None,
    }
}

/// Small 20 × 20 scenario, 10-unit cells, whole surface valid, no obstacles.
pub fn open_square_scenario() -> ScenarioDescriptor {
    let mut d = scenario_with(vec![rect_region("all", 0.0, 0.0, 20.0, 20.0)], vec![]);
    d.id = "open-square".to_string();
    d.surface = Surface {
        width: 20.0,
        height: 20.0,
    };
    d.capacity = 16.0;
    d
}

// ── Marker factories ────────────────────────────────────────────

/// Marker with a fixed id and no grid cell.
pub fn marker(id: &str, label: &str, x: f64, y: f64) -> Marker {
    Marker {
        id: id.to_string(),
        label: label.to_string(),
        position: Point2D::new(x, y),
        cell: None,
        created_at: 0,
    }
}

/// The twelve reference positions of the default scenario.
pub fn reference_layout() -> Vec<Point2D> {
    default_scenario().reference_points
}
