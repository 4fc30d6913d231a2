//! Suggested demonstration layouts for each placement method.
//!
//! Used for guided playback when a scenario ships no reference layout.
//! Only legal positions are returned, so a layout can be shorter than asked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{PlacementMethod, Point2D};

use crate::scenario::Scenario;

/// Seed used for playback layouts so they repeat between runs
pub const DEFAULT_SEED: u64 = 42;

/// Jitter attempts per stratum before giving up on it
const STRATUM_ATTEMPTS: usize = 16;
/// Random draws allowed per requested point
const RANDOM_ATTEMPTS_PER_POINT: usize = 100;
/// Diagonal candidates per requested point
const DIAGONAL_OVERSAMPLE: usize = 4;

/// Up to `count` legal positions laid out the way `method` prescribes
pub fn suggest_layout(
    method: PlacementMethod,
    scenario: &Scenario,
    count: usize,
    seed: u64,
) -> Vec<Point2D> {
    if count == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    match method {
        PlacementMethod::Systematic => spread(grid_intersections(scenario), count),
        PlacementMethod::Diagonal => spread(diagonal_points(scenario, count), count),
        PlacementMethod::Stratified => spread(stratum_points(scenario, &mut rng), count),
        PlacementMethod::Random => random_points(scenario, count, &mut rng),
    }
}

/// Pick `count` items evenly across `points`, keeping order
fn spread(points: Vec<Point2D>, count: usize) -> Vec<Point2D> {
    if points.len() <= count {
        return points;
    }
    let len = points.len();
    (0..count).map(|i| points[i * len / count]).collect()
}

fn grid_intersections(scenario: &Scenario) -> Vec<Point2D> {
    let (cols, rows) = scenario.grid_dimensions();
    let cell = scenario.cell_size();
    let mut points = Vec::new();
    for row in 0..=rows {
        for col in 0..=cols {
            let p = Point2D::new(col as f64 * cell, row as f64 * cell);
            if scenario.is_legal(p) {
                points.push(p);
            }
        }
    }
    points
}

fn diagonal_points(scenario: &Scenario, count: usize) -> Vec<Point2D> {
    let surface = scenario.surface();
    let samples = count * DIAGONAL_OVERSAMPLE;
    (0..samples)
        .map(|i| {
            let t = (i as f64 + 0.5) / samples as f64;
            Point2D::new(surface.width * t, surface.height * t)
        })
        .filter(|p| scenario.is_legal(*p))
        .collect()
}

/// One jittered point per relevant cell
fn stratum_points(scenario: &Scenario, rng: &mut StdRng) -> Vec<Point2D> {
    let (cols, rows) = scenario.grid_dimensions();
    let mut points = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let rect = scenario.cell_rect(col, row);
            if !scenario.cell_is_relevant(rect) {
                continue;
            }
            let found = (0..STRATUM_ATTEMPTS)
                .map(|_| {
                    Point2D::new(
                        rng.gen_range(rect.x0..=rect.x1),
                        rng.gen_range(rect.y0..=rect.y1),
                    )
                })
                .find(|p| scenario.is_legal(*p));
            if let Some(p) = found {
                points.push(p);
            }
        }
    }
    points
}

fn random_points(scenario: &Scenario, count: usize, rng: &mut StdRng) -> Vec<Point2D> {
    let surface = scenario.surface();
    let mut points = Vec::with_capacity(count);
    for _ in 0..count * RANDOM_ATTEMPTS_PER_POINT {
        if points.len() == count {
            break;
        }
        let p = Point2D::new(
            rng.gen_range(0.0..=surface.width),
            rng.gen_range(0.0..=surface.height),
        );
        if scenario.is_legal(p) {
            points.push(p);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{default_scenario, open_square_scenario};

    fn scenario() -> Scenario {
        Scenario::load(default_scenario()).unwrap()
    }

    #[test]
    fn test_systematic_matches_reference_grid() {
        let s = scenario();
        let layout = suggest_layout(PlacementMethod::Systematic, &s, 12, DEFAULT_SEED);
        assert_eq!(layout, s.reference_points().to_vec());
    }

    #[test]
    fn test_every_method_yields_legal_points() {
        let s = scenario();
        for &method in PlacementMethod::all() {
            let layout = suggest_layout(method, &s, 8, DEFAULT_SEED);
            assert!(!layout.is_empty(), "{method:?} produced nothing");
            assert!(layout.len() <= 8);
            assert!(layout.iter().all(|p| s.is_legal(*p)), "{method:?}");
        }
    }

    #[test]
    fn test_seeded_layouts_repeat() {
        let s = scenario();
        let a = suggest_layout(PlacementMethod::Random, &s, 10, 7);
        let b = suggest_layout(PlacementMethod::Random, &s, 10, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_stratified_one_point_per_cell() {
        let s = Scenario::load(open_square_scenario()).unwrap();
        let layout = suggest_layout(PlacementMethod::Stratified, &s, 4, DEFAULT_SEED);
        assert_eq!(layout.len(), 4);
        let mut cells: Vec<_> = layout
            .iter()
            .map(|p| ((p.x / 10.0).floor().min(1.0) as i64, (p.y / 10.0).floor().min(1.0) as i64))
            .collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_diagonal_lies_on_diagonal() {
        let s = Scenario::load(open_square_scenario()).unwrap();
        let layout = suggest_layout(PlacementMethod::Diagonal, &s, 5, DEFAULT_SEED);
        assert_eq!(layout.len(), 5);
        assert!(layout.iter().all(|p| (p.x - p.y).abs() < 1e-9));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let s = scenario();
        assert!(suggest_layout(PlacementMethod::Systematic, &s, 0, DEFAULT_SEED).is_empty());
    }
}
