//! Geometric predicates and measures on the sampling surface, using kurbo.
//!
//! Every function is total: degenerate input (an empty polygon, a negative
//! radius) yields `false` or `0.0` instead of panicking.

use kurbo::{Circle as KCircle, Point, Rect, Shape};
use shared::{Point2D, RegionShape};

/// Tolerance for "on the boundary" tests
const EPS: f64 = 1e-9;

// ============================================================================
// Kurbo helpers
// ============================================================================

/// Convert a surface point to a kurbo Point
pub fn to_point(p: Point2D) -> Point {
    Point::new(p.x, p.y)
}

/// Convert a kurbo Point back to a surface point
pub fn from_point(p: Point) -> Point2D {
    Point2D::new(p.x, p.y)
}

/// Rectangle from origin corner and size; negative sizes are normalized
pub fn rect_from(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height).abs()
}

// ============================================================================
// Measures
// ============================================================================

/// Euclidean distance
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    to_point(a).distance(to_point(b))
}

/// Area of a `w` × `h` rectangle
pub fn rect_area(width: f64, height: f64) -> f64 {
    width * height
}

/// Shoelace area of a simple polygon. Fewer than 3 vertices gives 0.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    (twice * 0.5).abs()
}

/// Area covered by a region shape
pub fn region_area(shape: &RegionShape) -> f64 {
    match shape {
        RegionShape::Rectangle { width, height, .. } => rect_area(*width, *height).abs(),
        RegionShape::Polygon { points } => polygon_area(points),
        RegionShape::Circle { center, radius } => {
            if *radius <= 0.0 {
                0.0
            } else {
                KCircle::new(to_point(*center), *radius).area()
            }
        }
    }
}

// ============================================================================
// Containment (boundary counts as inside)
// ============================================================================

pub fn point_in_rectangle(p: Point2D, x: f64, y: f64, width: f64, height: f64) -> bool {
    let r = rect_from(x, y, width, height);
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

/// `distance(p, center) <= radius`
pub fn point_in_circle(p: Point2D, center: Point2D, radius: f64) -> bool {
    if radius < 0.0 {
        return false;
    }
    distance(p, center) <= radius
}

/// Whether `p` lies on segment `a`-`b`
pub fn point_on_segment(p: Point2D, a: Point2D, b: Point2D) -> bool {
    let (p, a, b) = (to_point(p), to_point(a), to_point(b));
    let ab = b - a;
    let ap = p - a;
    if ab.hypot2() < EPS {
        return ap.hypot() <= EPS;
    }
    if ab.cross(ap).abs() > EPS * ab.hypot().max(1.0) {
        return false;
    }
    let dot = ap.dot(ab);
    dot >= -EPS && dot <= ab.hypot2() + EPS
}

/// Ray-casting test; vertices and edges count as inside
pub fn point_in_polygon(p: Point2D, points: &[Point2D]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    if (0..n).any(|i| point_on_segment(p, points[i], points[(i + 1) % n])) {
        return true;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Dispatch containment by region shape
pub fn region_contains(shape: &RegionShape, p: Point2D) -> bool {
    match shape {
        RegionShape::Rectangle { x, y, width, height } => {
            point_in_rectangle(p, *x, *y, *width, *height)
        }
        RegionShape::Polygon { points } => point_in_polygon(p, points),
        RegionShape::Circle { center, radius } => point_in_circle(p, *center, *radius),
    }
}

// ============================================================================
// Overlap (used by grid coverage)
// ============================================================================

/// Proper intersection of two segments (touching or collinear overlap excluded)
pub fn segments_intersect(a1: Point2D, a2: Point2D, b1: Point2D, b2: Point2D) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f64 {
        (b - a).cross(c - a)
    }
    let (a1, a2, b1, b2) = (to_point(a1), to_point(a2), to_point(b1), to_point(b2));
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);
    ((d1 > EPS && d2 < -EPS) || (d1 < -EPS && d2 > EPS))
        && ((d3 > EPS && d4 < -EPS) || (d3 < -EPS && d4 > EPS))
}

/// Whether a cell rectangle shares interior area with a region.
/// Touching along an edge does not count.
pub fn rect_overlaps_region(cell: Rect, shape: &RegionShape) -> bool {
    match shape {
        RegionShape::Rectangle { x, y, width, height } => {
            cell.intersect(rect_from(*x, *y, *width, *height)).area() > EPS
        }
        RegionShape::Circle { center, radius } => {
            if *radius <= 0.0 {
                return false;
            }
            let c = to_point(*center);
            let nearest = Point::new(c.x.clamp(cell.x0, cell.x1), c.y.clamp(cell.y0, cell.y1));
            nearest.distance(c) < *radius
        }
        RegionShape::Polygon { points } => {
            if points.len() < 3 {
                return false;
            }
            if point_in_polygon(from_point(cell.center()), points) {
                return true;
            }
            let strictly_inside = |p: &Point2D| {
                p.x > cell.x0 + EPS && p.x < cell.x1 - EPS && p.y > cell.y0 + EPS && p.y < cell.y1 - EPS
            };
            if points.iter().any(strictly_inside) {
                return true;
            }
            let corners = [
                Point2D::new(cell.x0, cell.y0),
                Point2D::new(cell.x1, cell.y0),
                Point2D::new(cell.x1, cell.y1),
                Point2D::new(cell.x0, cell.y1),
            ];
            let n = points.len();
            (0..n).any(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                (0..4).any(|k| segments_intersect(a, b, corners[k], corners[(k + 1) % 4]))
            })
        }
    }
}
