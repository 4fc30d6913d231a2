//! Grid snapping and screen/surface transforms.

use serde::Serialize;
use shared::{GridCell, Point2D};

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

// ============================================================================
// Snap (привязка к сетке)
// ============================================================================

/// Round a single coordinate to the nearest multiple of `cell_size`.
/// Exact halves go to the lower multiple.
pub fn snap_value(value: f64, cell_size: f64) -> f64 {
    if !(cell_size.is_finite() && cell_size > 0.0) || !value.is_finite() {
        return value;
    }
    let q = value / cell_size;
    let lower = q.floor();
    let k = if q - lower > 0.5 { lower + 1.0 } else { lower };
    k * cell_size
}

/// Snap a point to the nearest grid intersection
pub fn snap_to_grid(point: Point2D, cell_size: f64) -> Point2D {
    Point2D::new(snap_value(point.x, cell_size), snap_value(point.y, cell_size))
}

/// Indices of the grid intersection nearest to `point`
pub fn intersection_index(point: Point2D, cell_size: f64) -> GridCell {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return GridCell::new(0, 0);
    }
    let snapped = snap_to_grid(point, cell_size);
    GridCell::new(
        (snapped.x / cell_size).round() as i64,
        (snapped.y / cell_size).round() as i64,
    )
}

/// Cell containing `point` (floor of the coordinate over cell size)
pub fn surface_to_grid_cell(point: Point2D, cell_size: f64) -> GridCell {
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return GridCell::new(0, 0);
    }
    GridCell::new(
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
    )
}

// ============================================================================
// View transform
// ============================================================================

/// Clamp a zoom factor into `[MIN_ZOOM, MAX_ZOOM]`. NaN resets to 1.0.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom and pan of the host canvas. Not part of edit history.
/// Serialize-only: every zoom goes through `clamp_zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    zoom: f64,
    pan: Point2D,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point2D::default(),
        }
    }
}

impl ViewTransform {
    pub fn new(zoom: f64, pan: Point2D) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
            pan,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point2D {
        self.pan
    }

    /// Set zoom, clamped into range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Zoom by a signed step (e.g. mouse wheel)
    pub fn zoom_by(&mut self, step: f64) {
        self.set_zoom(self.zoom + step);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = Point2D::new(self.pan.x + dx, self.pan.y + dy);
    }

    /// `surface = (screen - pan) / zoom`
    pub fn screen_to_surface(&self, screen: Point2D) -> Point2D {
        Point2D::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// `screen = surface * zoom + pan`
    pub fn surface_to_screen(&self, surface: Point2D) -> Point2D {
        Point2D::new(
            surface.x * self.zoom + self.pan.x,
            surface.y * self.zoom + self.pan.y,
        )
    }

    /// Grid cell under a screen position
    pub fn screen_to_grid_cell(&self, screen: Point2D, cell_size: f64) -> GridCell {
        surface_to_grid_cell(self.screen_to_surface(screen), cell_size)
    }
}
