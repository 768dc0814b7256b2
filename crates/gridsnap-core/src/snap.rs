//! Snap functionality for aligning points to a rectangular or isometric grid.

use crate::geom::{saturate, saturate_f64, GridRect, ParseError, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which grid-aligned reference point a query point is pulled toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPreference {
    /// Nearest grid vertex.
    #[default]
    ClosestVertex,
    /// Top-left corner of the cell containing the point.
    BoxOrigin,
    /// Bottom-right corner of the cell containing the point.
    BoxEnd,
    /// Round down to the grid.
    FloorGrid,
    /// Round up to the grid, leaving points already on it untouched.
    CeilGrid,
}

impl SnapPreference {
    pub const ALL: [SnapPreference; 5] = [
        SnapPreference::ClosestVertex,
        SnapPreference::BoxOrigin,
        SnapPreference::BoxEnd,
        SnapPreference::FloorGrid,
        SnapPreference::CeilGrid,
    ];

    /// Cycle to the next preference.
    pub fn next(self) -> Self {
        match self {
            SnapPreference::ClosestVertex => SnapPreference::BoxOrigin,
            SnapPreference::BoxOrigin => SnapPreference::BoxEnd,
            SnapPreference::BoxEnd => SnapPreference::FloorGrid,
            SnapPreference::FloorGrid => SnapPreference::CeilGrid,
            SnapPreference::CeilGrid => SnapPreference::ClosestVertex,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SnapPreference::ClosestVertex => "closest-vertex",
            SnapPreference::BoxOrigin => "box-origin",
            SnapPreference::BoxEnd => "box-end",
            SnapPreference::FloorGrid => "floor-grid",
            SnapPreference::CeilGrid => "ceil-grid",
        }
    }
}

impl fmt::Display for SnapPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SnapPreference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ParseError::UnknownName {
                kind: "snap preference",
                name: s.to_string(),
                choices: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Projection used to lay out the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridShape {
    #[default]
    Rectangular,
    /// Diamond tiles; the grid cell is the tile's bounding box.
    Isometric,
}

impl GridShape {
    pub fn name(self) -> &'static str {
        match self {
            GridShape::Rectangular => "rectangular",
            GridShape::Isometric => "isometric",
        }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GridShape {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" => Ok(GridShape::Rectangular),
            "isometric" => Ok(GridShape::Isometric),
            _ => Err(ParseError::UnknownName {
                kind: "grid shape",
                name: s.to_string(),
                choices: "rectangular, isometric".to_string(),
            }),
        }
    }
}

/// Tuning knobs that are off unless a caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapOptions {
    /// On isometric grids, let closest-vertex snapping also land on the
    /// vertical lines through the diamond corners.
    pub vertical_candidates: bool,
}

/// Result of snapping a canvas-space point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: kurbo::Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: kurbo::Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the grid.
///
/// An empty grid leaves the point unchanged.
pub fn snap_to_grid(grid: GridRect, point: Point, prefer: SnapPreference, shape: GridShape) -> Point {
    snap_to_grid_with(grid, point, prefer, shape, SnapOptions::default())
}

/// Snap a point to the grid with explicit options.
pub fn snap_to_grid_with(
    grid: GridRect,
    point: Point,
    prefer: SnapPreference,
    shape: GridShape,
    options: SnapOptions,
) -> Point {
    if grid.is_empty() {
        return point;
    }

    match shape {
        GridShape::Rectangular => Point::new(
            snap_axis(grid.x, grid.w, point.x, prefer),
            snap_axis(grid.y, grid.h, point.y, prefer),
        ),
        GridShape::Isometric => snap_isometric(grid, point, prefer, options),
    }
}

/// Snap one coordinate onto the lines `origin + k * size`.
///
/// Division floors toward negative infinity, so points before the grid
/// origin land on the same lines as points after it.
fn snap_axis(origin: i32, size: i32, value: i32, prefer: SnapPreference) -> i32 {
    let size = size as i64;
    // Truncating remainder: any representative of the phase works.
    let phase = origin as i64 % size;
    let rel = value as i64 - phase;
    let quot = rel.div_euclid(size);
    let rem = rel.rem_euclid(size);

    let snapped = match prefer {
        // Ties round up.
        SnapPreference::ClosestVertex => phase + quot * size + if 2 * rem >= size { size } else { 0 },
        SnapPreference::BoxOrigin | SnapPreference::FloorGrid => phase + quot * size,
        SnapPreference::CeilGrid if rem == 0 => return value,
        SnapPreference::CeilGrid | SnapPreference::BoxEnd => phase + (quot + 1) * size,
    };
    saturate(snapped)
}

fn half_extents(grid: GridRect) -> (f64, f64) {
    (grid.w as f64 / 2.0, grid.h as f64 / 2.0)
}

/// Convert a screen point into fractional tile coordinates of an isometric
/// grid (inverse diamond projection).
///
/// Returns `None` for an empty grid.
pub fn screen_to_tile(grid: GridRect, point: Point) -> Option<(f64, f64)> {
    if grid.is_empty() {
        return None;
    }
    let (half_w, half_h) = half_extents(grid);
    let rel_x = point.x as f64 - grid.x as f64;
    let rel_y = point.y as f64 - grid.y as f64;
    let u = rel_x / half_w;
    let v = rel_y / half_h;
    Some(((u + v) / 2.0, (v - u) / 2.0))
}

/// Screen position of a tile vertex, before pixel rounding.
fn project(grid: GridRect, tile_x: f64, tile_y: f64) -> (f64, f64) {
    let (half_w, half_h) = half_extents(grid);
    (
        grid.x as f64 + (tile_x - tile_y) * half_w,
        grid.y as f64 + (tile_x + tile_y) * half_h,
    )
}

/// Project integer tile coordinates of an isometric grid to the nearest
/// screen pixel.
pub fn tile_to_screen(grid: GridRect, tile_x: i32, tile_y: i32) -> Point {
    let (x, y) = project(grid, tile_x as f64, tile_y as f64);
    Point::new(saturate_f64(x), saturate_f64(y))
}

fn snap_isometric(grid: GridRect, point: Point, prefer: SnapPreference, options: SnapOptions) -> Point {
    let Some((tile_x, tile_y)) = screen_to_tile(grid, point) else {
        return point;
    };

    let (tx, ty) = match prefer {
        SnapPreference::ClosestVertex => nearest_corner(grid, point, tile_x, tile_y),
        SnapPreference::BoxOrigin | SnapPreference::FloorGrid => (tile_x.floor(), tile_y.floor()),
        SnapPreference::BoxEnd | SnapPreference::CeilGrid => (tile_x.ceil(), tile_y.ceil()),
    };

    let (x, y) = project(grid, tx, ty);
    let best = Point::new(saturate_f64(x), saturate_f64(y));

    if options.vertical_candidates && prefer == SnapPreference::ClosestVertex {
        let vertical = nearest_on_verticals(grid, point);
        let (px, py) = (point.x as f64, point.y as f64);
        if vertical.distance_sq_to(px, py) < best.distance_sq_to(px, py) {
            return vertical;
        }
    }

    best
}

/// Pick the tile vertex closest to `point` on screen.
///
/// Rounding the tile coordinates is the starting guess; on a non-square
/// projection another corner of the enclosing tile can be nearer.
fn nearest_corner(grid: GridRect, point: Point, tile_x: f64, tile_y: f64) -> (f64, f64) {
    let (px, py) = (point.x as f64, point.y as f64);
    let dist_sq = |tx: f64, ty: f64| {
        let (sx, sy) = project(grid, tx, ty);
        (sx - px).powi(2) + (sy - py).powi(2)
    };

    let mut best = (tile_x.round(), tile_y.round());
    let mut best_dist = dist_sq(best.0, best.1);

    let (fx, fy) = (tile_x.floor(), tile_y.floor());
    for (cx, cy) in [(fx, fy), (fx + 1.0, fy), (fx, fy + 1.0), (fx + 1.0, fy + 1.0)] {
        let d = dist_sq(cx, cy);
        if d < best_dist {
            best = (cx, cy);
            best_dist = d;
        }
    }
    best
}

/// Nearest point on the vertical lines `x = origin.x + k * w/2` whose y lies
/// on a multiple of `h/2`.
fn nearest_on_verticals(grid: GridRect, point: Point) -> Point {
    let (half_w, half_h) = half_extents(grid);
    let k = ((point.x as f64 - grid.x as f64) / half_w).round();
    let s = ((point.y as f64 - grid.y as f64) / half_h).round();
    Point::new(
        saturate_f64(grid.x as f64 + k * half_w),
        saturate_f64(grid.y as f64 + s * half_h),
    )
}
