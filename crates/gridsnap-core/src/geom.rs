//! Integer pixel geometry shared by the snapper and its callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing geometry and enum values out of text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected {expected} comma-separated integers, got {got:?}")]
    WrongArity { expected: usize, got: String },
    #[error("Invalid integer {0:?}")]
    InvalidInt(String),
    #[error("Unknown {kind} {name:?} (expected one of: {choices})")]
    UnknownName {
        kind: &'static str,
        name: String,
        choices: String,
    },
}

/// Parse exactly `N` comma-separated integers.
fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], ParseError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(ParseError::WrongArity {
            expected: N,
            got: s.to_string(),
        });
    }
    let mut out = [0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| ParseError::InvalidInt(part.to_string()))?;
    }
    Ok(out)
}

/// A point on the pixel grid of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a canvas point to the nearest pixel.
    pub fn from_canvas(point: kurbo::Point) -> Self {
        Self::new(saturate_f64(point.x), saturate_f64(point.y))
    }

    /// The canvas-space position of this pixel.
    pub fn to_canvas(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }

    /// Squared Euclidean distance to a canvas-space position.
    pub(crate) fn distance_sq_to(self, x: f64, y: f64) -> f64 {
        let dx = self.x as f64 - x;
        let dy = self.y as f64 - y;
        dx * dx + dy * dy
    }
}

impl From<kurbo::Point> for Point {
    fn from(point: kurbo::Point) -> Self {
        Self::from_canvas(point)
    }
}

impl From<Point> for kurbo::Point {
    fn from(point: Point) -> Self {
        point.to_canvas()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y] = parse_ints::<2>(s)?;
        Ok(Self::new(x, y))
    }
}

/// Origin and cell size of a grid.
///
/// For a rectangular grid `w`/`h` are the cell dimensions. For an isometric
/// grid they are the bounding box of one diamond tile. A grid whose width or
/// height is not positive is empty and snaps nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Check if the grid has no area.
    pub const fn is_empty(&self) -> bool {
        self.w < 1 || self.h < 1
    }

    /// The first grid cell in canvas space.
    pub fn to_canvas(self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.x as f64,
            self.y as f64,
            self.x as f64 + self.w as f64,
            self.y as f64 + self.h as f64,
        )
    }
}

impl From<GridRect> for kurbo::Rect {
    fn from(grid: GridRect) -> Self {
        grid.to_canvas()
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.w, self.h)
    }
}

impl FromStr for GridRect {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, w, h] = parse_ints::<4>(s)?;
        Ok(Self::new(x, y, w, h))
    }
}

/// Clamp a wide integer back into pixel range.
pub(crate) fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Round to the nearest pixel, half away from zero. NaN maps to 0.
pub(crate) fn saturate_f64(v: f64) -> i32 {
    // `as` saturates on overflow.
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!("3,-4".parse::<Point>().unwrap(), Point::new(3, -4));
        assert_eq!(" 10 , 20 ".parse::<Point>().unwrap(), Point::new(10, 20));
    }

    #[test]
    fn test_parse_point_errors() {
        assert!(matches!(
            "1,2,3".parse::<Point>(),
            Err(ParseError::WrongArity { expected: 2, .. })
        ));
        assert_eq!(
            "1,x".parse::<Point>(),
            Err(ParseError::InvalidInt("x".to_string()))
        );
    }

    #[test]
    fn test_parse_grid_rect() {
        let grid: GridRect = "3,3,10,12".parse().unwrap();
        assert_eq!(grid, GridRect::new(3, 3, 10, 12));
        assert_eq!(grid.to_string(), "3,3,10,12");
        assert!("3,3,10".parse::<GridRect>().is_err());
    }

    #[test]
    fn test_grid_is_empty() {
        assert!(GridRect::new(0, 0, 0, 10).is_empty());
        assert!(GridRect::new(0, 0, 10, 0).is_empty());
        assert!(GridRect::new(0, 0, -4, 10).is_empty());
        assert!(!GridRect::new(-5, -5, 1, 1).is_empty());
    }

    #[test]
    fn test_point_from_canvas_rounds() {
        assert_eq!(Point::from_canvas(kurbo::Point::new(2.4, 2.6)), Point::new(2, 3));
        assert_eq!(Point::from_canvas(kurbo::Point::new(-2.5, 0.5)), Point::new(-3, 1));
        assert_eq!(Point::from_canvas(kurbo::Point::new(1e20, -1e20)), Point::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_grid_to_canvas() {
        let rect = GridRect::new(3, 4, 10, 20).to_canvas();
        assert_eq!(rect, kurbo::Rect::new(3.0, 4.0, 13.0, 24.0));
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(i64::MAX), i32::MAX);
        assert_eq!(saturate(-7), -7);
    }
}
