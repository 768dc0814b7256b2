//! Caller-owned grid state and its JSON configuration form.

use crate::geom::{GridRect, Point};
use crate::snap::{snap_to_grid_with, GridShape, SnapOptions, SnapPreference, SnapResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default grid cell size in pixels.
pub const DEFAULT_GRID_SIZE: i32 = 16;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The active grid and how points snap to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// When false, snapping leaves every point where it is.
    pub enabled: bool,
    /// Grid origin and cell size.
    pub bounds: GridRect,
    pub shape: GridShape,
    pub prefer: SnapPreference,
    pub options: SnapOptions,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            bounds: GridRect::new(0, 0, DEFAULT_GRID_SIZE, DEFAULT_GRID_SIZE),
            shape: GridShape::default(),
            prefer: SnapPreference::default(),
            options: SnapOptions::default(),
        }
    }
}

impl GridSettings {
    pub fn new(bounds: GridRect, shape: GridShape, prefer: SnapPreference) -> Self {
        Self {
            bounds,
            shape,
            prefer,
            ..Self::default()
        }
    }

    /// Check if snapping would move anything.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.bounds.is_empty()
    }

    /// Snap a pixel point with these settings.
    pub fn snap(&self, point: Point) -> Point {
        if !self.enabled {
            return point;
        }
        snap_to_grid_with(self.bounds, point, self.prefer, self.shape, self.options)
    }

    /// Snap a canvas-space point. The point is rounded to a pixel first.
    pub fn snap_canvas_point(&self, point: kurbo::Point) -> SnapResult {
        if !self.is_active() {
            return SnapResult::none(point);
        }
        let snapped = self.snap(Point::from_canvas(point));
        SnapResult {
            point: snapped.to_canvas(),
            snapped_x: true,
            snapped_y: true,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let settings = Self::from_json(&json)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse {}: {}", path.display(), e)))?;
        log::debug!("Loaded grid settings from {}: {:?}", path.display(), settings);
        if settings.enabled && settings.bounds.is_empty() {
            log::warn!("Grid {} in {} is empty, snapping is disabled", settings.bounds, path.display());
        }
        Ok(settings)
    }
}
