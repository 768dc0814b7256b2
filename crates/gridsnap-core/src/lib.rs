//! GridSnap Core Library
//!
//! Snaps canvas points onto rectangular or isometric grid overlays.

pub mod geom;
pub mod settings;
pub mod snap;

pub use geom::{GridRect, ParseError, Point};
pub use settings::{ConfigError, ConfigResult, GridSettings, DEFAULT_GRID_SIZE};
pub use snap::{
    screen_to_tile, snap_to_grid, snap_to_grid_with, tile_to_screen, GridShape, SnapOptions, SnapPreference,
    SnapResult,
};
