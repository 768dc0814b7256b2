//! Command-line entry point: snap points read from the arguments.
//!
//! ```text
//! gridsnap --grid 0,0,32,16 --shape isometric 20,10 4,10
//! gridsnap --config grid.json --prefer floor-grid -- -3,-3
//! ```

use clap::Parser;
use gridsnap_core::{ConfigError, GridRect, GridSettings, GridShape, Point, SnapPreference};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Snap points onto a rectangular or isometric grid.
#[derive(Parser, Debug)]
#[command(name = "gridsnap", version)]
#[command(about = "Snap points onto a rectangular or isometric grid")]
struct Cli {
    /// JSON grid settings to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid origin and cell size as X,Y,W,H
    #[arg(long, value_name = "X,Y,W,H")]
    grid: Option<GridRect>,

    /// Grid projection: rectangular or isometric
    #[arg(long)]
    shape: Option<GridShape>,

    /// Snap policy: closest-vertex, box-origin, box-end, floor-grid or ceil-grid
    #[arg(long)]
    prefer: Option<SnapPreference>,

    /// Also consider vertical grid lines when snapping to isometric vertices
    #[arg(long)]
    vertical_candidates: bool,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Print the effective grid settings as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Points to snap as X,Y (put negative points after `--`)
    #[arg(value_name = "X,Y", required_unless_present = "dump_config")]
    points: Vec<Point>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Cli {
    /// Start from the config file (or defaults) and apply flag overrides.
    fn settings(&self) -> Result<GridSettings, CliError> {
        let mut settings = match &self.config {
            Some(path) => GridSettings::load(path)?,
            None => GridSettings::default(),
        };
        if let Some(grid) = self.grid {
            settings.bounds = grid;
        }
        if let Some(shape) = self.shape {
            settings.shape = shape;
        }
        if let Some(prefer) = self.prefer {
            settings.prefer = prefer;
        }
        if self.vertical_candidates {
            settings.options.vertical_candidates = true;
        }
        Ok(settings)
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let settings = cli.settings()?;
    log::debug!("Effective settings: {:?}", settings);

    if cli.dump_config {
        writeln!(out, "{}", settings.to_json()?)?;
        return Ok(());
    }

    let snapped: Vec<Point> = cli.points.iter().map(|p| settings.snap(*p)).collect();
    for (from, to) in cli.points.iter().zip(&snapped) {
        log::trace!("{} -> {}", from, to);
    }

    if cli.json {
        writeln!(out, "{}", serde_json::to_string(&snapped)?)?;
    } else {
        for point in &snapped {
            writeln!(out, "{}", point)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("Snapping {} point(s)", cli.points.len());

    let stdout = io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("gridsnap: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn output(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_snap_with_defaults() {
        assert_eq!(output(&["gridsnap", "9,7", "33,40"]), "16,0\n32,48\n");
    }

    #[test]
    fn test_flag_overrides() {
        let out = output(&["gridsnap", "--grid", "0,0,10,10", "--prefer", "floor-grid", "--", "17,23", "-3,-3"]);
        assert_eq!(out, "10,20\n-10,-10\n");
    }

    #[test]
    fn test_isometric_json_output() {
        let out = output(&["gridsnap", "--grid", "0,0,32,16", "--shape", "isometric", "--json", "4,10"]);
        assert_eq!(out.trim(), r#"[{"x":0,"y":16}]"#);
    }

    #[test]
    fn test_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, r#"{ "bounds": { "x": 3, "y": 3, "w": 10, "h": 10 }, "prefer": "box_end" }"#).unwrap();
        let path = path.to_str().unwrap();

        assert_eq!(output(&["gridsnap", "--config", path, "3,3"]), "13,13\n");
        // Flags win over the file.
        assert_eq!(output(&["gridsnap", "--config", path, "--prefer", "ceil-grid", "3,3"]), "3,3\n");
    }

    #[test]
    fn test_dump_config() {
        let out = output(&["gridsnap", "--shape", "isometric", "--vertical-candidates", "--dump-config"]);
        let settings = GridSettings::from_json(&out).unwrap();
        assert_eq!(settings.shape, GridShape::Isometric);
        assert!(settings.options.vertical_candidates);
    }

    #[test]
    fn test_points_required() {
        assert!(Cli::try_parse_from(["gridsnap"]).is_err());
    }

    #[test]
    fn test_bad_arguments_rejected() {
        assert!(Cli::try_parse_from(["gridsnap", "--prefer", "nearest", "1,1"]).is_err());
        assert!(Cli::try_parse_from(["gridsnap", "--grid", "0,0,10", "1,1"]).is_err());
        assert!(Cli::try_parse_from(["gridsnap", "1;1"]).is_err());
    }

    #[test]
    fn test_missing_config_is_error() {
        let cli = Cli::try_parse_from(["gridsnap", "--config", "/nonexistent/grid.json", "1,1"]).unwrap();
        let mut out = Vec::new();
        assert!(matches!(run(&cli, &mut out), Err(CliError::Config(ConfigError::Io(_)))));
    }
}
