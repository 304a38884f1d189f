//! Pipeline orchestration: parse the observation file, load the roster,
//! build the matrix, render, overlay logos, and write the timestamped PNG.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::canvas::Canvas;
use crate::colormap::{self, WHITE};
use crate::competition::Competition;
use crate::heatmap::{self, GridGeometry, HeatmapParams};
use crate::logo_cache::{FetchConfig, LogoCache};
use crate::matrix::{self, ProbMatrix};
use crate::overlay;
use crate::roster;
use crate::table;

const TITLE_COLOR: [u8; 3] = [0x00, 0x00, 0x00];
const CAPTION_COLOR: [u8; 3] = [0x44, 0x44, 0x44];

/// Filesystem layout for one invocation. Defaults match the repository
/// layout; each path can be overridden through the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub art_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: env_path("DRAW_DATA_DIR", "data"),
            results_dir: env_path("DRAW_RESULTS_DIR", "results"),
            cache_dir: env_path("DRAW_CACHE_DIR", ".cache/logos"),
            art_dir: env_path("DRAW_ART_DIR", "data/img"),
        }
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Output file name: competition, season year, trial count, and generation
/// date/time as fixed-width numeric fields.
pub fn output_filename(
    competition: Competition,
    year: i64,
    iterations: i64,
    timestamp: NaiveDateTime,
) -> String {
    format!(
        "{}_{}_{}_{}.png",
        competition.code(),
        year,
        iterations,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Run the whole pipeline for one observation file. Returns the path of the
/// written image. An existing file with the same name is overwritten.
pub fn generate(input: &Path, cfg: &Config) -> Result<PathBuf> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("failed reading {}", input.display()))?;
    let (meta, rows) = table::parse_str(&raw)
        .with_context(|| format!("failed parsing {}", input.display()))?;

    let competition = Competition::from_code(meta.require_str("competition")?)?;
    let year = meta.require_int("year")?;
    let simulations = meta.require_int("simulations")?;
    let timestamp = meta.require_timestamp("timestamp")?;

    let roster_path = cfg
        .data_dir
        .join(year.to_string())
        .join(competition.code())
        .join("teams.csv");
    let teams = roster::load(&roster_path)?;
    tracing::info!(
        competition = competition.code(),
        year,
        teams = teams.len(),
        observations = rows.len(),
        "building matchup matrix"
    );

    let observations = matrix::observations_from_rows(&rows)?;
    let probs = ProbMatrix::build(&observations, teams.len(), simulations)?;

    let geom = GridGeometry::new(teams.len());
    let mut canvas = Canvas::new(geom.canvas_width(), geom.canvas_height(), WHITE);
    let labels: Vec<String> = teams.iter().map(|t| t.abbrev.clone()).collect();
    let scale = colormap::competition_scale(competition);
    heatmap::render_heatmap(
        &mut canvas,
        &geom,
        &probs,
        &labels,
        &scale,
        &HeatmapParams::default(),
    );

    let cache = LogoCache::new(&cfg.cache_dir, FetchConfig::default())?;
    overlay::overlay_team_logos(&mut canvas, &geom, &cache, &teams)
        .context("failed overlaying team logos")?;
    overlay::overlay_competition_badge(&mut canvas, &geom, &cfg.art_dir, competition)
        .context("failed overlaying competition badge")?;

    let title = format!(
        "{}/{} {} Draw Probabilities, League Phase",
        year,
        (year % 100) + 1,
        competition.display_name()
    );
    let (x, y) = geom.title_anchor();
    canvas.draw_text(x, y, &title, 2, TITLE_COLOR);
    let caption = format!(
        "n={}, generated {}",
        simulations,
        timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    let (x, y) = geom.caption_anchor();
    canvas.draw_text(x, y, &caption, 1, CAPTION_COLOR);

    fs::create_dir_all(&cfg.results_dir)
        .with_context(|| format!("failed creating {}", cfg.results_dir.display()))?;
    let out = cfg
        .results_dir
        .join(output_filename(competition, year, simulations, timestamp));
    canvas
        .save_png(&out)
        .with_context(|| format!("failed writing {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote heatmap");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filename_encodes_run_identity() {
        let ts = NaiveDate::from_ymd_opt(2025, 8, 28)
            .unwrap()
            .and_hms_opt(14, 5, 3)
            .unwrap();
        assert_eq!(
            output_filename(Competition::Ucl, 2025, 10_000, ts),
            "ucl_2025_10000_20250828_140503.png"
        );
    }

    #[test]
    fn filename_zero_pads_date_and_time() {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(
            output_filename(Competition::Uecl, 2026, 500, ts),
            "uecl_2026_500_20260102_030405.png"
        );
    }
}
