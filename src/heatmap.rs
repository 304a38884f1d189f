//! Tiered matrix renderer: colored grid, minor grid lines, sub-group and pot
//! boundary overlays, contrast-aware cell labels, top/left axis headers, and
//! a color legend.

use crate::canvas::{CHAR_H, CHAR_W, Canvas};
use crate::colormap::ColorScale;
use crate::matrix::ProbMatrix;

pub const CELL_PX: u32 = 40;
pub const LOGO_PX: u32 = 32;
pub const BADGE_PX: u32 = 64;

// Band above the grid for the title and caption lines.
const TITLE_BAND: u32 = 48;
// Band left of / above the grid holding logos and header labels.
const AXIS_BAND: u32 = 108;
const BOTTOM_PAD: u32 = 24;
const LEGEND_GAP: u32 = 24;
const LEGEND_W: u32 = 24;
const LEGEND_TEXT_BAND: u32 = 72;

// Fractional grid-line positions for the 36-team league-phase format. A
// break at 2.5 sits exactly between grid index 2 and 3. Fixed per format,
// never derived from the data.
pub const SUB_GROUP_BREAKS: [f32; 8] = [2.5, 5.5, 11.5, 14.5, 20.5, 23.5, 29.5, 32.5];
pub const POT_BREAKS: [f32; 3] = [8.5, 17.5, 26.5];

const MINOR_GRID: [u8; 3] = [0x80, 0x80, 0x80];
const SUB_GROUP_LINE: [u8; 3] = [0x44, 0x44, 0x44];
const POT_LINE: [u8; 3] = [0x00, 0x00, 0x00];
const SUB_GROUP_LINE_PX: u32 = 2;
const POT_LINE_PX: u32 = 3;

const HEADER_TEXT: [u8; 3] = [0x00, 0x00, 0x00];
const LABEL_LIGHT: [u8; 3] = [0xff, 0xff, 0xff];
const LABEL_DARK: [u8; 3] = [0x00, 0x00, 0x00];

pub const DEFAULT_LABEL_THRESHOLD: f64 = 25.0;

/// Pixel layout of the rendered grid and its margins. Pure coordinate math,
/// shared with the overlay layer so logos anchor against the same frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub n: usize,
}

impl GridGeometry {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Grid origin (top-left of cell (0,0)).
    pub fn left(&self) -> i64 {
        AXIS_BAND as i64
    }

    pub fn top(&self) -> i64 {
        (TITLE_BAND + AXIS_BAND) as i64
    }

    pub fn grid_size(&self) -> u32 {
        self.n as u32 * CELL_PX
    }

    pub fn canvas_width(&self) -> u32 {
        AXIS_BAND + self.grid_size() + LEGEND_GAP + LEGEND_W + LEGEND_TEXT_BAND
    }

    pub fn canvas_height(&self) -> u32 {
        TITLE_BAND + AXIS_BAND + self.grid_size() + BOTTOM_PAD
    }

    pub fn cell_origin(&self, row: usize, col: usize) -> (i64, i64) {
        (
            self.left() + (col as u32 * CELL_PX) as i64,
            self.top() + (row as u32 * CELL_PX) as i64,
        )
    }

    pub fn cell_center(&self, row: usize, col: usize) -> (i64, i64) {
        let (x, y) = self.cell_origin(row, col);
        (x + (CELL_PX / 2) as i64, y + (CELL_PX / 2) as i64)
    }

    /// Pixel offset of a fractional boundary position from the grid origin:
    /// position 2.5 maps onto the shared edge of cells 2 and 3.
    pub fn boundary_offset(&self, pos: f32) -> i64 {
        ((pos + 0.5) * CELL_PX as f32).round() as i64
    }

    /// Top-left anchor for the logo sitting left of row `k`.
    pub fn row_logo_anchor(&self, k: usize) -> (i64, i64) {
        let (_, cy) = self.cell_center(k, 0);
        (self.left() - 100, cy - (LOGO_PX / 2) as i64)
    }

    /// Top-left anchor for the logo sitting above column `k`.
    pub fn col_logo_anchor(&self, k: usize) -> (i64, i64) {
        let (cx, _) = self.cell_center(0, k);
        (cx - (LOGO_PX / 2) as i64, self.top() - 100)
    }

    /// Top-left anchor for the competition badge outside both axes.
    pub fn badge_anchor(&self) -> (i64, i64) {
        (self.left() - 104, self.top() - 104)
    }

    pub fn title_anchor(&self) -> (i64, i64) {
        (8, 10)
    }

    pub fn caption_anchor(&self) -> (i64, i64) {
        (8, 10 + (2 * CHAR_H) as i64 + 4)
    }

    fn legend_origin(&self) -> (i64, i64) {
        (self.left() + self.grid_size() as i64 + LEGEND_GAP as i64, self.top())
    }
}

/// Boundary positions applicable to a roster of `n` entities: positions
/// depend only on the roster size, never on the matrix content. Sizes other
/// than the full 36-team format keep only the breaks inside their grid.
pub fn tier_boundaries(n: usize) -> (Vec<f32>, Vec<f32>) {
    let limit = n as f32 - 0.5;
    let keep = |breaks: &[f32]| -> Vec<f32> {
        breaks.iter().copied().filter(|p| *p < limit).collect()
    };
    (keep(&SUB_GROUP_BREAKS), keep(&POT_BREAKS))
}

/// A planned numeric cell label.
#[derive(Debug, Clone, PartialEq)]
pub struct CellLabel {
    pub row: usize,
    pub col: usize,
    pub text: String,
    /// Rendered in the light color when the value strictly exceeds the
    /// threshold; at or below renders dark.
    pub light: bool,
}

/// Plan labels for every off-diagonal, nonzero cell. Diagonal cells are
/// never labeled.
pub fn plan_cell_labels(matrix: &ProbMatrix, threshold: f64) -> Vec<CellLabel> {
    let n = matrix.n();
    let mut labels = Vec::new();
    for row in 0..n {
        for col in 0..n {
            if row == col {
                continue;
            }
            let value = matrix.get(row, col);
            if value == 0.0 {
                continue;
            }
            labels.push(CellLabel {
                row,
                col,
                text: format!("{value:.1}"),
                light: value > threshold,
            });
        }
    }
    labels
}

pub struct HeatmapParams<'a> {
    pub unit_label: &'a str,
    pub threshold: f64,
}

impl Default for HeatmapParams<'_> {
    fn default() -> Self {
        Self {
            unit_label: "Matchup Probability (%)",
            threshold: DEFAULT_LABEL_THRESHOLD,
        }
    }
}

/// Draw the annotated grid. Callers guarantee shape invariants: the header
/// label list must match the matrix dimension, which must match `geom.n`.
pub fn render_heatmap(
    canvas: &mut Canvas,
    geom: &GridGeometry,
    matrix: &ProbMatrix,
    labels: &[String],
    scale: &ColorScale,
    params: &HeatmapParams,
) {
    assert_eq!(matrix.n(), geom.n, "matrix dimension must match geometry");
    assert_eq!(labels.len(), geom.n, "one header label per entity");

    draw_cells(canvas, geom, matrix, scale);
    draw_minor_grid(canvas, geom);
    draw_tier_boundaries(canvas, geom);
    draw_labels(canvas, geom, &plan_cell_labels(matrix, params.threshold));
    draw_headers(canvas, geom, labels);
    draw_legend(canvas, geom, scale, params.unit_label);
}

fn draw_cells(canvas: &mut Canvas, geom: &GridGeometry, matrix: &ProbMatrix, scale: &ColorScale) {
    for row in 0..geom.n {
        for col in 0..geom.n {
            let (x, y) = geom.cell_origin(row, col);
            let t = (matrix.get(row, col) / 100.0) as f32;
            canvas.fill_rect(x, y, CELL_PX, CELL_PX, scale.sample(t));
        }
    }
}

fn draw_minor_grid(canvas: &mut Canvas, geom: &GridGeometry) {
    let size = geom.grid_size() + 1;
    for i in 0..=geom.n {
        let offset = (i as u32 * CELL_PX) as i64;
        canvas.vline(geom.left() + offset, geom.top(), size, MINOR_GRID);
        canvas.hline(geom.left(), geom.top() + offset, size, MINOR_GRID);
    }
}

fn draw_tier_boundaries(canvas: &mut Canvas, geom: &GridGeometry) {
    let (sub_group, pot) = tier_boundaries(geom.n);
    let size = geom.grid_size() + 1;
    for pos in sub_group {
        let offset = geom.boundary_offset(pos);
        let lead = (SUB_GROUP_LINE_PX / 2) as i64;
        canvas.fill_rect(
            geom.left() + offset - lead,
            geom.top(),
            SUB_GROUP_LINE_PX,
            size,
            SUB_GROUP_LINE,
        );
        canvas.fill_rect(
            geom.left(),
            geom.top() + offset - lead,
            size,
            SUB_GROUP_LINE_PX,
            SUB_GROUP_LINE,
        );
    }
    for pos in pot {
        let offset = geom.boundary_offset(pos);
        let lead = (POT_LINE_PX / 2) as i64;
        canvas.fill_rect(
            geom.left() + offset - lead,
            geom.top(),
            POT_LINE_PX,
            size,
            POT_LINE,
        );
        canvas.fill_rect(
            geom.left(),
            geom.top() + offset - lead,
            size,
            POT_LINE_PX,
            POT_LINE,
        );
    }
}

fn draw_labels(canvas: &mut Canvas, geom: &GridGeometry, labels: &[CellLabel]) {
    for label in labels {
        let (cx, cy) = geom.cell_center(label.row, label.col);
        let x = cx - (Canvas::text_width(&label.text, 1) / 2) as i64;
        let y = cy - (Canvas::text_height(1) / 2) as i64;
        let color = if label.light { LABEL_LIGHT } else { LABEL_DARK };
        canvas.draw_text(x, y, &label.text, 1, color);
    }
}

fn draw_headers(canvas: &mut Canvas, geom: &GridGeometry, labels: &[String]) {
    // Headers sit on the top and left edges so they stay legible next to the
    // overlaid logos.
    for (k, label) in labels.iter().enumerate() {
        let (_, cy) = geom.cell_center(k, 0);
        let x = geom.left() - 8 - Canvas::text_width(label, 2) as i64;
        canvas.draw_text(x, cy - (Canvas::text_height(2) / 2) as i64, label, 2, HEADER_TEXT);

        let (cx, _) = geom.cell_center(0, k);
        let x = cx - (Canvas::text_width(label, 2) / 2) as i64;
        let y = geom.top() - 8 - Canvas::text_height(2) as i64;
        canvas.draw_text(x, y, label, 2, HEADER_TEXT);
    }
}

fn draw_legend(canvas: &mut Canvas, geom: &GridGeometry, scale: &ColorScale, unit_label: &str) {
    let (x, y) = geom.legend_origin();
    let h = geom.grid_size();

    for dy in 0..h {
        let t = 1.0 - dy as f32 / (h - 1) as f32;
        canvas.hline(x, y + dy as i64, LEGEND_W, scale.sample(t));
    }

    // Frame and tick labels.
    canvas.hline(x, y, LEGEND_W, SUB_GROUP_LINE);
    canvas.hline(x, y + h as i64 - 1, LEGEND_W, SUB_GROUP_LINE);
    canvas.vline(x, y, h, SUB_GROUP_LINE);
    canvas.vline(x + LEGEND_W as i64 - 1, y, h, SUB_GROUP_LINE);

    for tick in [0u32, 25, 50, 75, 100] {
        let frac = tick as f32 / 100.0;
        let ty = y + ((1.0 - frac) * (h - 1) as f32).round() as i64;
        canvas.hline(x + LEGEND_W as i64, ty, 4, SUB_GROUP_LINE);
        let text = tick.to_string();
        canvas.draw_text(
            x + LEGEND_W as i64 + 6,
            ty - (Canvas::text_height(1) / 2) as i64,
            &text,
            1,
            HEADER_TEXT,
        );
    }

    let label_x = x + LEGEND_W as i64 + 6 + (3 * CHAR_W) as i64 + 8;
    let label_h = unit_label.chars().count() as u32 * CHAR_H;
    let label_y = y + ((h.saturating_sub(label_h)) / 2) as i64;
    canvas.draw_text_vertical(label_x, label_y, unit_label, 1, HEADER_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{PairObservation, ProbMatrix};

    fn sample_matrix() -> ProbMatrix {
        let obs = [
            PairObservation { t1: 0, t2: 1, total: 30 },
            PairObservation { t1: 2, t2: 3, total: 18 },
        ];
        ProbMatrix::build(&obs, 4, 100).unwrap()
    }

    #[test]
    fn labels_skip_diagonal_and_zero_cells() {
        let labels = plan_cell_labels(&sample_matrix(), DEFAULT_LABEL_THRESHOLD);
        let mut found: Vec<(usize, usize, &str)> = labels
            .iter()
            .map(|l| (l.row, l.col, l.text.as_str()))
            .collect();
        found.sort_unstable();
        assert_eq!(
            found,
            vec![(0, 1, "30.0"), (1, 0, "30.0"), (2, 3, "18.0"), (3, 2, "18.0")]
        );
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        let obs = [PairObservation { t1: 0, t2: 1, total: 25 }];
        let m = ProbMatrix::build(&obs, 2, 100).unwrap();
        // Exactly at the threshold: dark.
        let labels = plan_cell_labels(&m, 25.0);
        assert!(labels.iter().all(|l| !l.light));
        // Strictly above: light.
        let labels = plan_cell_labels(&m, 24.9);
        assert!(labels.iter().all(|l| l.light));
    }

    #[test]
    fn boundaries_depend_only_on_roster_size() {
        let (sub_a, pot_a) = tier_boundaries(36);
        let (sub_b, pot_b) = tier_boundaries(36);
        assert_eq!(sub_a, sub_b);
        assert_eq!(pot_a, pot_b);
        assert_eq!(sub_a, SUB_GROUP_BREAKS.to_vec());
        assert_eq!(pot_a, POT_BREAKS.to_vec());

        let (sub_small, pot_small) = tier_boundaries(2);
        assert!(sub_small.is_empty());
        assert!(pot_small.is_empty());
    }

    #[test]
    fn boundary_offset_lands_between_cells() {
        let geom = GridGeometry::new(36);
        assert_eq!(geom.boundary_offset(2.5), 3 * CELL_PX as i64);
        assert_eq!(geom.boundary_offset(8.5), 9 * CELL_PX as i64);
    }

    #[test]
    fn geometry_margins_cover_logos_and_headers() {
        let geom = GridGeometry::new(4);
        let (x, y) = geom.row_logo_anchor(0);
        assert!(x >= 0 && y >= 0);
        let (x, y) = geom.col_logo_anchor(0);
        assert!(x >= 0 && y >= 0);
        let (x, y) = geom.badge_anchor();
        assert!(x >= 0 && y >= 0);
        assert_eq!(
            geom.canvas_height(),
            geom.top() as u32 + geom.grid_size() + BOTTOM_PAD
        );
    }

    #[test]
    fn rendered_cell_color_tracks_value() {
        let m = sample_matrix();
        let geom = GridGeometry::new(4);
        let mut canvas = Canvas::new(geom.canvas_width(), geom.canvas_height(), [255, 255, 255]);
        let scale = crate::colormap::competition_scale(crate::competition::Competition::Ucl);
        let labels = vec!["A".into(), "B".into(), "C".into(), "D".into()];
        render_heatmap(&mut canvas, &geom, &m, &labels, &scale, &HeatmapParams::default());

        // A zero cell keeps the flat-white low end; cell (0,1) at 30% is
        // tinted toward the accent.
        let (cx, cy) = geom.cell_center(0, 2);
        assert_eq!(canvas.pixel(cx + 10, cy + 10), Some([255, 255, 255]));
        let (cx, cy) = geom.cell_center(0, 1);
        let tinted = canvas.pixel(cx + 10, cy + 10).unwrap();
        assert_ne!(tinted, [255, 255, 255]);
    }
}
