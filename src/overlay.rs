//! Logo overlays: team crests along both axes and the competition badge at
//! the top-left corner. Drawn after the grid and labels so nothing obscures
//! them.

use std::path::Path;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::canvas::Canvas;
use crate::competition::Competition;
use crate::error::RetrievalError;
use crate::heatmap::{BADGE_PX, GridGeometry, LOGO_PX};
use crate::logo_cache::{self, LogoCache, Transport};
use crate::roster::Team;

fn scaled(img: &RgbaImage, size: u32) -> RgbaImage {
    if img.width() == size && img.height() == size {
        return img.clone();
    }
    imageops::resize(img, size, size, FilterType::Triangle)
}

/// Anchor one crest copy left of row `k` and one above column `k` for every
/// team, in roster order.
pub fn overlay_team_logos<T: Transport>(
    canvas: &mut Canvas,
    geom: &GridGeometry,
    cache: &LogoCache<T>,
    teams: &[Team],
) -> Result<(), RetrievalError> {
    assert_eq!(teams.len(), geom.n, "one team per grid row");
    for (k, team) in teams.iter().enumerate() {
        let crest = scaled(&cache.resolve(&team.id, false)?, LOGO_PX);
        let (x, y) = geom.row_logo_anchor(k);
        canvas.blit_rgba(x, y, &crest);
        let (x, y) = geom.col_logo_anchor(k);
        canvas.blit_rgba(x, y, &crest);
    }
    Ok(())
}

/// Anchor the competition badge outside the top-left corner of both axes.
pub fn overlay_competition_badge(
    canvas: &mut Canvas,
    geom: &GridGeometry,
    art_dir: &Path,
    competition: Competition,
) -> Result<(), RetrievalError> {
    let badge = scaled(&logo_cache::competition_art(art_dir, competition)?, BADGE_PX);
    let (x, y) = geom.badge_anchor();
    canvas.blit_rgba(x, y, &badge);
    Ok(())
}
