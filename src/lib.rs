pub mod canvas;
pub mod colormap;
pub mod competition;
pub mod compose;
pub mod error;
pub mod heatmap;
pub mod logo_cache;
pub mod matrix;
pub mod overlay;
pub mod roster;
pub mod table;
