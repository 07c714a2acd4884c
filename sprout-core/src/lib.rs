//! Perpendicular line-growth renderer.
//!
//! Short segments sprout from a seed point, each child roughly
//! perpendicular to its parent, and a segment is only drawn if it does not
//! run into anything already on the canvas.
//!
//! Main components:
//! - [`growth`] — the frontier loop, segment acceptance and drawing.
//! - [`collision`] — sampling a candidate segment against the canvas.
//! - [`color`] — the fading color schedule.
//! - [`frontier`] — FIFO queue of pending candidates.
//! - [`canvas`] — the raster surface contract and its `RgbImage` impl.
//! - [`config`] — run configuration and JSON loading.
//! - [`error`] — configuration errors.
//! - [`types`] — points, candidates, segments and colors.

pub mod canvas;
pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod frontier;
pub mod growth;
pub mod types;

pub use canvas::Canvas;
pub use config::{Config, load_config};
pub use error::ConfigError;
pub use growth::{GrowthEngine, GrowthReport, Step};
