//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported before the growth engine is allowed to run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Canvas width or height is zero.
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Segment length is zero, negative or not finite.
    #[error("segment length must be a positive finite number, got {0}")]
    InvalidSegmentLength(f32),

    /// `max_segments` is zero.
    #[error("max_segments must be at least 1")]
    ZeroBudget,

    /// `line_width` is zero.
    #[error("line_width must be at least 1")]
    ZeroLineWidth,

    /// Seed angle is NaN or infinite.
    #[error("seed angle must be finite, got {0}")]
    InvalidSeedAngle(f32),

    /// Seed point does not lie inside the canvas.
    #[error("seed point ({x}, {y}) lies outside the {width}x{height} canvas")]
    SeedOutsideCanvas {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },

    /// Collision sample bands do not fit in `1..=steps`.
    #[error("invalid collision probe: {0}")]
    InvalidProbe(String),

    /// Base color string could not be understood.
    #[error("invalid base color {0:?}: expected 0xRRGGBB, #RRGGBB, red, green or blue")]
    InvalidColor(String),

    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::config::Config`].
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
