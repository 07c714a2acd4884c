use crate::{
    collision::CollisionProbe, color::BaseColor, error::ConfigError, growth::GrowthParams,
    types::Candidate,
};
use glam::Vec2;
use image::RgbImage;
use log::debug;
use serde::Deserialize;
use std::{fs, path::Path};

/// Everything needed to produce one drawing.
///
/// Every field has a default, so a config file only needs to list the
/// values it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hard ceiling on accepted segments.
    pub max_segments: u32,
    /// Children deviate from perpendicular by a whole number of degrees in
    /// `-angle_deviation_degrees..=angle_deviation_degrees`.
    pub angle_deviation_degrees: u32,
    /// Full length of every segment in pixels.
    pub segment_length: f32,
    pub line_width: u32,
    pub base_color: BaseColor,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Center of the first segment. `None` means the canvas center.
    pub seed_point: Option<Vec2>,
    pub seed_angle_degrees: f32,
    /// Seed for the deviation generator. `None` draws one from entropy.
    pub rng_seed: Option<u64>,
    pub collision: CollisionProbe,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_segments: 1500,
            angle_deviation_degrees: 40,
            segment_length: 40.0,
            line_width: 3,
            base_color: BaseColor::default(),
            canvas_width: 2 * 720,
            canvas_height: 2 * 480,
            seed_point: None,
            seed_angle_degrees: 0.0,
            rng_seed: None,
            collision: CollisionProbe::default(),
        }
    }
}

impl Config {
    /// Checks the values the engine relies on before it runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.canvas_width, self.canvas_height);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return Err(ConfigError::InvalidSegmentLength(self.segment_length));
        }
        if self.max_segments == 0 {
            return Err(ConfigError::ZeroBudget);
        }
        if self.line_width == 0 {
            return Err(ConfigError::ZeroLineWidth);
        }
        if !self.seed_angle_degrees.is_finite() {
            return Err(ConfigError::InvalidSeedAngle(self.seed_angle_degrees));
        }

        let p = self.seed_point();
        let inside = p.x > 0.0 && p.y > 0.0 && p.x < width as f32 && p.y < height as f32;
        if !inside {
            return Err(ConfigError::SeedOutsideCanvas {
                x: p.x,
                y: p.y,
                width,
                height,
            });
        }

        self.collision.validate()
    }

    pub fn seed_point(&self) -> Vec2 {
        self.seed_point.unwrap_or_else(|| {
            Vec2::new(
                (self.canvas_width / 2) as f32,
                (self.canvas_height / 2) as f32,
            )
        })
    }

    pub fn seed_candidate(&self) -> Candidate {
        Candidate::new(self.seed_point(), self.seed_angle_degrees)
    }

    pub fn growth_params(&self) -> GrowthParams {
        GrowthParams {
            max_segments: self.max_segments,
            angle_deviation: self.angle_deviation_degrees,
            segment_length: self.segment_length,
            line_width: self.line_width,
            base_color: self.base_color,
            probe: self.collision.clone(),
        }
    }

    /// An all-background canvas of the configured size.
    pub fn blank_canvas(&self) -> RgbImage {
        RgbImage::new(self.canvas_width, self.canvas_height)
    }
}

/// Reads a JSON config file. Missing keys take their default values.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded config from {}: {cfg:?}", path.display());
    Ok(cfg)
}
