//! Collision test for candidate segments.
//!
//! A candidate is centered on the endpoint of an already drawn segment, so
//! its middle always touches drawn pixels. The test therefore samples only
//! the two outer bands of the candidate and ignores the band around its
//! midpoint.

use crate::{
    canvas::{Canvas, is_background},
    error::ConfigError,
    types::Point,
};
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Sampling layout along a segment.
///
/// The segment is split into `steps + 1` equal intervals; sample `i` sits
/// `i` intervals from the first endpoint. Only indices inside `near_band`
/// or `far_band` are read.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollisionProbe {
    pub steps: u32,
    pub near_band: RangeInclusive<u32>,
    pub far_band: RangeInclusive<u32>,
}

impl Default for CollisionProbe {
    fn default() -> Self {
        Self {
            steps: 100,
            near_band: 1..=30,
            far_band: 70..=100,
        }
    }
}

impl CollisionProbe {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::InvalidProbe("steps must be at least 1".into()));
        }
        for (name, band) in [("near_band", &self.near_band), ("far_band", &self.far_band)] {
            if band.is_empty() || *band.start() < 1 || *band.end() > self.steps {
                return Err(ConfigError::InvalidProbe(format!(
                    "{name} {}..={} must be a non-empty range inside 1..={}",
                    band.start(),
                    band.end(),
                    self.steps
                )));
            }
        }
        Ok(())
    }

    /// Sample indices in the order they are tested.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.near_band.clone().chain(self.far_band.clone())
    }
}

/// Checks whether the segment `p1`-`p2` would run into drawn pixels.
///
/// Each sampled point is rounded to the nearest pixel (ties to even).
/// Samples that fall outside `0 < x < width`, `0 < y < height` are skipped.
/// A zero-length segment has no direction and is reported as colliding so
/// it is never drawn.
///
/// ### Parameters
/// - `canvas` - Surface holding everything drawn so far.
/// - `p1`, `p2` - Endpoints of the candidate segment.
/// - `probe` - Which samples along the segment to read.
///
/// ### Returns
/// `true` if any tested sample reads as non-background.
pub fn would_collide<C: Canvas + ?Sized>(
    canvas: &C,
    p1: Point,
    p2: Point,
    probe: &CollisionProbe,
) -> bool {
    let length = p1.distance(p2);
    if length == 0.0 || !length.is_finite() {
        return true;
    }

    let (w, h) = canvas.size();
    let (w, h) = (w as f32, h as f32);
    let unit = (p2 - p1) / length;
    let step = length / (probe.steps as f32 + 1.0);

    probe.indices().any(|i| {
        let p = p1 + unit * (i as f32 * step);
        let (x, y) = (p.x.round_ties_even(), p.y.round_ties_even());
        x > 0.0 && y > 0.0 && x < w && y < h && !is_background(canvas, x as u32, y as u32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use image::{Rgb, RgbImage};

    fn canvas_with(points: &[(u32, u32)]) -> RgbImage {
        let mut img = RgbImage::new(100, 100);
        for &(x, y) in points {
            img.put_pixel(x, y, Rgb([255, 255, 255]));
        }
        img
    }

    #[test]
    fn empty_canvas_never_collides() {
        let img = canvas_with(&[]);
        let probe = CollisionProbe::default();
        assert!(!would_collide(&img, Vec2::new(10.0, 50.0), Vec2::new(90.0, 50.0), &probe));
    }

    #[test]
    fn drawn_midpoint_is_ignored() {
        // Segment 0..101 along x at y = 50: sample i lands on x = i.
        let img = canvas_with(&[(50, 50), (40, 50), (60, 50)]);
        let probe = CollisionProbe::default();
        assert!(!would_collide(&img, Vec2::new(0.0, 50.0), Vec2::new(101.0, 50.0), &probe));
    }

    #[test]
    fn drawn_pixel_in_near_band_collides() {
        let img = canvas_with(&[(20, 50)]);
        let probe = CollisionProbe::default();
        assert!(would_collide(&img, Vec2::new(0.0, 50.0), Vec2::new(101.0, 50.0), &probe));
    }

    #[test]
    fn drawn_pixel_in_far_band_collides() {
        let img = canvas_with(&[(85, 50)]);
        let probe = CollisionProbe::default();
        assert!(would_collide(&img, Vec2::new(0.0, 50.0), Vec2::new(101.0, 50.0), &probe));
    }

    #[test]
    fn pixels_on_the_zero_row_are_not_sampled() {
        let mut img = RgbImage::new(100, 100);
        for x in 0..100 {
            img.put_pixel(x, 0, Rgb([1, 1, 1]));
        }
        let probe = CollisionProbe::default();
        assert!(!would_collide(&img, Vec2::new(0.0, 0.0), Vec2::new(101.0, 0.0), &probe));
    }

    #[test]
    fn samples_outside_the_canvas_are_skipped() {
        let img = canvas_with(&[(99, 99)]);
        let probe = CollisionProbe::default();
        // Runs from inside the canvas well past its right edge.
        assert!(!would_collide(&img, Vec2::new(60.0, 50.0), Vec2::new(400.0, 50.0), &probe));
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        let img = canvas_with(&[]);
        let p = Vec2::new(30.0, 30.0);
        assert!(would_collide(&img, p, p, &CollisionProbe::default()));
    }

    #[test]
    fn default_probe_tests_outer_bands_only() {
        let idx: Vec<u32> = CollisionProbe::default().indices().collect();
        assert_eq!(idx.len(), 61);
        assert_eq!(idx.first(), Some(&1));
        assert!(!idx.contains(&50));
        assert!(idx.contains(&30) && idx.contains(&70));
        assert_eq!(idx.last(), Some(&100));
    }

    #[test]
    fn probe_validation_rejects_bands_outside_steps() {
        assert!(CollisionProbe::default().validate().is_ok());

        let probe = CollisionProbe {
            steps: 50,
            ..Default::default()
        };
        assert!(probe.validate().is_err());

        let probe = CollisionProbe {
            steps: 0,
            near_band: 1..=0,
            far_band: 1..=0,
        };
        assert!(probe.validate().is_err());
    }
}
