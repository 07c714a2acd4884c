//! Fading color schedule.
//!
//! Segment color is a pure function of how many segments have been accepted
//! so far: the first segment is drawn in the full base color and every
//! later one is dimmed linearly until the budget is reached, at which point
//! the color is black.

use crate::{error::ConfigError, types::Rgb};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Base stroke color.
///
/// Accepts a 24-bit `0xRRGGBB` value or one of the pure channel names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub enum BaseColor {
    Hex(u32),
    Red,
    Green,
    Blue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u32),
    Text(String),
}

impl Default for BaseColor {
    fn default() -> Self {
        BaseColor::Hex(0xFD1D55)
    }
}

impl BaseColor {
    pub fn value(&self) -> u32 {
        match *self {
            BaseColor::Hex(v) => v,
            BaseColor::Red => 0xFF0000,
            BaseColor::Green => 0x00FF00,
            BaseColor::Blue => 0x0000FF,
        }
    }

    /// Channel bytes of the color, or `None` when the value is outside the
    /// open range `(0, 0xFFFFFF)` and the schedule falls back to white.
    pub fn channels(&self) -> Option<Rgb> {
        let v = self.value();
        if v > 0 && v < 0xFFFFFF {
            Some([(v >> 16) as u8, (v >> 8) as u8, v as u8])
        } else {
            None
        }
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        BaseColor::Hex((u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2]))
    }
}

impl FromStr for BaseColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        match text.to_ascii_lowercase().as_str() {
            "red" => return Ok(BaseColor::Red),
            "green" => return Ok(BaseColor::Green),
            "blue" => return Ok(BaseColor::Blue),
            _ => {}
        }

        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| ConfigError::InvalidColor(s.to_owned()))?;

        u32::from_str_radix(digits, 16)
            .map(BaseColor::Hex)
            .map_err(|_| ConfigError::InvalidColor(s.to_owned()))
    }
}

impl TryFrom<ColorRepr> for BaseColor {
    type Error = ConfigError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Int(v) => Ok(BaseColor::Hex(v)),
            ColorRepr::Text(s) => s.parse(),
        }
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseColor::Hex(v) => write!(f, "#{v:06X}"),
            BaseColor::Red => f.write_str("red"),
            BaseColor::Green => f.write_str("green"),
            BaseColor::Blue => f.write_str("blue"),
        }
    }
}

/// Color of the segment drawn when `progress` segments have already been
/// accepted out of a `budget`.
///
/// The fade is `255 - round(progress * 255 / budget)` (ties to even), each
/// channel being `fade * byte / 255` truncated. Progress past the budget
/// clamps to black, as does a zero budget.
///
/// ### Parameters
/// - `progress` - Number of segments accepted before this one.
/// - `budget` - Maximum number of segments the engine may draw.
/// - `base` - Undimmed stroke color.
///
/// ### Returns
/// The RGB triple to draw with.
pub fn color_for(progress: u32, budget: u32, base: BaseColor) -> Rgb {
    if budget == 0 {
        return [0, 0, 0];
    }

    let dimmed = (f64::from(progress) * 255.0 / f64::from(budget)).round_ties_even();
    let fade = (255.0 - dimmed).clamp(0.0, 255.0) as u32;

    base.channels()
        .unwrap_or([255; 3])
        .map(|c| (fade * u32::from(c) / 255) as u8)
}
