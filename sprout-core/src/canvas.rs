//! The raster surface the growth engine draws on.
//!
//! The engine only needs to read single pixels and draw thick straight
//! strokes, so any pixel store can back it. [`image::RgbImage`] is the
//! implementation used by the viewer and the tests.

use crate::types::{Point, Rgb};
use image::RgbImage;
use imageproc::drawing::draw_line_segment_mut;

/// Color of a pixel nothing has been drawn on.
///
/// Any other value counts as occupied when testing for collisions, so a
/// stroke drawn in this color is invisible to later segments.
pub const BACKGROUND: Rgb = [0, 0, 0];

/// A 2-D pixel surface.
///
/// Pixel indices run over `0..width` and `0..height`; index `width` or
/// `height` is out of range.
pub trait Canvas {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Color at pixel `(x, y)`. Callers keep the coordinates in range.
    fn read_pixel(&self, x: u32, y: u32) -> Rgb;

    /// Draws a straight stroke `width` pixels thick from `a` to `b`.
    /// Parts of the stroke outside the surface are clipped.
    fn draw_segment(&mut self, a: Point, b: Point, color: Rgb, width: u32);

    fn width(&self) -> u32 {
        self.size().0
    }

    fn height(&self) -> u32 {
        self.size().1
    }
}

impl Canvas for RgbImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn read_pixel(&self, x: u32, y: u32) -> Rgb {
        self.get_pixel(x, y).0
    }

    fn draw_segment(&mut self, a: Point, b: Point, color: Rgb, width: u32) {
        // Thick strokes are parallel 1-pixel lines stacked along the
        // minor axis of the segment. Neighbouring lines sit `cos θ` apart
        // across the stroke (θ measured from the major axis), so sloped
        // strokes get `width / cos θ` lines to keep their width.
        let d = b - a;
        let major = d.x.abs().max(d.y.abs());
        let step = if d.x.abs() >= d.y.abs() {
            Point::Y
        } else {
            Point::X
        };
        let lines = if major > 0.0 {
            (width as f32 * d.length() / major).round() as u32
        } else {
            width
        }
        .max(1);

        let first = -(((lines - 1) / 2) as f32);
        for i in 0..lines {
            let off = step * (first + i as f32);
            let (p, q) = (a + off, b + off);
            draw_line_segment_mut(self, (p.x, p.y), (q.x, q.y), image::Rgb(color));
        }
    }
}

/// Returns `true` if pixel `(x, y)` has not been drawn on.
pub fn is_background<C: Canvas + ?Sized>(canvas: &C, x: u32, y: u32) -> bool {
    canvas.read_pixel(x, y) == BACKGROUND
}
