use glam::Vec2;

/// A position in canvas space. Pixel `(x, y)` covers the point `(x, y)`
/// after rounding.
pub type Point = Vec2;

/// An 8-bit RGB color. `[0, 0, 0]` is the canvas background.
pub type Rgb = [u8; 3];

/// A pending segment request: where it is centered and which way it points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub origin: Point,
    /// Direction in degrees, measured from the +x axis towards +y.
    pub angle: f32,
}

/// A straight segment centered on a candidate's origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Candidate {
    pub fn new(origin: Point, angle: f32) -> Self {
        Self { origin, angle }
    }

    /// Projects `length / 2` both ways along the candidate's angle.
    pub fn segment(&self, length: f32) -> Segment {
        let half = Vec2::from_angle(self.angle.to_radians()) * (length * 0.5);
        Segment {
            a: self.origin - half,
            b: self.origin + half,
        }
    }
}

impl Segment {
    pub fn endpoints(&self) -> (Point, Point) {
        (self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_segment_is_centered_on_origin() {
        let seg = Candidate::new(Vec2::new(50.0, 50.0), 0.0).segment(20.0);
        assert_eq!(seg.a, Vec2::new(40.0, 50.0));
        assert_eq!(seg.b, Vec2::new(60.0, 50.0));
    }

    #[test]
    fn vertical_segment_has_requested_length() {
        let seg = Candidate::new(Vec2::new(10.0, 10.0), 90.0).segment(8.0);
        assert!((seg.a.distance(seg.b) - 8.0).abs() < 1e-4);
        assert!((seg.a.x - 10.0).abs() < 1e-4);
        assert!((seg.a.y - 6.0).abs() < 1e-4);
        assert!((seg.b.y - 14.0).abs() < 1e-4);
    }
}
