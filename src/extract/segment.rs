use nalgebra::Point2;
use serde::Serialize;

/// Straight segment found by the Hough extractor, endpoints in pixels.
///
/// Endpoints follow the walk direction: increasing x for lines closer to
/// horizontal, increasing y otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineSegment {
    pub p0: Point2<f32>,
    pub p1: Point2<f32>,
}

impl LineSegment {
    pub fn new(p0: Point2<f32>, p1: Point2<f32>) -> Self {
        Self { p0, p1 }
    }

    pub fn midpoint(&self) -> Point2<f32> {
        Point2::new((self.p0.x + self.p1.x) * 0.5, (self.p0.y + self.p1.y) * 0.5)
    }

    pub fn length(&self) -> f32 {
        (self.p1 - self.p0).norm()
    }

    /// `atan2(dy, dx)` in degrees.
    pub fn angle_deg(&self) -> f32 {
        let d = self.p1 - self.p0;
        d.y.atan2(d.x).to_degrees()
    }

    /// Put endpoints in walk order (see type docs).
    pub fn normalized(self) -> Self {
        let d = self.p1 - self.p0;
        let swap = if d.x.abs() >= d.y.abs() {
            d.x < 0.0
        } else {
            d.y < 0.0
        };
        if swap {
            Self::new(self.p1, self.p0)
        } else {
            self
        }
    }
}
