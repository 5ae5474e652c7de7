//! Largest-region line estimate.
//!
//! The mask is binarised (`> 0`) and split into 8-connected regions. Regions
//! whose pixel area does not exceed `min_line_area` are treated as noise. The
//! largest survivor gives the estimate:
//!
//! - center: region centroid from its moments
//! - angle: `atan2(h, w)` of the inclusive bounding box, in degrees
//! - length: bounding-box diagonal
//!
//! The angle describes the box aspect, not the line's heading, so it always
//! lies in (0°, 90°) and the controller does not steer on it.
//!
//! Equal areas resolve to the centroid nearest the previous estimate's center
//! when one is given, else to the region met first in raster order.
use super::components::{label_regions, Region};
use super::{ExtractionMethod, LineEstimate, LineExtractor, LineObservation};
use crate::image::Mask;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Regions with `area <= min_line_area` pixels are ignored.
    pub min_line_area: usize,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self { min_line_area: 500 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ContourExtractor {
    pub params: ContourParams,
}

impl ContourExtractor {
    pub fn new(params: ContourParams) -> Self {
        Self { params }
    }
}

fn squared_distance(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a - b).norm_squared()
}

fn select_region<'r>(regions: &'r [Region], hint: Option<Point2<f32>>) -> Option<&'r Region> {
    let mut best: Option<&Region> = None;
    for region in regions {
        best = match best {
            None => Some(region),
            Some(current) if region.area > current.area => Some(region),
            Some(current) if region.area == current.area => match hint {
                Some(h) if squared_distance(region.centroid(), h)
                    < squared_distance(current.centroid(), h) =>
                {
                    Some(region)
                }
                _ => Some(current),
            },
            keep => keep,
        };
    }
    best
}

impl LineExtractor for ContourExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Contour
    }

    fn extract(&self, mask: &Mask, previous: Option<&LineEstimate>) -> LineObservation {
        let regions = label_regions(mask);
        let total = regions.len();
        let candidates: Vec<Region> = regions
            .into_iter()
            .filter(|r| r.area > self.params.min_line_area)
            .collect();
        debug!(
            "contour regions={} above_min_area={} (min={})",
            total,
            candidates.len(),
            self.params.min_line_area
        );

        let Some(region) = select_region(&candidates, previous.map(|p| p.center)) else {
            return LineObservation::Lost;
        };
        let w = region.bbox_width() as f32;
        let h = region.bbox_height() as f32;
        LineObservation::Detected(LineEstimate {
            center: region.centroid(),
            angle_deg: h.atan2(w).to_degrees(),
            length: (w * w + h * h).sqrt(),
            method: ExtractionMethod::Contour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(mask: &mut Mask, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..y1 {
            for x in x0..x1 {
                mask.set(x, y, 255);
            }
        }
    }

    #[test]
    fn blob_centroid_and_box_geometry() {
        let mut m = Mask::new(200, 100);
        rect(&mut m, 50, 40, 150, 60); // 100 × 20
        let obs = ContourExtractor::default().extract(&m, None);
        let est = obs.estimate().copied().expect("detected");
        assert!((est.center.x - 99.5).abs() < 1e-3);
        assert!((est.center.y - 49.5).abs() < 1e-3);
        assert!((est.angle_deg - 20f32.atan2(100.0).to_degrees()).abs() < 1e-4);
        assert!((est.length - (100f32 * 100.0 + 400.0).sqrt()).abs() < 1e-3);
        assert_eq!(est.method, ExtractionMethod::Contour);
    }

    #[test]
    fn empty_mask_is_lost() {
        let m = Mask::new(64, 64);
        assert_eq!(ContourExtractor::default().extract(&m, None), LineObservation::Lost);
    }

    #[test]
    fn area_at_minimum_is_rejected() {
        let mut m = Mask::new(100, 100);
        rect(&mut m, 10, 10, 35, 30); // exactly 500 px
        let ex = ContourExtractor::default();
        assert!(!ex.extract(&m, None).is_detected());
        m.set(35, 10, 255);
        assert!(ex.extract(&m, None).is_detected());
    }

    #[test]
    fn largest_region_wins() {
        let mut m = Mask::new(200, 200);
        rect(&mut m, 0, 0, 30, 30);
        rect(&mut m, 100, 100, 140, 140);
        let est = ContourExtractor::default().extract(&m, None).estimate().copied();
        let c = est.expect("detected").center;
        assert!((c.x - 119.5).abs() < 1e-3);
    }

    #[test]
    fn equal_areas_follow_previous_center_then_raster_order() {
        let mut m = Mask::new(200, 100);
        rect(&mut m, 10, 10, 40, 40);
        rect(&mut m, 150, 10, 180, 40);
        let ex = ContourExtractor::default();

        let first = ex.extract(&m, None).estimate().copied().expect("detected");
        assert!(first.center.x < 100.0);

        let hint = LineEstimate {
            center: Point2::new(170.0, 20.0),
            ..first
        };
        let followed = ex.extract(&m, Some(&hint)).estimate().copied().expect("detected");
        assert!(followed.center.x > 100.0);
    }
}
