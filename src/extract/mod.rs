//! Line estimation from segmentation masks.
//!
//! Two interchangeable strategies implement [`LineExtractor`]:
//!
//! - [`contour::ContourExtractor`]: largest connected region, centroid and
//!   bounding-box geometry. Robust, but carries no heading.
//! - [`hough::HoughExtractor`]: Canny edges plus a probabilistic Hough
//!   transform; the longest segment gives a true orientation.
//!
//! [`ExtractionMethod`] tags the strategy at runtime and is carried inside
//! each estimate, so downstream stages can tell whether the angle is a
//! heading without knowing which extractor ran. [`LineExtractors`] holds one
//! configured instance of each and hands out the selected one, which lets the
//! cycle switch strategies between frames.

pub mod components;
pub mod contour;
pub mod hough;
pub mod segment;

pub use contour::{ContourExtractor, ContourParams};
pub use hough::{HoughExtractor, HoughParams};
pub use segment::LineSegment;

use crate::image::Mask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    #[default]
    Contour,
    Hough,
}

impl ExtractionMethod {
    pub const ALL: [ExtractionMethod; 2] = [ExtractionMethod::Contour, ExtractionMethod::Hough];

    pub fn name(self) -> &'static str {
        match self {
            ExtractionMethod::Contour => "contour",
            ExtractionMethod::Hough => "hough",
        }
    }

    /// Whether estimates from this method carry the line's heading.
    pub fn uses_orientation(self) -> bool {
        matches!(self, ExtractionMethod::Hough)
    }

    /// The other method; used by the runtime toggle.
    pub fn toggled(self) -> Self {
        match self {
            ExtractionMethod::Contour => ExtractionMethod::Hough,
            ExtractionMethod::Hough => ExtractionMethod::Contour,
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExtractionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtractionMethod::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown extraction method '{s}' (expected contour|hough)"))
    }
}

/// Position and orientation of a detected line, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEstimate {
    pub center: Point2<f32>,
    pub angle_deg: f32,
    pub length: f32,
    pub method: ExtractionMethod,
}

/// Per-frame extraction result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LineObservation {
    #[default]
    Lost,
    Detected(LineEstimate),
}

impl LineObservation {
    pub fn is_detected(&self) -> bool {
        matches!(self, LineObservation::Detected(_))
    }

    pub fn estimate(&self) -> Option<&LineEstimate> {
        match self {
            LineObservation::Detected(e) => Some(e),
            LineObservation::Lost => None,
        }
    }
}

/// A strategy turning a mask into a [`LineObservation`].
pub trait LineExtractor {
    fn method(&self) -> ExtractionMethod;

    /// Estimate the line in `mask`. `previous` is the last detected estimate,
    /// used only to break ties between equally good candidates.
    fn extract(&self, mask: &Mask, previous: Option<&LineEstimate>) -> LineObservation;
}

/// One configured extractor per [`ExtractionMethod`].
#[derive(Clone, Debug, Default)]
pub struct LineExtractors {
    pub contour: ContourExtractor,
    pub hough: HoughExtractor,
}

impl LineExtractors {
    pub fn new(contour: ContourParams, hough: HoughParams) -> Self {
        Self {
            contour: ContourExtractor::new(contour),
            hough: HoughExtractor::new(hough),
        }
    }

    pub fn get(&self, method: ExtractionMethod) -> &dyn LineExtractor {
        match method {
            ExtractionMethod::Contour => &self.contour,
            ExtractionMethod::Hough => &self.hough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parsing_and_toggle() {
        assert_eq!("Hough".parse::<ExtractionMethod>(), Ok(ExtractionMethod::Hough));
        assert!("sobel".parse::<ExtractionMethod>().is_err());
        assert_eq!(ExtractionMethod::Contour.toggled(), ExtractionMethod::Hough);
        assert!(!ExtractionMethod::Contour.uses_orientation());
    }

    #[test]
    fn registry_hands_out_selected_method() {
        let ex = LineExtractors::default();
        for m in ExtractionMethod::ALL {
            assert_eq!(ex.get(m).method(), m);
        }
    }

    #[test]
    fn lost_observation_has_no_estimate() {
        assert!(LineObservation::Lost.estimate().is_none());
        assert!(!LineObservation::default().is_detected());
    }
}
