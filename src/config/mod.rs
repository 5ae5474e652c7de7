//! Runtime configuration loaded from JSON.
//!
//! [`LineFollowerConfig`] gathers every tunable of the control core. All
//! sections default to the values the drone was tuned with, so a config file
//! only lists what it overrides.

pub mod follow_images;

use crate::color::LineColor;
use crate::control::ControlParams;
use crate::extract::{ContourParams, ExtractionMethod, HoughParams};
use crate::segment::SegmenterParams;
use crate::supervisor::SafetyParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFollowerConfig {
    /// Line color tracked at startup.
    pub color: LineColor,
    /// Extraction strategy used at startup.
    pub method: ExtractionMethod,
    /// Expected camera frame size; frames of another size are resized by the
    /// replay tool.
    pub frame_width: usize,
    pub frame_height: usize,
    pub segmenter: SegmenterParams,
    pub contour: ContourParams,
    pub hough: HoughParams,
    pub control: ControlParams,
    pub safety: SafetyParams,
}

impl Default for LineFollowerConfig {
    fn default() -> Self {
        Self {
            color: LineColor::default(),
            method: ExtractionMethod::default(),
            frame_width: 960,
            frame_height: 720,
            segmenter: SegmenterParams::default(),
            contour: ContourParams::default(),
            hough: HoughParams::default(),
            control: ControlParams::default(),
            safety: SafetyParams::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<LineFollowerConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
