//! Configuration of the `follow_images` replay tool.
use super::LineFollowerConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FollowImagesConfig {
    /// Directory of PNG/JPEG frames, replayed in file-name order.
    pub input_dir: PathBuf,
    #[serde(default)]
    pub follower: LineFollowerConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
    pub output: FollowImagesOutput,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Battery level reported by the simulated sensor.
    pub battery_percent: u8,
    /// Take off and enable autonomous mode before the first frame.
    pub autonomous: bool,
    /// Simulated time between frames in milliseconds.
    pub frame_interval_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            battery_percent: 100,
            autonomous: true,
            frame_interval_ms: 33,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowImagesOutput {
    /// Session report with one entry per cycle.
    pub report_json: PathBuf,
    /// Segmentation masks are written here when set.
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FollowImagesConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
