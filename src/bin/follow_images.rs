//! Replay a directory of camera frames through the full control loop.
//!
//! Frames are resized to the configured camera size when needed, the
//! actuator records commands instead of flying, and the battery reports a
//! fixed level. Writes one JSON report for the whole session and, optionally,
//! every segmentation mask.
use line_follower::config::follow_images::load_config;
use line_follower::cycle::{CycleIo, CycleOutcome, FrameCycle};
use line_follower::diagnostics::{CycleReport, SessionStats};
use line_follower::hal::mock::{RecordingActuator, ScriptedBattery};
use line_follower::hal::{FrameSource, OverlayFrame, OverlaySink};
use line_follower::LineFollowerConfig;
use line_follower::image::io::{load_rgb_image, save_mask_png, write_json_file};
use line_follower::image::OwnedFrame;
use log::{info, warn};
use serde::Serialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let files = list_frames(&config.input_dir)?;
    if files.is_empty() {
        return Err(format!("No PNG/JPEG frames in {}", config.input_dir.display()));
    }
    info!("replaying {} frames from {}", files.len(), config.input_dir.display());

    let mut cycle = FrameCycle::new(config.follower.clone());
    let mut frames = DirFrameSource::new(
        files,
        config.follower.frame_width,
        config.follower.frame_height,
    );
    let mut actuator = RecordingActuator::new();
    let mut battery = ScriptedBattery::constant(config.replay.battery_percent);
    let mut overlay = MaskDump::new(config.output.mask_dir.clone());

    cycle
        .preflight(&mut battery)
        .map_err(|e| format!("Preflight failed: {e}"))?;
    let start = Instant::now();
    if config.replay.autonomous {
        let supervisor = cycle.supervisor_mut();
        supervisor
            .takeoff(&mut actuator, start)
            .map_err(|e| format!("Takeoff failed: {e}"))?;
        supervisor
            .enable_autonomous()
            .map_err(|e| format!("Autonomous mode refused: {e}"))?;
    }

    let step = Duration::from_millis(config.replay.frame_interval_ms);
    let mut reports = Vec::new();
    let mut now = start;
    while frames.remaining() > 0 {
        let mut io = CycleIo {
            frames: &mut frames,
            actuator: &mut actuator,
            battery: &mut battery,
            overlay: &mut overlay,
        };
        match cycle.run_cycle_at(&mut io, now) {
            CycleOutcome::Processed(report) => reports.push(*report),
            CycleOutcome::NoFrame => {}
            CycleOutcome::Stopped { .. } => break,
        }
        now += step;
    }
    if let Some(err) = overlay.error.take() {
        warn!("{err}");
    }

    cycle
        .shutdown(&mut actuator)
        .map_err(|e| format!("Shutdown failed: {e}"))?;
    let session = SessionReport {
        config: &config.follower,
        stats: *cycle.stats(),
        cycles: reports,
    };
    write_json_file(&config.output.report_json, &session)?;
    println!(
        "frames={} detected={} sent={} report={}",
        session.stats.frames_processed,
        session.stats.lines_detected,
        session.stats.commands_sent,
        config.output.report_json.display()
    );
    Ok(())
}

fn usage() -> String {
    "Usage: follow_images <config.json>".to_string()
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read {}: {e}", dir.display()))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Frames decoded from disk one at a time. Unreadable files become dropped
/// frames.
struct DirFrameSource {
    files: std::vec::IntoIter<PathBuf>,
    width: usize,
    height: usize,
}

impl DirFrameSource {
    fn new(files: Vec<PathBuf>, width: usize, height: usize) -> Self {
        Self {
            files: files.into_iter(),
            width,
            height,
        }
    }

    fn remaining(&self) -> usize {
        self.files.len()
    }

    fn size(&self) -> Option<(usize, usize)> {
        Some((self.width, self.height))
    }
}

impl FrameSource for DirFrameSource {
    fn acquire(&mut self) -> Option<OwnedFrame> {
        let path = self.files.next()?;
        match load_rgb_image(&path, self.size()) {
            Ok(frame) => Some(frame),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }
}

/// Overlay sink that writes each mask as `mask_NNNNN.png`.
struct MaskDump {
    dir: Option<PathBuf>,
    index: usize,
    error: Option<String>,
}

impl MaskDump {
    fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            index: 0,
            error: None,
        }
    }
}

impl OverlaySink for MaskDump {
    fn present(&mut self, overlay: &OverlayFrame<'_>) {
        self.index += 1;
        let Some(dir) = &self.dir else {
            return;
        };
        let path = dir.join(format!("mask_{:05}.png", self.index));
        if let Err(err) = save_mask_png(overlay.mask, &path) {
            self.error.get_or_insert(err);
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionReport<'a> {
    config: &'a LineFollowerConfig,
    stats: SessionStats,
    cycles: Vec<CycleReport>,
}
