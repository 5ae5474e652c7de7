use super::timing::TimingBreakdown;
use crate::color::LineColor;
use crate::control::VelocityCommand;
use crate::extract::{ExtractionMethod, LineObservation};
use crate::supervisor::{FlightState, SupervisorEvent};
use serde::Serialize;

/// Everything one processed cycle decided.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// 1-based index among processed cycles.
    pub cycle: u64,
    pub color: LineColor,
    pub method: ExtractionMethod,
    pub frame_width: usize,
    pub frame_height: usize,
    pub mask_coverage: f32,
    pub observation: LineObservation,
    /// Command chosen for this cycle (zero unless flying).
    pub command: VelocityCommand,
    /// Whether the command reached the actuator.
    pub sent: bool,
    pub state: FlightState,
    pub battery_percent: Option<u8>,
    pub battery_polled: bool,
    pub line_lost_streak: u32,
    pub events: Vec<SupervisorEvent>,
    pub timings: TimingBreakdown,
}
