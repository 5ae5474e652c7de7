use super::report::CycleReport;
use crate::supervisor::{FlightState, SupervisorEvent};
use serde::Serialize;

/// Running totals over a session, reported at shutdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub frames_processed: u64,
    /// Cycles where the frame source had nothing.
    pub frames_missing: u64,
    pub lines_detected: u64,
    pub commands_sent: u64,
    pub autonomous_degrades: u64,
    pub emergencies: u64,
    pub actuator_failures: u64,
}

impl SessionStats {
    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.frames_processed += 1;
        if report.observation.is_detected() {
            self.lines_detected += 1;
        }
        if report.sent {
            self.commands_sent += 1;
        }
        self.record_events(&report.events);
    }

    pub fn record_events(&mut self, events: &[SupervisorEvent]) {
        for event in events {
            match event {
                SupervisorEvent::LineLostDegrade { .. } => self.autonomous_degrades += 1,
                SupervisorEvent::StateChanged {
                    to: FlightState::Emergency,
                    ..
                } => self.emergencies += 1,
                SupervisorEvent::ActuatorFailure { .. } => self.actuator_failures += 1,
                _ => {}
            }
        }
    }

    /// Fraction of processed frames with a detected line.
    pub fn detection_rate(&self) -> f64 {
        if self.frames_processed == 0 {
            0.0
        } else {
            self.lines_detected as f64 / self.frames_processed as f64
        }
    }
}
