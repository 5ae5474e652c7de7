//! Scripted in-memory HAL implementations.
use super::{Actuator, BatterySensor, FrameSource, OverlayFrame, OverlaySink};
use crate::control::VelocityCommand;
use crate::error::{ActuatorError, SensorError};
use crate::image::OwnedFrame;
use crate::supervisor::FlightState;
use log::debug;
use std::collections::VecDeque;

/// Replays a fixed queue of frames; `None` entries simulate dropped frames.
#[derive(Debug, Default)]
pub struct ScriptedFrameSource {
    queue: VecDeque<Option<OwnedFrame>>,
}

impl ScriptedFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frames(frames: impl IntoIterator<Item = OwnedFrame>) -> Self {
        Self {
            queue: frames.into_iter().map(Some).collect(),
        }
    }

    pub fn push_frame(&mut self, frame: OwnedFrame) {
        self.queue.push_back(Some(frame));
    }

    pub fn push_gap(&mut self) {
        self.queue.push_back(None);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl FrameSource for ScriptedFrameSource {
    fn acquire(&mut self) -> Option<OwnedFrame> {
        self.queue.pop_front().flatten()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActuatorCall {
    Takeoff,
    Land,
    EmergencyStop,
    Velocity(VelocityCommand),
}

/// Records every call. Can be told to fail the next `n` calls.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub calls: Vec<ActuatorCall>,
    failures_left: usize,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&mut self, n: usize) {
        self.failures_left = n;
    }

    pub fn count(&self, call: ActuatorCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    pub fn velocities(&self) -> Vec<VelocityCommand> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Velocity(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn last_velocity(&self) -> Option<VelocityCommand> {
        self.velocities().last().copied()
    }

    fn record(&mut self, call: ActuatorCall) -> Result<(), ActuatorError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            debug!("mock actuator failing {call:?}");
            return Err(ActuatorError::Link("scripted failure".to_string()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Actuator for RecordingActuator {
    fn takeoff(&mut self) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Takeoff)
    }

    fn land(&mut self) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Land)
    }

    fn emergency_stop(&mut self) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::EmergencyStop)
    }

    fn send_velocity(&mut self, command: &VelocityCommand) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Velocity(*command))
    }
}

/// Returns scripted readings in order, then keeps repeating the last one.
#[derive(Debug)]
pub struct ScriptedBattery {
    readings: VecDeque<Result<u8, SensorError>>,
    last: Result<u8, SensorError>,
    pub reads: usize,
}

impl ScriptedBattery {
    pub fn constant(percent: u8) -> Self {
        Self::sequence([Ok(percent)])
    }

    pub fn sequence(readings: impl IntoIterator<Item = Result<u8, SensorError>>) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            last: Err(SensorError::Unavailable("no reading scripted".to_string())),
            reads: 0,
        }
    }
}

impl BatterySensor for ScriptedBattery {
    fn read_percent(&mut self) -> Result<u8, SensorError> {
        self.reads += 1;
        if let Some(next) = self.readings.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }
}

#[derive(Debug, Default)]
pub struct NullOverlay;

impl OverlaySink for NullOverlay {
    fn present(&mut self, _overlay: &OverlayFrame<'_>) {}
}

/// What the overlay was shown on one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentedFrame {
    pub state: FlightState,
    pub command: VelocityCommand,
    pub detected: bool,
}

#[derive(Debug, Default)]
pub struct RecordingOverlay {
    pub frames: Vec<PresentedFrame>,
}

impl OverlaySink for RecordingOverlay {
    fn present(&mut self, overlay: &OverlayFrame<'_>) {
        self.frames.push(PresentedFrame {
            state: overlay.state,
            command: overlay.command,
            detected: overlay.observation.is_detected(),
        });
    }
}
