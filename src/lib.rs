#![doc = include_str!("../README.md")]

// Pipeline stages, leaf first.
pub mod color;
pub mod control;
pub mod extract;
pub mod image;
pub mod segment;
pub mod supervisor;

// Orchestration and the seams around it.
pub mod config;
pub mod cycle;
pub mod diagnostics;
pub mod error;
pub mod hal;

// Lower-level building blocks; public for tools and tests.
pub mod edges;

// --- High-level re-exports -------------------------------------------------

pub use crate::color::{ColorProfile, LineColor};
pub use crate::config::LineFollowerConfig;
pub use crate::control::{compute_velocity, ControlParams, VelocityCommand};
pub use crate::cycle::{CycleIo, CycleOutcome, FrameCycle, StopHandle};
pub use crate::error::{ActuatorError, FlightError, SensorError};
pub use crate::extract::{ExtractionMethod, LineEstimate, LineExtractor, LineObservation};
pub use crate::segment::{segment, SegmenterParams};
pub use crate::supervisor::{FlightState, FlightSupervisor, SafetyParams, SupervisorEvent};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for wiring a control loop.
///
/// ```no_run
/// use line_follower::prelude::*;
/// use line_follower::hal::mock::{NullOverlay, RecordingActuator, ScriptedBattery, ScriptedFrameSource};
///
/// # fn main() {
/// let mut cycle = FrameCycle::new(LineFollowerConfig::default());
/// let mut frames = ScriptedFrameSource::new();
/// let mut actuator = RecordingActuator::new();
/// let mut battery = ScriptedBattery::constant(90);
/// let mut overlay = NullOverlay;
/// let mut io = CycleIo {
///     frames: &mut frames,
///     actuator: &mut actuator,
///     battery: &mut battery,
///     overlay: &mut overlay,
/// };
/// if let CycleOutcome::Processed(report) = cycle.run_cycle(&mut io) {
///     println!("detected={}", report.observation.is_detected());
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::hal::{Actuator, BatterySensor, FrameSource, OverlaySink};
    pub use crate::image::{OwnedFrame, RgbImageU8};
    pub use crate::{
        CycleIo, CycleOutcome, ExtractionMethod, FlightState, FrameCycle, LineColor,
        LineFollowerConfig, LineObservation, VelocityCommand,
    };
}
