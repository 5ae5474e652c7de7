//! Seams to the outside world: camera, flight actuator, battery sensor and
//! overlay renderer.
//!
//! The control core only talks to these traits. Real transports live outside
//! this crate; [`mock`] provides scripted in-memory implementations used by
//! the tests and the image replay tool.

pub mod mock;

use crate::color::LineColor;
use crate::control::VelocityCommand;
use crate::error::{ActuatorError, SensorError};
use crate::extract::{ExtractionMethod, LineObservation};
use crate::image::{Mask, OwnedFrame, RgbImageU8};
use crate::supervisor::FlightState;

/// Camera frames. May block until a frame is ready; `None` means no frame
/// this cycle.
pub trait FrameSource {
    fn acquire(&mut self) -> Option<OwnedFrame>;
}

/// Flight commands. Every call must be safe to repeat.
pub trait Actuator {
    fn takeoff(&mut self) -> Result<(), ActuatorError>;
    fn land(&mut self) -> Result<(), ActuatorError>;
    fn emergency_stop(&mut self) -> Result<(), ActuatorError>;
    fn send_velocity(&mut self, command: &VelocityCommand) -> Result<(), ActuatorError>;
}

pub trait BatterySensor {
    /// Remaining charge in percent.
    fn read_percent(&mut self) -> Result<u8, SensorError>;
}

/// Everything one cycle produced, for display only.
#[derive(Clone, Copy, Debug)]
pub struct OverlayFrame<'a> {
    pub frame: RgbImageU8<'a>,
    pub mask: &'a Mask,
    pub observation: &'a LineObservation,
    pub command: VelocityCommand,
    pub state: FlightState,
    pub color: LineColor,
    pub method: ExtractionMethod,
    pub battery_percent: Option<u8>,
}

pub trait OverlaySink {
    fn present(&mut self, overlay: &OverlayFrame<'_>);
}
