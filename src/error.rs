//! Error types for the hardware seams and the flight supervisor.
use crate::supervisor::{Action, FlightState};
use thiserror::Error;

/// Failure reported by an [`crate::hal::Actuator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActuatorError {
    #[error("actuator link down: {0}")]
    Link(String),
}

/// Failure reported by a [`crate::hal::BatterySensor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("sensor unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlightError {
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: FlightState, action: Action },
    #[error("battery at {percent}% is below the {threshold}% limit")]
    BatteryTooLow { percent: u8, threshold: u8 },
    #[error("actuator link is unhealthy")]
    LinkUnhealthy,
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
}
