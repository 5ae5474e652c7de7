use super::state::{Action, FlightState};
use serde::Serialize;

/// Observable supervisor decisions. Every transition and every forced
/// degrade produces one of these.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SupervisorEvent {
    StateChanged {
        from: FlightState,
        to: FlightState,
    },
    /// Autonomy dropped after too many consecutive frames without a line.
    LineLostDegrade {
        streak: u32,
    },
    LowBattery {
        percent: u8,
    },
    BatteryCritical {
        percent: u8,
    },
    FlightTimeExceeded {
        elapsed_s: f64,
    },
    ActuatorFailure {
        action: Action,
        reason: String,
    },
    LinkLost,
    LinkRestored,
}
