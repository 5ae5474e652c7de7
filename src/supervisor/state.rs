use serde::Serialize;
use std::fmt;

/// Flight mode of the vehicle. Autonomy is only meaningful while flying,
/// so it lives inside that variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FlightState {
    #[default]
    Grounded,
    Flying {
        autonomous: bool,
    },
    /// Terminal for the current flight; left only through an acknowledged reset.
    Emergency,
}

impl FlightState {
    pub fn is_flying(self) -> bool {
        matches!(self, FlightState::Flying { .. })
    }

    pub fn is_autonomous(self) -> bool {
        matches!(self, FlightState::Flying { autonomous: true })
    }
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightState::Grounded => f.write_str("grounded"),
            FlightState::Flying { autonomous: true } => f.write_str("flying (autonomous)"),
            FlightState::Flying { autonomous: false } => f.write_str("flying (manual)"),
            FlightState::Emergency => f.write_str("emergency"),
        }
    }
}

/// Supervisor operations, used to name refused transitions and failed commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Takeoff,
    Land,
    EmergencyStop,
    SendVelocity,
    EnableAutonomous,
    DisableAutonomous,
    AcknowledgeEmergency,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Takeoff => "take off",
            Action::Land => "land",
            Action::EmergencyStop => "emergency stop",
            Action::SendVelocity => "send velocity",
            Action::EnableAutonomous => "enable autonomous mode",
            Action::DisableAutonomous => "disable autonomous mode",
            Action::AcknowledgeEmergency => "acknowledge emergency",
        };
        f.write_str(s)
    }
}
