//! Flight state machine and safety policy.
//!
//! Purpose
//! - Own the only mutable flight state: [`FlightState`], the line-loss
//!   streak, flight time, last battery reading and link health.
//! - Gate every actuator command on that state and turn safety conditions
//!   into transitions.
//!
//! Design
//! - `Grounded → Flying{autonomous: false}` via [`FlightSupervisor::takeoff`],
//!   back via [`FlightSupervisor::land`]. Autonomy toggles only while flying.
//! - `Emergency` is reachable from every state and left only through
//!   [`FlightSupervisor::acknowledge_emergency`], after the actuator's
//!   emergency command went through. It never returns to `Flying` directly.
//! - [`FlightSupervisor::supervise`] runs once per processed frame, in order:
//!   streak update, line-loss degrade, critical battery, low battery warning,
//!   flight time limit.
//! - An actuator failure marks the link unhealthy. Until
//!   [`FlightSupervisor::mark_link_restored`] the supervisor drops autonomy
//!   and refuses takeoff, autonomy and velocity output. Land and emergency
//!   commands are always attempted.
//! - Transitions and forced decisions are queued as [`SupervisorEvent`]s and
//!   logged; callers drain them with [`FlightSupervisor::take_events`].

pub mod events;
pub mod state;

pub use events::SupervisorEvent;
pub use state::{Action, FlightState};

use crate::control::VelocityCommand;
use crate::error::{ActuatorError, FlightError, SensorError};
use crate::hal::Actuator;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Safety limits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyParams {
    /// Forced landing once flight time exceeds this many seconds.
    pub max_flight_time_s: f64,
    pub low_battery_percent: u8,
    pub emergency_battery_percent: u8,
    /// Consecutive line-less frames tolerated before autonomy drops.
    pub max_line_lost: u32,
    /// Poll the battery every this many processed cycles.
    pub battery_poll_interval: u32,
}

impl Default for SafetyParams {
    fn default() -> Self {
        Self {
            max_flight_time_s: 300.0,
            low_battery_percent: 20,
            emergency_battery_percent: 10,
            max_line_lost: 30,
            battery_poll_interval: 90,
        }
    }
}

impl SafetyParams {
    pub fn max_flight_time(&self) -> Duration {
        Duration::from_secs_f64(self.max_flight_time_s.max(0.0))
    }
}

/// Snapshot of the supervisor's counters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorCounters {
    pub line_lost_streak: u32,
    pub flight_elapsed: Duration,
    pub battery_percent: Option<u8>,
    pub link_healthy: bool,
}

#[derive(Debug)]
pub struct FlightSupervisor {
    params: SafetyParams,
    state: FlightState,
    line_lost_streak: u32,
    takeoff_at: Option<Instant>,
    flight_elapsed: Duration,
    battery_percent: Option<u8>,
    battery_fresh: bool,
    link_healthy: bool,
    emergency_issued: bool,
    events: Vec<SupervisorEvent>,
}

impl FlightSupervisor {
    pub fn new(params: SafetyParams) -> Self {
        Self {
            params,
            state: FlightState::Grounded,
            line_lost_streak: 0,
            takeoff_at: None,
            flight_elapsed: Duration::ZERO,
            battery_percent: None,
            battery_fresh: false,
            link_healthy: true,
            emergency_issued: false,
            events: Vec::new(),
        }
    }

    pub fn params(&self) -> &SafetyParams {
        &self.params
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_flying(&self) -> bool {
        self.state.is_flying()
    }

    pub fn is_autonomous(&self) -> bool {
        self.state.is_autonomous()
    }

    pub fn link_healthy(&self) -> bool {
        self.link_healthy
    }

    pub fn battery_percent(&self) -> Option<u8> {
        self.battery_percent
    }

    pub fn counters(&self) -> SupervisorCounters {
        SupervisorCounters {
            line_lost_streak: self.line_lost_streak,
            flight_elapsed: self.flight_elapsed,
            battery_percent: self.battery_percent,
            link_healthy: self.link_healthy,
        }
    }

    /// Drain queued events in the order they happened.
    pub fn take_events(&mut self) -> Vec<SupervisorEvent> {
        std::mem::take(&mut self.events)
    }

    fn transition(&mut self, to: FlightState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!("flight state {from} -> {to}");
        self.events.push(SupervisorEvent::StateChanged { from, to });
    }

    fn refuse(&self, action: Action) -> FlightError {
        warn!("refusing to {action} while {}", self.state);
        FlightError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    fn actuator_failed(&mut self, action: Action, err: ActuatorError) -> FlightError {
        warn!("actuator failed to {action}: {err}");
        self.events.push(SupervisorEvent::ActuatorFailure {
            action,
            reason: err.to_string(),
        });
        if self.link_healthy {
            self.link_healthy = false;
            warn!("actuator link marked unhealthy");
            self.events.push(SupervisorEvent::LinkLost);
        }
        if self.state.is_autonomous() {
            self.transition(FlightState::Flying { autonomous: false });
        }
        FlightError::Actuator(err)
    }

    /// Refuse takeoff when the last known battery is below the emergency
    /// threshold. An unknown battery level is allowed.
    pub fn check_takeoff_battery(&self) -> Result<(), FlightError> {
        match self.battery_percent {
            Some(percent) if percent < self.params.emergency_battery_percent => {
                Err(FlightError::BatteryTooLow {
                    percent,
                    threshold: self.params.emergency_battery_percent,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn takeoff(&mut self, actuator: &mut dyn Actuator, now: Instant) -> Result<(), FlightError> {
        if self.state != FlightState::Grounded {
            return Err(self.refuse(Action::Takeoff));
        }
        if !self.link_healthy {
            return Err(FlightError::LinkUnhealthy);
        }
        self.check_takeoff_battery()?;
        actuator
            .takeoff()
            .map_err(|e| self.actuator_failed(Action::Takeoff, e))?;
        self.takeoff_at = Some(now);
        self.flight_elapsed = Duration::ZERO;
        self.line_lost_streak = 0;
        self.transition(FlightState::Flying { autonomous: false });
        Ok(())
    }

    pub fn land(&mut self, actuator: &mut dyn Actuator) -> Result<(), FlightError> {
        if !self.state.is_flying() {
            return Err(self.refuse(Action::Land));
        }
        actuator
            .land()
            .map_err(|e| self.actuator_failed(Action::Land, e))?;
        self.takeoff_at = None;
        self.transition(FlightState::Grounded);
        Ok(())
    }

    pub fn enable_autonomous(&mut self) -> Result<(), FlightError> {
        if !self.state.is_flying() {
            return Err(self.refuse(Action::EnableAutonomous));
        }
        if !self.link_healthy {
            warn!("autonomous mode refused: actuator link unhealthy");
            return Err(FlightError::LinkUnhealthy);
        }
        self.line_lost_streak = 0;
        self.transition(FlightState::Flying { autonomous: true });
        Ok(())
    }

    pub fn disable_autonomous(&mut self) -> Result<(), FlightError> {
        if !self.state.is_flying() {
            return Err(self.refuse(Action::DisableAutonomous));
        }
        self.transition(FlightState::Flying { autonomous: false });
        Ok(())
    }

    /// Enter `Emergency` and issue the actuator's emergency command. The
    /// command goes out once per emergency; a failed attempt is retried on
    /// the next call.
    pub fn emergency_stop(&mut self, actuator: &mut dyn Actuator) -> Result<(), FlightError> {
        if self.state != FlightState::Emergency {
            error!("emergency stop from {}", self.state);
            self.emergency_issued = false;
            self.takeoff_at = None;
            self.transition(FlightState::Emergency);
        }
        if self.emergency_issued {
            return Ok(());
        }
        actuator
            .emergency_stop()
            .map_err(|e| self.actuator_failed(Action::EmergencyStop, e))?;
        self.emergency_issued = true;
        Ok(())
    }

    /// Leave `Emergency` for `Grounded` once the emergency command succeeded.
    pub fn acknowledge_emergency(&mut self) -> Result<(), FlightError> {
        if self.state != FlightState::Emergency || !self.emergency_issued {
            return Err(self.refuse(Action::AcknowledgeEmergency));
        }
        self.emergency_issued = false;
        self.line_lost_streak = 0;
        self.transition(FlightState::Grounded);
        Ok(())
    }

    /// Record a battery reading. Errors keep the last known value.
    pub fn update_battery(&mut self, reading: Result<u8, SensorError>) {
        match reading {
            Ok(percent) => {
                self.battery_percent = Some(percent.min(100));
                self.battery_fresh = true;
            }
            Err(err) => warn!("battery read failed, keeping last value: {err}"),
        }
    }

    /// Forward a velocity command while flying over a healthy link.
    pub fn send_velocity(
        &mut self,
        actuator: &mut dyn Actuator,
        command: &VelocityCommand,
    ) -> Result<(), FlightError> {
        if !self.state.is_flying() {
            return Err(self.refuse(Action::SendVelocity));
        }
        if !self.link_healthy {
            return Err(FlightError::LinkUnhealthy);
        }
        actuator
            .send_velocity(command)
            .map_err(|e| self.actuator_failed(Action::SendVelocity, e))
    }

    /// Externally confirmed reconnection.
    pub fn mark_link_restored(&mut self) {
        if !self.link_healthy {
            self.link_healthy = true;
            info!("actuator link restored");
            self.events.push(SupervisorEvent::LinkRestored);
        }
    }

    /// Apply the per-frame safety policy.
    pub fn supervise(
        &mut self,
        actuator: &mut dyn Actuator,
        line_detected: bool,
        now: Instant,
    ) -> Result<(), FlightError> {
        self.line_lost_streak = if line_detected {
            0
        } else {
            self.line_lost_streak.saturating_add(1)
        };
        let fresh = std::mem::replace(&mut self.battery_fresh, false);

        let FlightState::Flying { autonomous } = self.state else {
            return Ok(());
        };
        if let Some(t0) = self.takeoff_at {
            self.flight_elapsed = self.flight_elapsed.max(now.saturating_duration_since(t0));
        }

        if autonomous && self.line_lost_streak > self.params.max_line_lost {
            warn!(
                "line lost for {} frames, dropping to manual hover",
                self.line_lost_streak
            );
            self.events.push(SupervisorEvent::LineLostDegrade {
                streak: self.line_lost_streak,
            });
            self.transition(FlightState::Flying { autonomous: false });
        }

        if let Some(percent) = self.battery_percent {
            if percent < self.params.emergency_battery_percent {
                error!("battery critical at {percent}%");
                self.events.push(SupervisorEvent::BatteryCritical { percent });
                return self.emergency_stop(actuator);
            }
            if fresh && percent < self.params.low_battery_percent {
                warn!("battery low at {percent}%");
                self.events.push(SupervisorEvent::LowBattery { percent });
            }
        }

        if self.flight_elapsed > self.params.max_flight_time() {
            let elapsed_s = self.flight_elapsed.as_secs_f64();
            warn!("flight time {elapsed_s:.1}s exceeded, landing");
            self.events
                .push(SupervisorEvent::FlightTimeExceeded { elapsed_s });
            return self.land(actuator);
        }
        Ok(())
    }
}
