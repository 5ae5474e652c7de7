use super::stop::StopHandle;
use crate::color::LineColor;
use crate::config::LineFollowerConfig;
use crate::control::{compute_velocity, frame_center, VelocityCommand};
use crate::diagnostics::{CycleReport, SessionStats, TimingBreakdown};
use crate::error::FlightError;
use crate::extract::{ExtractionMethod, LineEstimate, LineExtractors};
use crate::hal::{Actuator, BatterySensor, FrameSource, OverlayFrame, OverlaySink};
use crate::segment::segment;
use crate::supervisor::{FlightState, FlightSupervisor, SupervisorEvent};
use log::{debug, info, warn};
use std::time::Instant;

/// The collaborators one cycle talks to.
pub struct CycleIo<'a> {
    pub frames: &'a mut dyn FrameSource,
    pub actuator: &'a mut dyn Actuator,
    pub battery: &'a mut dyn BatterySensor,
    pub overlay: &'a mut dyn OverlaySink,
}

#[derive(Clone, Debug)]
pub enum CycleOutcome {
    Processed(Box<CycleReport>),
    /// The frame source had nothing; no state was touched.
    NoFrame,
    /// A stop was requested; the vehicle is in emergency.
    Stopped { events: Vec<SupervisorEvent> },
}

impl CycleOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            CycleOutcome::Processed(r) => Some(r.as_ref()),
            _ => None,
        }
    }
}

/// Frame-by-frame orchestrator owning the supervisor and runtime switches.
pub struct FrameCycle {
    config: LineFollowerConfig,
    extractors: LineExtractors,
    supervisor: FlightSupervisor,
    stop: StopHandle,
    cycle: u64,
    previous: Option<LineEstimate>,
    manual: VelocityCommand,
    stats: SessionStats,
}

impl FrameCycle {
    pub fn new(config: LineFollowerConfig) -> Self {
        let extractors = LineExtractors::new(config.contour, config.hough);
        let supervisor = FlightSupervisor::new(config.safety);
        Self {
            config,
            extractors,
            supervisor,
            stop: StopHandle::new(),
            cycle: 0,
            previous: None,
            manual: VelocityCommand::HOVER,
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &LineFollowerConfig {
        &self.config
    }

    pub fn supervisor(&self) -> &FlightSupervisor {
        &self.supervisor
    }

    pub fn supervisor_mut(&mut self) -> &mut FlightSupervisor {
        &mut self.supervisor
    }

    /// Handle that stops the loop from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn color(&self) -> LineColor {
        self.config.color
    }

    pub fn set_color(&mut self, color: LineColor) {
        if color != self.config.color {
            info!("line color {} -> {}", self.config.color, color);
            self.config.color = color;
            self.previous = None;
        }
    }

    /// Switch to the next color in the fixed rotation; returns it.
    pub fn cycle_color(&mut self) -> LineColor {
        let next = self.config.color.next();
        self.set_color(next);
        next
    }

    pub fn method(&self) -> ExtractionMethod {
        self.config.method
    }

    /// Switch extraction strategy. Supervisor state is kept.
    pub fn set_method(&mut self, method: ExtractionMethod) {
        if method != self.config.method {
            info!("extraction method {} -> {}", self.config.method, method);
            self.config.method = method;
        }
    }

    pub fn toggle_method(&mut self) -> ExtractionMethod {
        let next = self.config.method.toggled();
        self.set_method(next);
        next
    }

    /// Operator command sent while flying without autonomy.
    pub fn set_manual_command(&mut self, command: VelocityCommand) {
        self.manual = command.clamped(self.config.control.max_speed);
    }

    pub fn manual_command(&self) -> VelocityCommand {
        self.manual
    }

    /// Read the battery once before arming. Refuses below the emergency
    /// threshold and warns below the low threshold.
    pub fn preflight(&mut self, battery: &mut dyn BatterySensor) -> Result<Option<u8>, FlightError> {
        self.supervisor.update_battery(battery.read_percent());
        self.supervisor.check_takeoff_battery()?;
        let percent = self.supervisor.battery_percent();
        match percent {
            Some(p) if p < self.config.safety.low_battery_percent => {
                warn!("battery low before takeoff: {p}%")
            }
            Some(p) => info!("preflight battery {p}%"),
            None => warn!("preflight battery level unknown"),
        }
        Ok(percent)
    }

    /// Land if still flying and log the session totals.
    pub fn shutdown(&mut self, actuator: &mut dyn Actuator) -> Result<(), FlightError> {
        let landed = if self.supervisor.is_flying() {
            self.supervisor.land(actuator)
        } else {
            Ok(())
        };
        let events = self.supervisor.take_events();
        self.stats.record_events(&events);
        let s = &self.stats;
        info!(
            "session: frames={} missing={} detected={} ({:.1}%) sent={} degrades={} emergencies={} actuator_failures={}",
            s.frames_processed,
            s.frames_missing,
            s.lines_detected,
            s.detection_rate() * 100.0,
            s.commands_sent,
            s.autonomous_degrades,
            s.emergencies,
            s.actuator_failures
        );
        landed
    }

    pub fn run_cycle(&mut self, io: &mut CycleIo<'_>) -> CycleOutcome {
        self.run_cycle_at(io, Instant::now())
    }

    /// Run one cycle with `now` as the supervision clock.
    pub fn run_cycle_at(&mut self, io: &mut CycleIo<'_>, now: Instant) -> CycleOutcome {
        if self.stop.take_request() {
            if let Err(err) = self.supervisor.emergency_stop(io.actuator) {
                warn!("emergency stop on request failed: {err}");
            }
            let events = self.supervisor.take_events();
            self.stats.record_events(&events);
            return CycleOutcome::Stopped { events };
        }

        let total_start = Instant::now();
        let Some(frame) = io.frames.acquire() else {
            self.stats.frames_missing += 1;
            debug!("no frame this cycle");
            return CycleOutcome::NoFrame;
        };
        self.cycle += 1;
        let mut timings = TimingBreakdown::default();

        let interval = u64::from(self.config.safety.battery_poll_interval.max(1));
        let battery_polled = (self.cycle - 1) % interval == 0;
        if battery_polled {
            self.supervisor.update_battery(io.battery.read_percent());
        }

        let view = frame.as_view();
        let stage = Instant::now();
        let mask = segment(&view, self.config.color.profile(), &self.config.segmenter);
        timings.push_since("segment", stage);

        let stage = Instant::now();
        let observation = self
            .extractors
            .get(self.config.method)
            .extract(&mask, self.previous.as_ref());
        if let Some(est) = observation.estimate() {
            self.previous = Some(*est);
        }
        timings.push_since("extract", stage);

        let stage = Instant::now();
        if let Err(err) = self
            .supervisor
            .supervise(io.actuator, observation.is_detected(), now)
        {
            warn!("supervision action failed: {err}");
        }
        if self.supervisor.counters().line_lost_streak > self.config.safety.max_line_lost {
            self.previous = None;
        }
        timings.push_since("supervise", stage);

        let stage = Instant::now();
        let state = self.supervisor.state();
        let command = match state {
            FlightState::Flying { autonomous: true } => compute_velocity(
                &observation,
                frame_center(view.w, view.h),
                &self.config.control,
            ),
            FlightState::Flying { autonomous: false } => self.manual,
            FlightState::Grounded | FlightState::Emergency => VelocityCommand::HOVER,
        };
        let sent = if state.is_flying() && self.supervisor.link_healthy() {
            match self.supervisor.send_velocity(io.actuator, &command) {
                Ok(()) => true,
                Err(err) => {
                    warn!("velocity command not delivered: {err}");
                    false
                }
            }
        } else {
            false
        };
        timings.push_since("control", stage);

        let state = self.supervisor.state();
        io.overlay.present(&OverlayFrame {
            frame: view,
            mask: &mask,
            observation: &observation,
            command,
            state,
            color: self.config.color,
            method: self.config.method,
            battery_percent: self.supervisor.battery_percent(),
        });

        timings.total_ms = crate::diagnostics::elapsed_ms(total_start);
        let counters = self.supervisor.counters();
        let report = CycleReport {
            cycle: self.cycle,
            color: self.config.color,
            method: self.config.method,
            frame_width: view.w,
            frame_height: view.h,
            mask_coverage: mask.coverage(),
            observation,
            command,
            sent,
            state,
            battery_percent: counters.battery_percent,
            battery_polled,
            line_lost_streak: counters.line_lost_streak,
            events: self.supervisor.take_events(),
            timings,
        };
        self.stats.record_cycle(&report);
        debug!(
            "cycle {} {} {} detected={} cmd=({}, {}, {}, {}) sent={} state={} total={:.2}ms",
            report.cycle,
            report.color,
            report.method,
            report.observation.is_detected(),
            command.lateral,
            command.forward,
            command.vertical,
            command.yaw,
            sent,
            state,
            report.timings.total_ms
        );
        CycleOutcome::Processed(Box::new(report))
    }
}
