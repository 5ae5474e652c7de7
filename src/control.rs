//! Deadband proportional-sign controller.
//!
//! Maps a [`LineObservation`] to a four-channel velocity command:
//!
//! - lateral and vertical follow the sign of the center error once it leaves
//!   the `center_tolerance` deadband (image y grows downward, so a line below
//!   the frame center commands a descent);
//! - forward is constant for heading-less estimates and gated on the line
//!   running roughly along the image x axis for heading-bearing ones;
//! - yaw is only commanded for heading-bearing estimates past
//!   `rotation_threshold_deg`.
//!
//! A lost line gives the zero (hover) command. Every channel is clamped to
//! `±max_speed`.
use crate::extract::LineObservation;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlParams {
    /// Deadband half-width in pixels; errors with `|e| <= tolerance` give 0.
    pub center_tolerance: f32,
    pub forward_speed: i32,
    pub side_speed: i32,
    pub vertical_speed: i32,
    pub rotation_speed: i32,
    pub rotation_threshold_deg: f32,
    pub max_speed: i32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            center_tolerance: 50.0,
            forward_speed: 40,
            side_speed: 30,
            vertical_speed: 30,
            rotation_speed: 50,
            rotation_threshold_deg: 20.0,
            max_speed: 100,
        }
    }
}

/// Velocity setpoint in actuator units (percent of full speed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityCommand {
    /// Positive to the right.
    pub lateral: i32,
    pub forward: i32,
    /// Positive upward.
    pub vertical: i32,
    /// Positive clockwise.
    pub yaw: i32,
}

impl VelocityCommand {
    pub const HOVER: VelocityCommand = VelocityCommand {
        lateral: 0,
        forward: 0,
        vertical: 0,
        yaw: 0,
    };

    pub fn new(lateral: i32, forward: i32, vertical: i32, yaw: i32) -> Self {
        Self {
            lateral,
            forward,
            vertical,
            yaw,
        }
    }

    pub fn is_hover(&self) -> bool {
        *self == Self::HOVER
    }

    /// Clamp every channel to `±limit`.
    pub fn clamped(self, limit: i32) -> Self {
        let limit = limit.saturating_abs();
        let c = |v: i32| v.clamp(-limit, limit);
        Self::new(c(self.lateral), c(self.forward), c(self.vertical), c(self.yaw))
    }
}

/// Center of a `width × height` frame using integer halves.
pub fn frame_center(width: usize, height: usize) -> Point2<f32> {
    Point2::new((width / 2) as f32, (height / 2) as f32)
}

fn deadband(error: f32, tolerance: f32, speed: i32) -> i32 {
    if error.abs() <= tolerance {
        0
    } else if error > 0.0 {
        speed
    } else {
        -speed
    }
}

/// Velocity command steering the line toward `frame_center`.
pub fn compute_velocity(
    observation: &LineObservation,
    frame_center: Point2<f32>,
    params: &ControlParams,
) -> VelocityCommand {
    let Some(est) = observation.estimate() else {
        return VelocityCommand::HOVER;
    };
    let error = est.center - frame_center;
    let lateral = deadband(error.x, params.center_tolerance, params.side_speed);
    // image y points down: line below center means descend
    let vertical = -deadband(error.y, params.center_tolerance, params.vertical_speed);

    let (forward, yaw) = if est.method.uses_orientation() {
        let a = est.angle_deg;
        let along_x = a.abs() < 45.0 || a.abs() > 135.0;
        let forward = if along_x { params.forward_speed } else { 0 };
        let yaw = if a.abs() > params.rotation_threshold_deg {
            if a > 0.0 {
                params.rotation_speed
            } else {
                -params.rotation_speed
            }
        } else {
            0
        };
        (forward, yaw)
    } else {
        (params.forward_speed, 0)
    };

    VelocityCommand::new(lateral, forward, vertical, yaw).clamped(params.max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ExtractionMethod, LineEstimate};

    fn obs(x: f32, y: f32, angle: f32, method: ExtractionMethod) -> LineObservation {
        LineObservation::Detected(LineEstimate {
            center: Point2::new(x, y),
            angle_deg: angle,
            length: 100.0,
            method,
        })
    }

    fn center() -> Point2<f32> {
        frame_center(960, 720)
    }

    #[test]
    fn lost_line_hovers() {
        let cmd = compute_velocity(&LineObservation::Lost, center(), &ControlParams::default());
        assert!(cmd.is_hover());
    }

    #[test]
    fn centered_contour_goes_straight() {
        let cmd = compute_velocity(
            &obs(480.0, 360.0, 30.0, ExtractionMethod::Contour),
            center(),
            &ControlParams::default(),
        );
        assert_eq!(cmd, VelocityCommand::new(0, 40, 0, 0));
    }

    #[test]
    fn deadband_boundary_is_inclusive() {
        let p = ControlParams::default();
        let at = compute_velocity(&obs(530.0, 360.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(at.lateral, 0);
        let past = compute_velocity(&obs(531.0, 360.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(past.lateral, 30);
        let left = compute_velocity(&obs(429.0, 360.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(left.lateral, -30);
    }

    #[test]
    fn offset_line_commands_side_speed() {
        let cmd = compute_velocity(
            &obs(560.0, 360.0, 0.0, ExtractionMethod::Contour),
            center(),
            &ControlParams::default(),
        );
        assert_eq!(cmd, VelocityCommand::new(30, 40, 0, 0));
    }

    #[test]
    fn vertical_channel_follows_image_y_down() {
        let p = ControlParams::default();
        let below = compute_velocity(&obs(480.0, 500.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(below.vertical, -30);
        let above = compute_velocity(&obs(480.0, 200.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(above.vertical, 30);
    }

    #[test]
    fn hough_heading_gates_forward_and_yaw() {
        let p = ControlParams::default();
        let steep = compute_velocity(&obs(480.0, 360.0, 90.0, ExtractionMethod::Hough), center(), &p);
        assert_eq!(steep, VelocityCommand::new(0, 0, 0, 50));
        let shallow = compute_velocity(&obs(480.0, 360.0, -30.0, ExtractionMethod::Hough), center(), &p);
        assert_eq!(shallow, VelocityCommand::new(0, 40, 0, -50));
        let small = compute_velocity(&obs(480.0, 360.0, 20.0, ExtractionMethod::Hough), center(), &p);
        assert_eq!(small, VelocityCommand::new(0, 40, 0, 0));
    }

    #[test]
    fn channels_are_clamped() {
        let p = ControlParams {
            forward_speed: 250,
            side_speed: -300,
            max_speed: 100,
            ..Default::default()
        };
        let cmd = compute_velocity(&obs(900.0, 360.0, 0.0, ExtractionMethod::Contour), center(), &p);
        assert_eq!(cmd.forward, 100);
        assert_eq!(cmd.lateral, -100);
    }

    #[test]
    fn clamp_accepts_most_negative_limit() {
        let cmd = VelocityCommand::new(i32::MIN, i32::MAX, -5, 5).clamped(i32::MIN);
        assert_eq!(cmd, VelocityCommand::new(-i32::MAX, i32::MAX, -5, 5));
        let cmd = VelocityCommand::new(-80, 80, 0, 0).clamped(-50);
        assert_eq!(cmd, VelocityCommand::new(-50, 50, 0, 0));
    }
}
