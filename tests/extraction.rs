mod common;

use common::synthetic_frame::{
    bar_frame, blob_frame, floor_frame, BLUE, CAMERA_H, CAMERA_W, GREEN, RED, RED_WRAPPED, WHITE,
    YELLOW,
};
use line_follower::control::{compute_velocity, frame_center, ControlParams};
use line_follower::extract::{LineExtractors, LineObservation};
use line_follower::image::OwnedFrame;
use line_follower::segment::{segment, SegmenterParams};
use line_follower::{ExtractionMethod, LineColor, VelocityCommand};

fn observe(frame: &OwnedFrame, color: LineColor, method: ExtractionMethod) -> LineObservation {
    let mask = segment(&frame.as_view(), color.profile(), &SegmenterParams::default());
    LineExtractors::default().get(method).extract(&mask, None)
}

#[test]
fn each_color_is_only_seen_by_its_own_profile() {
    let _ = env_logger::builder().is_test(true).try_init();
    let samples = [
        (LineColor::White, WHITE),
        (LineColor::Red, RED),
        (LineColor::Green, GREEN),
        (LineColor::Yellow, YELLOW),
        (LineColor::Blue, BLUE),
    ];
    for (painted, rgb) in samples {
        let frame = blob_frame(480, 360, 60, rgb);
        for color in LineColor::ALL {
            let detected = observe(&frame, color, ExtractionMethod::Contour).is_detected();
            assert_eq!(
                detected,
                color == painted,
                "{painted} line seen through the {color} profile: {detected}"
            );
        }
    }
}

#[test]
fn red_line_across_the_hue_wrap_is_detected() {
    let frame = blob_frame(300, 200, 60, RED_WRAPPED);
    let obs = observe(&frame, LineColor::Red, ExtractionMethod::Contour);
    let est = obs.estimate().copied().expect("red detected");
    assert!((est.center.x - 299.5).abs() < 1.0);
    assert!(!observe(&frame, LineColor::Blue, ExtractionMethod::Contour).is_detected());
}

#[test]
fn empty_floor_is_lost_for_both_methods() {
    let frame = floor_frame(CAMERA_W, CAMERA_H);
    for method in ExtractionMethod::ALL {
        assert_eq!(observe(&frame, LineColor::White, method), LineObservation::Lost);
    }
}

#[test]
fn small_patch_is_treated_as_noise() {
    // 16 × 16 before smoothing, still under the minimum area afterwards
    let frame = blob_frame(480, 360, 16, WHITE);
    assert!(!observe(&frame, LineColor::White, ExtractionMethod::Contour).is_detected());
}

#[test]
fn vertical_line_under_hough_turns_instead_of_advancing() {
    let frame = bar_frame(CAMERA_W, CAMERA_H, (460, 100, 500, 620), WHITE);
    let obs = observe(&frame, LineColor::White, ExtractionMethod::Hough);
    let est = obs.estimate().copied().expect("line detected");
    assert!((est.angle_deg - 90.0).abs() < 1.0, "angle {}", est.angle_deg);
    assert!(est.length > 450.0);

    let cmd = compute_velocity(&obs, frame_center(CAMERA_W, CAMERA_H), &ControlParams::default());
    assert_eq!(cmd, VelocityCommand::new(0, 0, 0, 50));
}

#[test]
fn contour_angle_reflects_box_aspect() {
    let wide = bar_frame(CAMERA_W, CAMERA_H, (200, 340, 760, 380), WHITE);
    let est = observe(&wide, LineColor::White, ExtractionMethod::Contour)
        .estimate()
        .copied()
        .expect("detected");
    // 564 × 44 after the blur halo
    let expected = 44f32.atan2(564.0).to_degrees();
    assert!((est.angle_deg - expected).abs() < 0.5, "angle {}", est.angle_deg);

    // box aspect is not a heading, so no yaw and full forward
    let obs = LineObservation::Detected(est);
    let cmd = compute_velocity(&obs, frame_center(CAMERA_W, CAMERA_H), &ControlParams::default());
    assert_eq!(cmd, VelocityCommand::new(0, 40, 0, 0));
}
