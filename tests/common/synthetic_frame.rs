use line_follower::image::OwnedFrame;

pub const FLOOR: [u8; 3] = [60, 60, 60];
pub const WHITE: [u8; 3] = [240, 240, 240];
pub const RED: [u8; 3] = [220, 30, 30];
/// Red just below the hue wrap (~177 on the half-degree scale).
pub const RED_WRAPPED: [u8; 3] = [220, 20, 40];
pub const GREEN: [u8; 3] = [30, 200, 30];
pub const YELLOW: [u8; 3] = [220, 220, 30];
pub const BLUE: [u8; 3] = [30, 30, 220];

pub const CAMERA_W: usize = 960;
pub const CAMERA_H: usize = 720;

/// Uniform floor-colored frame.
pub fn floor_frame(width: usize, height: usize) -> OwnedFrame {
    assert!(width > 0 && height > 0, "frame dimensions must be positive");
    OwnedFrame::filled(width, height, FLOOR)
}

/// Floor with one filled rectangle `[x0, x1) × [y0, y1)`.
pub fn bar_frame(
    width: usize,
    height: usize,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    rgb: [u8; 3],
) -> OwnedFrame {
    let mut frame = floor_frame(width, height);
    frame.fill_rect(x0, y0, x1, y1, rgb);
    frame
}

/// Camera-sized floor with a square blob of side `side` centred on `(cx, cy)`.
pub fn blob_frame(cx: usize, cy: usize, side: usize, rgb: [u8; 3]) -> OwnedFrame {
    let half = side / 2;
    bar_frame(
        CAMERA_W,
        CAMERA_H,
        (cx - half, cy - half, cx - half + side, cy - half + side),
        rgb,
    )
}
