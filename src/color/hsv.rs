//! RGB → HSV conversion in the 8-bit convention used by the thresholds.
//!
//! - Hue is stored in half degrees, range `[0, 180)`.
//! - Saturation and value are scaled to `[0, 255]`.
//!
//! Hue is undefined for greys; it is reported as 0 there, so achromatic
//! pixels are separated from colored ones by saturation alone.

/// Convert one RGB pixel to `[h, s, v]`.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let h_deg = if diff <= 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    let h_deg = if h_deg < 0.0 { h_deg + 360.0 } else { h_deg };

    let mut h = (h_deg * 0.5).round() as u16;
    if h >= 180 {
        h -= 180;
    }

    [h as u8, s.round().min(255.0) as u8, v as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_map_to_expected_hues() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn greys_have_zero_hue_and_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn magenta_leaning_red_lands_near_the_top_of_the_hue_circle() {
        let hsv = rgb_to_hsv([255, 0, 20]);
        assert!(hsv[0] >= 170 && hsv[0] < 180, "hue={}", hsv[0]);
    }

    #[test]
    fn hue_never_reaches_180() {
        // 359.x degrees rounds up to 180 half-degrees and must wrap to 0.
        let hsv = rgb_to_hsv([255, 0, 1]);
        assert!(hsv[0] < 180);
    }
}
