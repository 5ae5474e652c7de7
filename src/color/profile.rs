use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Guide-line colors the segmenter knows thresholds for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineColor {
    #[default]
    White,
    Red,
    Green,
    Yellow,
    Blue,
}

impl LineColor {
    /// Selection order, also used by [`LineColor::next`].
    pub const ALL: [LineColor; 5] = [
        LineColor::White,
        LineColor::Red,
        LineColor::Green,
        LineColor::Yellow,
        LineColor::Blue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LineColor::White => "white",
            LineColor::Red => "red",
            LineColor::Green => "green",
            LineColor::Yellow => "yellow",
            LineColor::Blue => "blue",
        }
    }

    /// The next color in selection order, wrapping after the last one.
    pub fn next(self) -> LineColor {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn profile(self) -> &'static ColorProfile {
        ColorProfile::for_color(self)
    }
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
                format!("Unknown line color '{s}', expected one of {}", names.join(", "))
            })
    }
}

/// Inclusive HSV box, `[h, s, v]` with hue in half degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    #[inline]
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

/// Threshold ranges for one line color.
///
/// Red straddles the hue origin and is the only profile carrying two ranges;
/// a pixel matches when it falls inside any of them.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ColorProfile {
    pub color: LineColor,
    pub ranges: &'static [HsvRange],
}

const WHITE_RANGES: [HsvRange; 1] = [HsvRange::new([0, 0, 200], [180, 30, 255])];
const RED_RANGES: [HsvRange; 2] = [
    HsvRange::new([0, 120, 70], [10, 255, 255]),
    HsvRange::new([170, 120, 70], [180, 255, 255]),
];
const GREEN_RANGES: [HsvRange; 1] = [HsvRange::new([40, 120, 70], [80, 255, 255])];
const YELLOW_RANGES: [HsvRange; 1] = [HsvRange::new([20, 120, 70], [40, 255, 255])];
const BLUE_RANGES: [HsvRange; 1] = [HsvRange::new([100, 120, 70], [130, 255, 255])];

static PROFILES: [ColorProfile; 5] = [
    ColorProfile {
        color: LineColor::White,
        ranges: &WHITE_RANGES,
    },
    ColorProfile {
        color: LineColor::Red,
        ranges: &RED_RANGES,
    },
    ColorProfile {
        color: LineColor::Green,
        ranges: &GREEN_RANGES,
    },
    ColorProfile {
        color: LineColor::Yellow,
        ranges: &YELLOW_RANGES,
    },
    ColorProfile {
        color: LineColor::Blue,
        ranges: &BLUE_RANGES,
    },
];

impl ColorProfile {
    pub fn for_color(color: LineColor) -> &'static ColorProfile {
        match color {
            LineColor::White => &PROFILES[0],
            LineColor::Red => &PROFILES[1],
            LineColor::Green => &PROFILES[2],
            LineColor::Yellow => &PROFILES[3],
            LineColor::Blue => &PROFILES[4],
        }
    }

    pub fn all() -> &'static [ColorProfile] {
        &PROFILES
    }

    #[inline]
    pub fn matches(&self, hsv: [u8; 3]) -> bool {
        self.ranges.iter().any(|r| r.contains(hsv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb_to_hsv;

    #[test]
    fn only_red_has_two_ranges() {
        for profile in ColorProfile::all() {
            let expected = if profile.color == LineColor::Red { 2 } else { 1 };
            assert_eq!(
                profile.ranges.len(),
                expected,
                "unexpected range count for {}",
                profile.color
            );
        }
    }

    #[test]
    fn red_accepts_both_ends_of_the_hue_circle() {
        let red = LineColor::Red.profile();
        assert!(red.matches([0, 200, 200]));
        assert!(red.matches([179, 200, 200]));
        assert!(!red.matches([90, 200, 200]));
    }

    #[test]
    fn red_profile_on_rgb_pixels() {
        let red = LineColor::Red.profile();
        assert!(red.matches(rgb_to_hsv([255, 0, 0])));
        assert!(red.matches(rgb_to_hsv([255, 0, 20])));
        assert!(!red.matches(rgb_to_hsv([0, 200, 200])));
        assert!(!red.matches(rgb_to_hsv([0, 0, 0])));
    }

    #[test]
    fn white_requires_low_saturation_and_high_value() {
        let white = LineColor::White.profile();
        assert!(white.matches(rgb_to_hsv([250, 250, 250])));
        assert!(!white.matches(rgb_to_hsv([120, 120, 120])));
        assert!(!white.matches(rgb_to_hsv([255, 0, 0])));
    }

    #[test]
    fn profile_lookup_matches_color() {
        for color in LineColor::ALL {
            assert_eq!(color.profile().color, color);
        }
    }

    #[test]
    fn next_cycles_through_all_colors() {
        let mut color = LineColor::White;
        let mut seen = Vec::new();
        for _ in 0..LineColor::ALL.len() {
            seen.push(color);
            color = color.next();
        }
        assert_eq!(color, LineColor::White);
        assert_eq!(seen, LineColor::ALL.to_vec());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Yellow".parse::<LineColor>(), Ok(LineColor::Yellow));
        assert!("purple".parse::<LineColor>().is_err());
    }
}
