//! Color handling for line segmentation.
//!
//! - [`hsv`]: 8-bit RGB → HSV conversion (hue in half degrees).
//! - [`profile`]: the process-wide, read-only table mapping each
//!   [`LineColor`] to its HSV threshold range(s).

pub mod hsv;
pub mod profile;

pub use hsv::rgb_to_hsv;
pub use profile::{ColorProfile, HsvRange, LineColor};
