//! Edge processing for the Hough extractor: mask gradients and Canny edges.
//!
//! - [`grad`]: Sobel gradients with magnitude, border clamped.
//! - [`canny`]: non-maximum suppression plus hysteresis, producing a binary
//!   edge mask.

pub mod canny;
pub mod grad;

pub use canny::{canny, CannyParams};
pub use grad::{sobel_gradients, Grad};
