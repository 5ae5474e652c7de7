//! Color segmentation of camera frames into binary line masks.
//!
//! The segmenter isolates pixels of the active line color:
//!
//! - Each RGB pixel is converted to HSV (see [`crate::color::hsv`]) and tested
//!   against every range of the [`ColorProfile`]; a pixel is foreground when
//!   any range accepts it. For red this unions the two ranges on either side
//!   of the hue origin.
//! - A morphological closing then opening with a small square element fills
//!   pinholes along the line and removes isolated specks.
//! - A 5×5 Gaussian blur softens the mask edges, which keeps the edge detector
//!   used by the Hough extractor from firing on stair-stepped borders.
//!
//! The function is pure: the same frame and profile always give the same mask.
//! An all-black frame yields an all-zero mask for every profile.
//!
//! Complexity: O(W·H·k) for a `k × k` element; thresholding runs row-parallel.

pub mod blur;
pub mod morphology;

use crate::color::{rgb_to_hsv, ColorProfile};
use crate::image::{Mask, RgbImageU8};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tunables for [`segment`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterParams {
    /// Side length of the square structuring element (odd, pixels).
    pub morph_kernel: usize,
    /// Apply the closing/opening pass.
    pub morphology: bool,
    /// Apply the final 5×5 Gaussian blur.
    pub blur: bool,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            morph_kernel: 3,
            morphology: true,
            blur: true,
        }
    }
}

/// Raw color threshold: 255 where `profile` matches, 0 elsewhere.
pub fn threshold_mask(frame: &RgbImageU8, profile: &ColorProfile) -> Mask {
    let mut mask = Mask::new(frame.w, frame.h);
    if frame.is_empty() {
        return mask;
    }
    mask.data
        .par_chunks_mut(frame.w)
        .enumerate()
        .for_each(|(y, out)| {
            for (x, px) in frame.row(y).chunks_exact(3).enumerate() {
                let hsv = rgb_to_hsv([px[0], px[1], px[2]]);
                out[x] = if profile.matches(hsv) { 255 } else { 0 };
            }
        });
    mask
}

/// Segment `frame` into a cleaned mask of pixels matching `profile`.
pub fn segment(frame: &RgbImageU8, profile: &ColorProfile, params: &SegmenterParams) -> Mask {
    let mut mask = threshold_mask(frame, profile);
    let raw = mask.count_nonzero();
    if params.morphology {
        mask = morphology::close(&mask, params.morph_kernel);
        mask = morphology::open(&mask, params.morph_kernel);
    }
    if params.blur {
        mask = blur::gaussian_blur_5x5(&mask);
    }
    debug!(
        "segment color={} w={} h={} raw_px={} cleaned_coverage={:.4}",
        profile.color,
        frame.w,
        frame.h,
        raw,
        mask.coverage()
    );
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LineColor;
    use crate::image::OwnedFrame;

    #[test]
    fn black_frame_gives_blank_mask_for_every_color() {
        let frame = OwnedFrame::filled(32, 24, [0, 0, 0]);
        for color in LineColor::ALL {
            let mask = segment(&frame.as_view(), color.profile(), &SegmenterParams::default());
            assert!(mask.is_blank(), "{color} produced foreground on black");
        }
    }

    #[test]
    fn red_blob_is_isolated_from_green_background() {
        let mut frame = OwnedFrame::filled(64, 48, [0, 160, 0]);
        frame.fill_rect(20, 10, 40, 30, [230, 10, 10]);
        let mask = segment(
            &frame.as_view(),
            LineColor::Red.profile(),
            &SegmenterParams::default(),
        );
        assert_eq!(mask.get(30, 20), 255);
        assert_eq!(mask.get(5, 5), 0);
        assert_eq!(mask.get(60, 40), 0);
    }

    #[test]
    fn red_threshold_unions_both_hue_ends() {
        let mut frame = OwnedFrame::filled(3, 1, [0, 0, 0]);
        frame.set(0, 0, [255, 0, 0]); // hue 0
        frame.set(1, 0, [255, 0, 20]); // hue ~178
        frame.set(2, 0, [0, 200, 200]); // hue 90
        let mask = threshold_mask(&frame.as_view(), LineColor::Red.profile());
        assert_eq!(mask.data, vec![255, 255, 0]);
    }

    #[test]
    fn speckle_is_removed_by_morphology() {
        let mut frame = OwnedFrame::filled(40, 40, [0, 0, 0]);
        frame.set(3, 3, [0, 0, 255]);
        let params = SegmenterParams {
            blur: false,
            ..Default::default()
        };
        let mask = segment(&frame.as_view(), LineColor::Blue.profile(), &params);
        assert!(mask.is_blank());
    }
}
