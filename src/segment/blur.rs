//! Separable smoothing of 8-bit masks.
use crate::image::{ImageView, Mask};

/// Normalised 5-tap Gaussian `[1, 4, 6, 4, 1] / 16`.
pub const GAUSSIAN_5TAP: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Convolve `mask` with the odd-length `taps` horizontally then vertically,
/// replicating border pixels. Taps summing to one keep the output in
/// `[0, 255]`.
fn blur_separable(mask: &Mask, taps: &[f32]) -> Mask {
    let (w, h) = (mask.w, mask.h);
    if w == 0 || h == 0 || taps.len() <= 1 {
        return mask.clone();
    }
    let r = (taps.len() / 2) as isize;

    let mut tmp = vec![0.0f32; w * h];
    for y in 0..h {
        let row = mask.row(y);
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let xx = (x as isize + k as isize - r).clamp(0, w as isize - 1) as usize;
                acc += t * row[xx] as f32;
            }
            tmp[y * w + x] = acc;
        }
    }

    let mut out = Mask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, &t) in taps.iter().enumerate() {
                let yy = (y as isize + k as isize - r).clamp(0, h as isize - 1) as usize;
                acc += t * tmp[yy * w + x];
            }
            out.data[y * w + x] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// 5×5 Gaussian smoothing.
pub fn gaussian_blur_5x5(mask: &Mask) -> Mask {
    blur_separable(mask, &GAUSSIAN_5TAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_mask_is_unchanged() {
        let mut m = Mask::new(7, 5);
        m.data.fill(255);
        assert_eq!(gaussian_blur_5x5(&m), m);
    }

    #[test]
    fn blur_spreads_a_point_by_two_pixels() {
        let mut m = Mask::new(9, 9);
        m.set(4, 4, 255);
        let b = gaussian_blur_5x5(&m);
        assert!(b.get(4, 4) > b.get(5, 4));
        assert!(b.get(6, 6) > 0);
        assert_eq!(b.get(7, 4), 0);
        assert_eq!(b.get(4, 1), 0);
    }

    #[test]
    fn zero_mask_stays_zero() {
        let m = Mask::new(4, 4);
        assert!(gaussian_blur_5x5(&m).is_blank());
    }
}
