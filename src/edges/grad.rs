//! Sobel gradients of masks with magnitude.
//!
//! - Convolves the 3×3 Sobel pair (`X` and `Y`) with border clamping.
//! - Works directly on 8-bit masks, so magnitudes are in raw intensity units
//!   (a sharp 0→255 step gives a Sobel magnitude of 1020).
//! - Outputs per-pixel `gx`, `gy`, `mag = sqrt(gx^2+gy^2)` as flat row-major
//!   buffers sharing the mask's width.
//!
//! Complexity: O(W·H) per pass.
use crate::image::{ImageView, Mask};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient buffers.
#[derive(Clone, Debug, Default)]
pub struct Grad {
    pub w: usize,
    pub h: usize,
    /// Horizontal derivative (convolution with kernel X)
    pub gx: Vec<f32>,
    /// Vertical derivative (convolution with kernel Y)
    pub gy: Vec<f32>,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: Vec<f32>,
}

/// Sobel gradients of an 8-bit mask.
pub fn sobel_gradients(mask: &Mask) -> Grad {
    let w = mask.w;
    let h = mask.h;
    let n = w * h;
    let mut grad = Grad {
        w,
        h,
        gx: vec![0.0; n],
        gy: vec![0.0; n],
        mag: vec![0.0; n],
    };
    if w == 0 || h == 0 {
        return grad;
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [mask.row(y_idx[0]), mask.row(y_idx[1]), mask.row(y_idx[2])];
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                for k in 0..3 {
                    let v = row[x_idx[k]] as f32;
                    sum_x += v * kx_row[k];
                    sum_y += v * ky_row[k];
                }
            }

            let idx = y * w + x;
            grad.gx[idx] = sum_x;
            grad.gy[idx] = sum_y;
            grad.mag[idx] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    grad
}
