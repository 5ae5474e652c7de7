//! Binary/grey morphology with a square structuring element.
//!
//! Erosion and dilation are computed separably (row pass, then column pass),
//! which is exact for a square element. Pixels outside the image never take
//! part in the min/max, so borders neither erode nor grow the foreground.
use crate::image::{ImageView, Mask};

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

impl Op {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Op::Erode => a.min(b),
            Op::Dilate => a.max(b),
        }
    }
}

fn apply(mask: &Mask, size: usize, op: Op) -> Mask {
    let (w, h) = (mask.w, mask.h);
    if w == 0 || h == 0 || size <= 1 {
        return mask.clone();
    }
    let r = size / 2;

    let mut tmp = Mask::new(w, h);
    for y in 0..h {
        let row = mask.row(y);
        let out = &mut tmp.data[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            let mut acc = row[lo];
            for &v in &row[lo + 1..=hi] {
                acc = op.pick(acc, v);
            }
            out[x] = acc;
        }
    }

    let mut out = Mask::new(w, h);
    for y in 0..h {
        let lo = y.saturating_sub(r);
        let hi = (y + r).min(h - 1);
        for x in 0..w {
            let mut acc = tmp.data[lo * w + x];
            for yy in lo + 1..=hi {
                acc = op.pick(acc, tmp.data[yy * w + x]);
            }
            out.data[y * w + x] = acc;
        }
    }
    out
}

pub fn erode(mask: &Mask, size: usize) -> Mask {
    apply(mask, size, Op::Erode)
}

pub fn dilate(mask: &Mask, size: usize) -> Mask {
    apply(mask, size, Op::Dilate)
}

/// Dilation followed by erosion: fills gaps narrower than the element.
pub fn close(mask: &Mask, size: usize) -> Mask {
    erode(&dilate(mask, size), size)
}

/// Erosion followed by dilation: removes specks smaller than the element.
pub fn open(mask: &Mask, size: usize) -> Mask {
    dilate(&erode(mask, size), size)
}
