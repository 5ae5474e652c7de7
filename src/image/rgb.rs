//! Interleaved 8-bit RGB frames.
//!
//! [`RgbImageU8`] is the borrowed view handed to the segmenter for one cycle;
//! [`OwnedFrame`] is what a frame source produces. The cycle borrows the owned
//! frame for its duration and drops it afterwards, so nothing downstream can
//! retain pixels across cycles.

/// Borrowed RGB8 frame with row stride in bytes.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows (>= 3 * w)
    pub data: &'a [u8],
}

impl<'a> RgbImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + x * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Packed `[r, g, b, r, g, b, ...]` bytes of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * 3]
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Owned, tightly packed RGB8 frame.
#[derive(Clone, Debug)]
pub struct OwnedFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl OwnedFrame {
    /// Wrap raw interleaved RGB bytes; returns `None` when the buffer length
    /// does not match `width * height * 3`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 3).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Frame filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Paint the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the frame.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, rgb: [u8; 3]) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                self.set(x, y, rgb);
            }
        }
    }

    pub fn as_view(&self) -> RgbImageU8<'_> {
        RgbImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width * 3,
            data: &self.data,
        }
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_mismatched_length() {
        assert!(OwnedFrame::from_raw(4, 4, vec![0; 47]).is_none());
        assert!(OwnedFrame::from_raw(4, 4, vec![0; 48]).is_some());
    }

    #[test]
    fn fill_rect_is_clipped_and_visible_through_view() {
        let mut frame = OwnedFrame::filled(8, 6, [0, 0, 0]);
        frame.fill_rect(6, 4, 20, 20, [10, 20, 30]);
        let view = frame.as_view();
        assert_eq!(view.get(7, 5), [10, 20, 30]);
        assert_eq!(view.get(5, 5), [0, 0, 0]);
        assert_eq!(view.row(5).len(), 8 * 3);
    }
}
