//! Longest straight segment via a progressive probabilistic Hough transform.
//!
//! Purpose
//! - Recover the guide line's true orientation from the mask's edges so the
//!   controller can yaw onto it.
//!
//! Design
//! - Edges come from [`crate::edges::canny`] on the segmentation mask.
//! - Every edge point votes into the `(theta, rho)` bins of its sinusoid.
//! - The strongest bin at or above `threshold` is taken and its line walked
//!   across the image one pixel per step along the dominant axis, accepting
//!   unconsumed edge pixels within one pixel of the line. Hits form runs that
//!   break when more than `max_line_gap` steps pass without a hit.
//! - Runs spanning at least `min_line_length` become segments; their pixels
//!   are consumed and their votes retracted. The peak bin is then cleared and
//!   the next strongest bin is taken, until none reaches `threshold` or
//!   `max_walks` peaks have been walked.
//! - Ties between bins go to the lowest angle, then the lowest rho, so the
//!   same mask always yields the same segments.
//!
//! Complexity
//! - O(E·T) votes for E edge points and T angle bins, plus one accumulator
//!   scan and one O(W + H) walk per peak. Textured masks raise many peaks,
//!   so the walk count is capped to keep the per-frame cost bounded.
use super::segment::LineSegment;
use super::{ExtractionMethod, LineEstimate, LineExtractor, LineObservation};
use crate::edges::{canny, CannyParams};
use crate::image::Mask;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    pub canny_low: f32,
    pub canny_high: f32,
    /// Distance resolution in pixels.
    pub rho: f32,
    /// Angle resolution in degrees.
    pub theta_deg: f32,
    /// Minimum votes for a bin to be walked.
    pub threshold: u32,
    pub min_line_length: f32,
    pub max_line_gap: usize,
    /// Upper bound on peaks walked per frame.
    pub max_walks: usize,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            rho: 1.0,
            theta_deg: 1.0,
            threshold: 50,
            min_line_length: 50.0,
            max_line_gap: 10,
            max_walks: 32,
        }
    }
}

impl HoughParams {
    fn canny(&self) -> CannyParams {
        CannyParams {
            low: self.canny_low,
            high: self.canny_high,
        }
    }
}

struct Accumulator {
    n_rho: usize,
    offset: i64,
    rho: f32,
    trig: Vec<(f32, f32)>,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(w: usize, h: usize, params: &HoughParams) -> Self {
        let rho = params.rho.max(1e-3);
        let theta = params.theta_deg.max(1e-3).to_radians();
        let n_theta = ((PI / theta).round() as usize).max(1);
        let n_rho = ((((w + h) as f32 * 2.0 + 1.0) / rho).round() as usize).max(1);
        let trig = (0..n_theta)
            .map(|t| {
                let a = t as f32 * theta;
                (a.cos(), a.sin())
            })
            .collect();
        Self {
            n_rho,
            offset: (n_rho as i64 - 1) / 2,
            rho,
            trig,
            votes: vec![0; n_theta * n_rho],
        }
    }

    #[inline]
    fn bin(&self, t: usize, x: usize, y: usize) -> usize {
        let (c, s) = self.trig[t];
        let r = ((x as f32 * c + y as f32 * s) / self.rho).round() as i64 + self.offset;
        t * self.n_rho + r.clamp(0, self.n_rho as i64 - 1) as usize
    }

    fn vote(&mut self, x: usize, y: usize) {
        for t in 0..self.trig.len() {
            let b = self.bin(t, x, y);
            self.votes[b] += 1;
        }
    }

    fn retract(&mut self, x: usize, y: usize) {
        for t in 0..self.trig.len() {
            let b = self.bin(t, x, y);
            self.votes[b] = self.votes[b].saturating_sub(1);
        }
    }

    /// Strongest bin, first in index order on ties.
    fn peak(&self) -> (usize, u32) {
        self.votes
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
    }

    /// `(cos, sin, rho)` of the line through the centre of bin `index`.
    fn line(&self, index: usize) -> (f32, f32, f32) {
        let (c, s) = self.trig[index / self.n_rho];
        let r = (index % self.n_rho) as i64 - self.offset;
        (c, s, r as f32 * self.rho)
    }
}

/// Runs of pending pixels along the line `x·c + y·s = rho`.
fn walk_runs(
    pending: &[bool],
    w: usize,
    h: usize,
    (c, s, rho): (f32, f32, f32),
    max_gap: usize,
) -> Vec<Vec<(usize, usize)>> {
    // step along y when the line is closer to vertical
    let steep = s.abs() < c.abs();
    let (major_len, minor_len) = if steep { (h, w) } else { (w, h) };
    let mut runs = Vec::new();
    let mut current: Vec<(usize, usize)> = Vec::new();
    let mut last_major = 0usize;

    for m in 0..major_len {
        let minor = if steep {
            (rho - m as f32 * s) / c
        } else {
            (rho - m as f32 * c) / s
        };
        if !minor.is_finite() {
            continue;
        }
        let base = minor.round() as i64;
        let hit = [0i64, -1, 1]
            .iter()
            .map(|d| base + d)
            .filter(|&v| v >= 0 && v < minor_len as i64)
            .map(|v| if steep { (v as usize, m) } else { (m, v as usize) })
            .find(|&(x, y)| pending[y * w + x]);
        let Some(p) = hit else {
            continue;
        };
        if !current.is_empty() && m - last_major - 1 > max_gap {
            runs.push(std::mem::take(&mut current));
        }
        current.push(p);
        last_major = m;
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

struct HoughRun {
    segments: Vec<LineSegment>,
    walks: usize,
}

/// Run the transform over an edge mask and return every accepted segment.
pub fn hough_segments(edges: &Mask, params: &HoughParams) -> Vec<LineSegment> {
    run_transform(edges, params).segments
}

fn run_transform(edges: &Mask, params: &HoughParams) -> HoughRun {
    let (w, h) = (edges.w, edges.h);
    let mut segments = Vec::new();
    let mut walks = 0usize;
    if w == 0 || h == 0 {
        return HoughRun { segments, walks };
    }
    let mut acc = Accumulator::new(w, h, params);
    let mut pending: Vec<bool> = edges.data.iter().map(|&v| v != 0).collect();
    for y in 0..h {
        for x in 0..w {
            if pending[y * w + x] {
                acc.vote(x, y);
            }
        }
    }

    let threshold = params.threshold.max(1);
    while walks < params.max_walks {
        let (index, votes) = acc.peak();
        if votes < threshold {
            break;
        }
        walks += 1;
        let line = acc.line(index);
        for run in walk_runs(&pending, w, h, line, params.max_line_gap) {
            let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
                continue;
            };
            let seg = LineSegment::new(
                Point2::new(first.0 as f32, first.1 as f32),
                Point2::new(last.0 as f32, last.1 as f32),
            );
            if seg.length() < params.min_line_length {
                continue;
            }
            for &(x, y) in &run {
                pending[y * w + x] = false;
                acc.retract(x, y);
            }
            segments.push(seg.normalized());
        }
        acc.votes[index] = 0;
    }
    if walks == params.max_walks {
        debug!("hough stopped after {walks} walks");
    }
    HoughRun { segments, walks }
}

#[derive(Clone, Debug, Default)]
pub struct HoughExtractor {
    pub params: HoughParams,
}

impl HoughExtractor {
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    /// Canny edges of the mask followed by [`hough_segments`].
    pub fn segments(&self, mask: &Mask) -> Vec<LineSegment> {
        let edges = canny(mask, &self.params.canny());
        hough_segments(&edges, &self.params)
    }
}

impl LineExtractor for HoughExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Hough
    }

    fn extract(&self, mask: &Mask, _previous: Option<&LineEstimate>) -> LineObservation {
        let segments = self.segments(mask);
        let longest = segments.iter().fold(None::<&LineSegment>, |best, s| match best {
            Some(b) if s.length() <= b.length() => Some(b),
            _ => Some(s),
        });
        debug!("hough segments={}", segments.len());

        match longest {
            None => LineObservation::Lost,
            Some(seg) => LineObservation::Detected(LineEstimate {
                center: seg.midpoint(),
                angle_deg: seg.angle_deg(),
                length: seg.length(),
                method: ExtractionMethod::Hough,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_line(w: usize, h: usize, pts: impl IntoIterator<Item = (usize, usize)>) -> Mask {
        let mut m = Mask::new(w, h);
        for (x, y) in pts {
            m.set(x, y, 255);
        }
        m
    }

    #[test]
    fn horizontal_run_is_one_segment() {
        let m = edge_line(200, 100, (20..180).map(|x| (x, 50)));
        let segs = hough_segments(&m, &HoughParams::default());
        assert_eq!(segs.len(), 1);
        let s = segs[0];
        assert_eq!(s.p0, Point2::new(20.0, 50.0));
        assert_eq!(s.p1, Point2::new(179.0, 50.0));
        assert!(s.angle_deg().abs() < 1e-3);
    }

    #[test]
    fn small_gap_is_bridged_large_gap_splits() {
        let params = HoughParams::default();
        let bridged = edge_line(
            300,
            60,
            (10..100).chain(108..200).map(|x| (x, 30)),
        );
        assert_eq!(hough_segments(&bridged, &params).len(), 1);

        let split = edge_line(300, 60, (10..100).chain(140..260).map(|x| (x, 30)));
        let segs = hough_segments(&split, &params);
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn short_runs_are_rejected() {
        let m = edge_line(100, 100, (10..40).map(|x| (x, 20)));
        assert!(hough_segments(&m, &HoughParams::default()).is_empty());
    }

    #[test]
    fn vertical_line_angle_is_ninety() {
        let m = edge_line(100, 200, (30..170).map(|y| (40, y)));
        let segs = hough_segments(&m, &HoughParams::default());
        assert_eq!(segs.len(), 1);
        assert!((segs[0].angle_deg() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn diagonal_line_is_recovered() {
        let m = edge_line(200, 200, (20..180).map(|i| (i, i)));
        let segs = hough_segments(&m, &HoughParams::default());
        assert!(!segs.is_empty());
        let a = segs[0].angle_deg();
        assert!((a - 45.0).abs() < 2.0, "angle {a}");
    }

    #[test]
    fn textured_mask_walk_count_is_capped() {
        // lattice of isolated points: every row, column and many diagonals
        // collect enough votes to become a peak
        let m = edge_line(
            200,
            200,
            (0..200usize)
                .flat_map(|y| (0..200usize).map(move |x| (x, y)))
                .filter(|&(x, y)| (x * 7 + y * 13) % 5 == 0),
        );
        let params = HoughParams {
            threshold: 20,
            max_walks: 16,
            ..Default::default()
        };
        let run = run_transform(&m, &params);
        assert_eq!(run.walks, 16);
        assert!(!run.segments.is_empty());

        let uncapped = run_transform(
            &m,
            &HoughParams {
                max_walks: usize::MAX,
                ..params
            },
        );
        assert!(uncapped.walks > 16, "walks {}", uncapped.walks);
    }

    #[test]
    fn blank_mask_is_lost() {
        let m = Mask::new(64, 48);
        assert_eq!(HoughExtractor::default().extract(&m, None), LineObservation::Lost);
    }

    #[test]
    fn filled_bar_mask_gives_horizontal_estimate() {
        let mut m = Mask::new(400, 200);
        for y in 90..110 {
            for x in 50..350 {
                m.set(x, y, 255);
            }
        }
        let est = HoughExtractor::default()
            .extract(&m, None)
            .estimate()
            .copied()
            .expect("detected");
        assert!(est.angle_deg.abs() < 2.0, "angle {}", est.angle_deg);
        assert!(est.length > 250.0);
        assert!((est.center.x - 200.0).abs() < 10.0);
        assert_eq!(est.method, ExtractionMethod::Hough);
    }
}
