//! Connected foreground regions of a mask.
//!
//! Two-pass labelling with union-find over 8-connected neighbours. The first
//! pass assigns provisional labels and records equivalences; the second folds
//! every pixel into its root region while accumulating first-order moments
//! and the bounding box.
//!
//! Regions are returned in raster order of their first pixel, which is what
//! makes downstream tie-breaking deterministic.
//!
//! Complexity: O(W·H·α(L)) for L provisional labels.
use crate::image::Mask;
use nalgebra::Point2;

/// Pixel statistics of one 8-connected region.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Foreground pixel count (zeroth moment)
    pub area: usize,
    pub sum_x: f64,
    pub sum_y: f64,
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
    /// Raster index (`y * w + x`) of the first pixel met
    pub first_index: usize,
}

impl Region {
    fn seed(x: usize, y: usize, index: usize) -> Self {
        Self {
            area: 0,
            sum_x: 0.0,
            sum_y: 0.0,
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            first_index: index,
        }
    }

    fn add(&mut self, x: usize, y: usize) {
        self.area += 1;
        self.sum_x += x as f64;
        self.sum_y += y as f64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Centroid `(M10 / M00, M01 / M00)`.
    pub fn centroid(&self) -> Point2<f32> {
        let n = self.area.max(1) as f64;
        Point2::new((self.sum_x / n) as f32, (self.sum_y / n) as f32)
    }

    /// Inclusive bounding-box width in pixels.
    pub fn bbox_width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Inclusive bounding-box height in pixels.
    pub fn bbox_height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

fn find_root(parents: &mut [usize], label: usize) -> usize {
    let mut current = label;
    while current != parents[current] {
        parents[current] = parents[parents[current]];
        current = parents[current];
    }
    current
}

fn merge(neighbor: usize, current: &mut usize, parents: &mut [usize]) {
    if neighbor == 0 {
        return;
    }
    if *current == 0 {
        *current = neighbor;
    } else if neighbor != *current {
        union_labels(parents, *current, neighbor);
    }
}

fn union_labels(parents: &mut [usize], a: usize, b: usize) {
    let ra = find_root(parents, a);
    let rb = find_root(parents, b);
    if ra < rb {
        parents[rb] = ra;
    } else if rb < ra {
        parents[ra] = rb;
    }
}

/// Label the non-zero pixels of `mask` into 8-connected regions.
pub fn label_regions(mask: &Mask) -> Vec<Region> {
    let (w, h) = (mask.w, mask.h);
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let mut labels = vec![0usize; w * h];
    // label 0 is background
    let mut parents = vec![0usize];

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if mask.data[i] == 0 {
                continue;
            }
            let mut current = 0usize;
            if x > 0 {
                merge(labels[i - 1], &mut current, &mut parents);
            }
            if y > 0 {
                let up = i - w;
                if x > 0 {
                    merge(labels[up - 1], &mut current, &mut parents);
                }
                merge(labels[up], &mut current, &mut parents);
                if x + 1 < w {
                    merge(labels[up + 1], &mut current, &mut parents);
                }
            }
            if current == 0 {
                current = parents.len();
                parents.push(current);
            }
            labels[i] = current;
        }
    }

    for l in 1..parents.len() {
        find_root(&mut parents, l);
    }

    let mut slot = vec![usize::MAX; parents.len()];
    let mut regions: Vec<Region> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let l = labels[i];
            if l == 0 {
                continue;
            }
            let root = parents[l];
            if slot[root] == usize::MAX {
                slot[root] = regions.len();
                regions.push(Region::seed(x, y, i));
            }
            regions[slot[root]].add(x, y);
        }
    }
    regions
}
