//! # Interface detection
//!
//! Classifies bins as liquid or vapor by thresholding one field and walks the
//! grid layer by layer to find the outermost liquid bins of every layer.
//!
//! A bin is liquid if its value is at least the cutoff *and* enough other bins
//! within the search radius pass the cutoff too. The neighbor requirement keeps
//! single stray bins of a dense vapor from being taken as part of the droplet.
//!
//! ```
//! use flowfield::{DetectorConfig, GridBuilder, InterfaceDetector};
//!
//! let grid = GridBuilder::new()
//!     .field("X", vec![0., 1., 2., 3., 4.])
//!     .field("Y", vec![0.; 5])
//!     .field("M", vec![0., 1., 1., 1., 0.])
//!     .build()
//!     .unwrap();
//!
//! let config = DetectorConfig::default().with_radius(1.0);
//! let detector = InterfaceDetector::new(&grid, "M", &config).unwrap();
//!
//! let edges: Vec<_> = detector.layers().map(|edge| (edge.left, edge.right)).collect();
//! assert_eq!(edges, vec![(1, 3)]);
//! ```

pub mod angle;
pub mod edges;

use crate::prelude::*;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::iter::FusedIterator;

/// Settings of an [`InterfaceDetector`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// threshold value, defaults to the midpoint of the field's range
    pub cutoff: Option<f64>,
    /// neighbor search radius, defaults to the smallest bin spacing
    pub radius: Option<f64>,
    /// number of neighbors within the radius that must pass the cutoff
    pub min_neighbors: usize,
    /// only scan layers with `y_range.0 <= y <= y_range.1`
    pub y_range: (Option<f64>, Option<f64>),
    pub coords: CoordLabels,
    /// search for the longest connected run of every layer under periodic
    /// boundary conditions along X
    pub periodic: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cutoff: None,
            radius: None,
            min_neighbors: 1,
            y_range: (None, None),
            coords: CoordLabels::default(),
            periodic: false,
        }
    }
}

impl DetectorConfig {
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_min_neighbors(mut self, min_neighbors: usize) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    pub fn with_y_range(mut self, ymin: Option<f64>, ymax: Option<f64>) -> Self {
        self.y_range = (ymin, ymax);
        self
    }

    pub fn with_coords(mut self, coords: CoordLabels) -> Self {
        self.coords = coords;
        self
    }

    pub fn periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }
}

/// Bin indices of the left- and rightmost liquid bins of one layer
///
/// In periodic mode `left` is the start of the run and `right` its end,
/// so `left` can lie at higher X than `right` when the run wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryEdge {
    pub left: usize,
    pub right: usize,
}

impl BoundaryEdge {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }
}

/// Liquid classification of the bins of one grid
#[derive(Debug, Clone)]
pub struct InterfaceDetector<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
    values: &'a [f64],
    /// `None` when the field is uniform and there is no interface
    cutoff: Option<f64>,
    radius: f64,
    min_neighbors: usize,
    y_range: (Option<f64>, Option<f64>),
    /// box width along X in periodic mode
    box_width: Option<f64>,
    /// bins passing the cutoff, sorted by Y
    candidates: Vec<usize>,
}

impl<'a> InterfaceDetector<'a> {
    /// Prepare a detector thresholding the field `label` of `grid`
    ///
    /// Fails if `label` or a coordinate field is missing, or if the periodic
    /// mode is requested for a grid without `shape` and `spacing`.
    pub fn new(grid: &'a Grid, label: &str, config: &DetectorConfig) -> Result<Self> {
        let (xs, ys) = grid.coordinates(&config.coords)?;
        let field = grid.field(label)?;

        let box_width = if config.periodic {
            if grid.info().shape().is_none() {
                return Err(Error::missing_metadata("periodic interface", "shape"));
            }
            let width = grid
                .size()
                .map(|(width, _)| width)
                .ok_or_else(|| Error::missing_metadata("periodic interface", "spacing"))?;
            Some(width)
        } else {
            None
        };

        let cutoff = match config.cutoff {
            Some(cutoff) => Some(cutoff),
            None => match field.min_max() {
                Some((lo, hi)) if lo < hi => Some(0.5 * (lo + hi)),
                _ => {
                    tracing::warn!(
                        label,
                        num_bins = field.len(),
                        "field is uniform: no interface to detect"
                    );
                    None
                }
            },
        };

        let radius = config.radius.unwrap_or_else(|| {
            match (crate::utils::min_gap(xs), crate::utils::min_gap(ys)) {
                (Some(dx), Some(dy)) => dx.min(dy),
                (Some(d), None) | (None, Some(d)) => d,
                (None, None) => 0.,
            }
        });

        let values = field.as_slice();

        let mut candidates: Vec<usize> = match cutoff {
            Some(cutoff) => (0..values.len()).filter(|&i| values[i] >= cutoff).collect(),
            None => Vec::new(),
        };
        candidates.sort_by(|&a, &b| ys[a].total_cmp(&ys[b]));

        tracing::debug!(label, ?cutoff, radius, periodic = config.periodic, "interface detector");

        Ok(Self {
            xs,
            ys,
            values,
            cutoff,
            radius,
            min_neighbors: config.min_neighbors,
            y_range: config.y_range,
            box_width,
            candidates,
        })
    }

    /// The threshold in use, `None` for a uniform field
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether the field had no interface to detect
    pub fn is_degenerate(&self) -> bool {
        self.cutoff.is_none()
    }

    pub fn is_periodic(&self) -> bool {
        self.box_width.is_some()
    }

    fn passes_cutoff(&self, bin: usize) -> bool {
        match self.cutoff {
            Some(cutoff) => self.values[bin] >= cutoff,
            None => false,
        }
    }

    fn dx(&self, from: usize, to: usize) -> f64 {
        let dx = self.xs[to] - self.xs[from];

        match self.box_width {
            Some(width) => dx - width * (dx / width).round(),
            None => dx,
        }
    }

    /// Whether a bin belongs to the liquid body
    pub fn is_liquid(&self, bin: usize) -> bool {
        if bin >= self.values.len() || !self.passes_cutoff(bin) {
            return false;
        }

        if self.min_neighbors == 0 {
            return true;
        }

        let y = self.ys[bin];
        let r2 = self.radius * self.radius;

        // candidates are sorted by Y so only a window of them can be in range
        let ys = self.ys;
        let lo = self
            .candidates
            .partition_point(|&i| ys[i] < y - self.radius);
        let hi = self
            .candidates
            .partition_point(|&i| ys[i] <= y + self.radius);

        let mut count = 0;
        for &other in &self.candidates[lo..hi] {
            if other == bin {
                continue;
            }

            let dx = self.dx(bin, other);
            let dy = self.ys[other] - y;

            if dx * dx + dy * dy <= r2 {
                count += 1;
                if count >= self.min_neighbors {
                    return true;
                }
            }
        }

        false
    }

    fn in_y_range(&self, y: f64) -> bool {
        self.y_range.0.map_or(true, |ymin| y >= ymin) && self.y_range.1.map_or(true, |ymax| y <= ymax)
    }

    /// Outermost liquid bins of one layer, bins sorted by X
    fn scan_layer(&self, layer: &[usize]) -> Option<BoundaryEdge> {
        if self.is_periodic() {
            return self.longest_run(layer);
        }

        let left = layer.iter().copied().find(|&i| self.is_liquid(i))?;
        let right = layer.iter().rev().copied().find(|&i| self.is_liquid(i))?;

        Some(BoundaryEdge::new(left, right))
    }

    /// Longest run of liquid bins on the ring of a layer
    fn longest_run(&self, layer: &[usize]) -> Option<BoundaryEdge> {
        let liquid: Vec<bool> = layer.iter().map(|&i| self.is_liquid(i)).collect();
        let n = liquid.len();

        // runs are closed by a vapor bin, so start walking just after one
        let vapor = match liquid.iter().position(|&is_liquid| !is_liquid) {
            Some(vapor) => vapor,
            None if n > 0 => return Some(BoundaryEdge::new(layer[0], layer[n - 1])),
            None => return None,
        };

        // (start, length) in layer positions
        let mut best: Option<(usize, usize)> = None;
        let mut start = 0;
        let mut length = 0;

        for step in 1..=n {
            let k = (vapor + step) % n;

            if liquid[k] {
                if length == 0 {
                    start = k;
                }
                length += 1;
                continue;
            }

            if length > 0 {
                let longer = match best {
                    None => true,
                    Some((best_start, best_length)) => match length.cmp(&best_length) {
                        Ordering::Greater => true,
                        Ordering::Equal => start < best_start,
                        Ordering::Less => false,
                    },
                };

                if longer {
                    best = Some((start, length));
                }
            }
            length = 0;
        }

        best.map(|(start, length)| BoundaryEdge::new(layer[start], layer[(start + length - 1) % n]))
    }

    /// Walk the layers from the bottom up
    pub fn layers(self) -> InterfaceLayers<'a> {
        let ys = self.ys;
        let xs = self.xs;

        let order = if self.is_degenerate() {
            Vec::new()
        } else {
            let mut order: Vec<usize> = (0..ys.len()).collect();
            order.sort_by(|&a, &b| ys[a].total_cmp(&ys[b]).then(xs[a].total_cmp(&xs[b])));
            order
        };

        InterfaceLayers {
            detector: self,
            order,
            cursor: 0,
        }
    }
}

/// Lazy bottom-to-top sequence of the [`BoundaryEdge`]s of every layer
///
/// Layers without liquid bins are skipped. The sequence can be consumed
/// once; scanning again requires a new [`InterfaceDetector::layers`] call.
#[derive(Debug, Clone)]
pub struct InterfaceLayers<'a> {
    detector: InterfaceDetector<'a>,
    /// bins sorted by (Y, X)
    order: Vec<usize>,
    cursor: usize,
}

impl<'a> InterfaceLayers<'a> {
    /// Whether the field had no interface to detect
    pub fn is_degenerate(&self) -> bool {
        self.detector.is_degenerate()
    }

    pub fn detector(&self) -> &InterfaceDetector<'a> {
        &self.detector
    }
}

impl<'a> Iterator for InterfaceLayers<'a> {
    type Item = BoundaryEdge;

    fn next(&mut self) -> Option<Self::Item> {
        let ys = self.detector.ys;

        while self.cursor < self.order.len() {
            let start = self.cursor;
            let y = ys[self.order[start]];
            let width = self.order[start..]
                .iter()
                .take_while(|&&i| ys[i] == y)
                .count();

            self.cursor = start + width;

            if let Some(ymax) = self.detector.y_range.1 {
                if y > ymax {
                    self.cursor = self.order.len();
                    return None;
                }
            }

            if !self.detector.in_y_range(y) {
                continue;
            }

            if let Some(edge) = self.detector.scan_layer(&self.order[start..self.cursor]) {
                return Some(edge);
            }
        }

        None
    }
}

impl<'a> FusedIterator for InterfaceLayers<'a> {}
