//! Unwrapping every layer of a periodic interface through a series
//!
//! Each layer height carries its own [`PeriodicInfo`]. The interface of later
//! snapshots can span other heights than earlier ones, so the states are kept
//! on an evenly spaced [`YIndex`] and moved over to the new index of every
//! snapshot. Heights new to the series below or above the known layers start
//! from the state of the nearest known layer further in. A gap between known
//! layers, which only appears when the layer heights are unevenly spaced,
//! starts fresh from the current edges.

use super::PeriodicInfo;
use crate::combine::weighted_mean;
use crate::interface::{DetectorConfig, InterfaceDetector};
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// Evenly spaced layer heights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YIndex {
    pub ymin: f64,
    pub ymax: f64,
    pub dy: f64,
    pub num: usize,
}

impl YIndex {
    /// Index the layer heights of an interface, lowest first
    ///
    /// `dy` is the smallest distance between heights, 0 for a single layer.
    pub fn from_heights(ys: &[f64]) -> Option<Self> {
        let ymin = ys.iter().copied().reduce(f64::min)?;
        let ymax = ys.iter().copied().reduce(f64::max)?;

        Some(Self {
            ymin,
            ymax,
            dy: crate::utils::min_gap(ys).unwrap_or(0.),
            num: ys.len(),
        })
    }

    /// Index of the layer at `y`, clipped to the first and last layer
    pub fn index_of(&self, y: f64) -> usize {
        if self.dy == 0. {
            return 0;
        }

        let y = y.clamp(self.ymin, self.ymax);
        let index = ((y - self.ymin) / self.dy + 1e-6).floor() as usize;

        index.min(self.num - 1)
    }

    fn same_layout(&self, other: &YIndex) -> bool {
        is_close(self.ymin, other.ymin)
            && is_close(self.ymax, other.ymax)
            && is_close(self.dy, other.dy)
            && self.num == other.num
    }
}

/// Move per-layer values from one indexing onto another
///
/// Layers of `to` without a counterpart in `from` are `None`.
pub(crate) fn transfer<T: Clone>(values: &[T], from: &YIndex, to: &YIndex) -> Result<Vec<Option<T>>> {
    if from.same_layout(to) {
        return Ok(values.iter().cloned().map(Some).collect());
    }

    if from.dy != 0. && to.dy != 0. && !is_close(from.dy, to.dy) {
        return Err(error::LayerSpacing::new(from.dy, to.dy).into());
    }

    let mut out = vec![None; to.num];

    let (imin, imax) = (to.index_of(from.ymin), to.index_of(from.ymax));
    let jmin = from.index_of(to.ymin);

    for (slot, value) in out[imin..=imax].iter_mut().zip(values.iter().skip(jmin)) {
        *slot = Some(value.clone());
    }

    Ok(out)
}

/// Replace unknown states at the bottom and top with the nearest known one
///
/// With no known state at all every layer starts a fresh series. Gaps between
/// known states stay unknown.
pub(crate) fn fill_missing(states: Vec<Option<PeriodicInfo>>) -> Vec<Option<PeriodicInfo>> {
    let known: Vec<usize> = states
        .iter()
        .enumerate()
        .filter_map(|(i, state)| state.map(|_| i))
        .collect();

    let (first, last) = match (known.first(), known.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return vec![Some(PeriodicInfo::init()); states.len()],
    };
    let (bottom, top) = (states[first], states[last]);

    states
        .into_iter()
        .enumerate()
        .map(|(i, state)| match i {
            i if i < first => bottom,
            i if i > last => top,
            _ => state,
        })
        .collect()
}

/// Horizontal shift applied to the interface contour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recenter {
    /// center the bottom layer around zero
    Zero,
    /// center the field's center of mass along X around zero
    #[serde(alias = "com")]
    CenterOfMass,
}

/// Closed outline of an interface
///
/// The left edges run from the bottom to the top, followed by the right edges
/// from the top back down. Heights are relative to the bottom layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceContour {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl InterfaceContour {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Area enclosed by the contour
    ///
    /// Integrated with trapezoids between successive layers. Fails when the
    /// contour has an odd number of points or the heights of its left and
    /// right halves do not pair up.
    pub fn area(&self) -> Result<f64> {
        let n = self.len() / 2;

        if self.len() % 2 != 0 || self.ys.len() != self.len() {
            return Err(error::InvalidContour::new(format!(
                "{} x and {} y values do not split into two halves",
                self.xs.len(),
                self.ys.len()
            ))
            .into());
        }

        let (left_ys, right_ys) = self.ys.split_at(n);
        let (left_xs, right_xs) = self.xs.split_at(n);

        if !left_ys.iter().zip(right_ys.iter().rev()).all(|(&a, &b)| is_close(a, b)) {
            return Err(error::InvalidContour::new(
                "left and right edges are at different heights".to_string(),
            )
            .into());
        }

        let widths: Vec<f64> = left_xs
            .iter()
            .zip(right_xs.iter().rev())
            .map(|(left, right)| right - left)
            .collect();

        let area = left_ys
            .windows(2)
            .zip(widths.windows(2))
            .map(|(y, width)| (y[1] - y[0]) * 0.5 * (width[0] + width[1]))
            .sum();

        Ok(area)
    }

    /// Length of the contour from its first point to its last
    pub fn length(&self) -> f64 {
        self.xs
            .windows(2)
            .zip(self.ys.windows(2))
            .map(|(x, y)| (x[1] - x[0]).hypot(y[1] - y[0]))
            .sum()
    }
}

/// Tracks the periodic interface of a series of snapshots layer by layer
#[derive(Debug, Clone)]
pub struct LayerTracker {
    label: String,
    config: DetectorConfig,
    recenter: Option<Recenter>,
    layers: Option<(YIndex, Vec<PeriodicInfo>)>,
}

impl LayerTracker {
    /// Track the interface of the field `label`
    ///
    /// The interface is always searched in periodic mode.
    pub fn new(label: impl Into<String>, config: DetectorConfig) -> Self {
        Self {
            label: label.into(),
            config: config.periodic(true),
            recenter: None,
            layers: None,
        }
    }

    pub fn with_recenter(mut self, recenter: Recenter) -> Self {
        self.recenter = Some(recenter);
        self
    }

    /// Layer indexing and states after the latest snapshot
    pub fn layers(&self) -> Option<(&YIndex, &[PeriodicInfo])> {
        self.layers
            .as_ref()
            .map(|(index, states)| (index, states.as_slice()))
    }

    /// Unwrap the interface of the next snapshot
    ///
    /// A snapshot without an interface gives an empty contour and leaves the
    /// layer states as they were.
    pub fn push(&mut self, grid: &Grid) -> Result<InterfaceContour> {
        let coords = &self.config.coords;
        let (xs, ys) = grid.coordinates(coords)?;

        let box_width = grid
            .size()
            .map(|(width, _)| width)
            .ok_or_else(|| Error::missing_metadata("layer tracking", "shape"))?;

        let edges: Vec<_> = InterfaceDetector::new(grid, &self.label, &self.config)?
            .layers()
            .collect();

        let heights: Vec<f64> = edges.iter().map(|edge| ys[edge.left]).collect();

        let index = match YIndex::from_heights(&heights) {
            Some(index) => index,
            None => return Ok(InterfaceContour::default()),
        };

        let states = match &self.layers {
            Some((previous, states)) => transfer(states, previous, &index)?,
            None => vec![None; index.num],
        };

        let states: Vec<PeriodicInfo> = fill_missing(states)
            .iter()
            .zip(&edges)
            .map(|(state, edge)| {
                let (left, right) = (xs[edge.left], xs[edge.right]);
                match state {
                    Some(state) => state.step(box_width, left, right),
                    None => PeriodicInfo::with_positions(left, right),
                }
            })
            .collect();

        let (lefts, rights): (Vec<f64>, Vec<f64>) = states
            .iter()
            .zip(&edges)
            .map(|(state, edge)| state.unwrap_edges(box_width, xs[edge.left], xs[edge.right]))
            .unzip();

        let mut contour = InterfaceContour {
            xs: lefts.iter().chain(rights.iter().rev()).copied().collect(),
            ys: heights.iter().chain(heights.iter().rev()).copied().collect(),
        };

        let y0 = heights[0];
        contour.ys.iter_mut().for_each(|y| *y -= y0);

        let shift = match self.recenter {
            None => 0.,
            Some(Recenter::Zero) => 0.5 * (lefts[0] + rights[0]),
            Some(Recenter::CenterOfMass) => {
                let weights = grid.values(&self.label)?;
                let total: f64 = weights.iter().sum();
                let moment: f64 = xs.iter().zip(weights).map(|(x, w)| x * w).sum();
                weighted_mean(moment, total)
            }
        };
        contour.xs.iter_mut().for_each(|x| *x -= shift);

        tracing::debug!(num_layers = index.num, box_width, "tracked interface layers");

        self.layers = Some((index, states));

        Ok(contour)
    }
}
