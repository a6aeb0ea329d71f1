//! # Spreading of a droplet over a substrate
//!
//! A [`SpreadingSeries`] follows the contact line of one droplet through the
//! snapshots of a time series. The first snapshot in which the droplet is
//! found on the floor marks the impact. From then on every snapshot with
//! an interface at the floor gives one [`SpreadingSample`].
//!
//! ```
//! use flowfield::{GridBuilder, GridInfo, SpreadingConfig, SpreadingSeries};
//!
//! let snapshot = |mass: Vec<f64>| {
//!     GridBuilder::new()
//!         .field("X", vec![0., 1., 2., 3., 4.])
//!         .field("Y", vec![0.; 5])
//!         .field("M", mass)
//!         .build()
//!         .unwrap()
//! };
//!
//! let mut series = SpreadingSeries::new("M", SpreadingConfig::default().with_dt(0.5));
//!
//! assert!(series.push(&snapshot(vec![0.; 5])).unwrap().is_none());
//! let sample = series.push(&snapshot(vec![0., 1., 1., 0., 0.])).unwrap().unwrap();
//! assert_eq!((sample.time, sample.radius), (0., 0.5));
//!
//! let sample = series.push(&snapshot(vec![1., 1., 1., 1., 0.])).unwrap().unwrap();
//! assert_eq!((sample.time, sample.radius), (0.5, 1.5));
//!
//! assert_eq!(series.impact(), Some((1, 0.5)));
//! ```

use crate::interface::edges::spreading_edges;
use crate::interface::DetectorConfig;
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// Settings of a [`SpreadingSeries`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadingConfig {
    /// time between two snapshots
    pub dt: f64,
    /// height of the substrate, defaults to the bottom of the droplet
    pub floor: Option<f64>,
    /// unwrap the edges across the periodic boundary along X
    pub periodic: bool,
    pub detector: DetectorConfig,
}

impl Default for SpreadingConfig {
    fn default() -> Self {
        Self {
            dt: 1.,
            floor: None,
            periodic: false,
            detector: DetectorConfig::default(),
        }
    }
}

impl SpreadingConfig {
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn periodic(mut self, periodic: bool) -> Self {
        self.periodic = periodic;
        self
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }
}

/// Spreading radius at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadingSample {
    /// time since impact
    pub time: f64,
    pub radius: f64,
    /// left edge, unwrapped in a periodic series
    pub left: f64,
    /// right edge, unwrapped in a periodic series
    pub right: f64,
}

/// State of one spreading time series
#[derive(Debug, Clone)]
pub struct SpreadingSeries {
    label: String,
    config: SpreadingConfig,
    /// number of snapshots seen so far
    index: usize,
    impact: Option<usize>,
    time: f64,
    tracker: Option<ContactLineTracker>,
}

impl SpreadingSeries {
    /// A periodic series always searches the longest connected run of the
    /// floor layer.
    pub fn new(label: impl Into<String>, mut config: SpreadingConfig) -> Self {
        if config.periodic {
            config.detector.periodic = true;
        }

        Self {
            label: label.into(),
            config,
            index: 0,
            impact: None,
            time: 0.,
            tracker: None,
        }
    }

    /// Snapshot index and time of the impact, once it has happened
    pub fn impact(&self) -> Option<(usize, f64)> {
        self.impact
            .map(|index| (index, index as f64 * self.config.dt))
    }

    /// Measure the next snapshot of the series
    ///
    /// Returns `None` for a snapshot without an interface at the floor.
    pub fn push(&mut self, grid: &Grid) -> Result<Option<SpreadingSample>> {
        let index = self.index;
        self.index += 1;

        let (left, right) =
            match spreading_edges(grid, &self.label, &self.config.detector, self.config.floor)? {
                Some(edges) => edges,
                None => return Ok(None),
            };

        let (left, right, radius) = if self.config.periodic {
            let box_width = grid
                .size()
                .map(|(width, _)| width)
                .ok_or_else(|| Error::missing_metadata("periodic spreading", "shape"))?;

            let tracker = self
                .tracker
                .get_or_insert_with(|| ContactLineTracker::new(box_width));
            let edges = tracker.push(left, right);

            (edges.left, edges.right, edges.radius())
        } else {
            (left, right, 0.5 * (right - left))
        };

        if self.impact.is_none() {
            tracing::debug!(index, "droplet impact");
            self.impact = Some(index);
        }

        let sample = SpreadingSample {
            time: self.time,
            radius,
            left,
            right,
        };
        self.time += self.config.dt;

        Ok(Some(sample))
    }
}
