//! # Contact line tracking under periodic boundaries
//!
//! Edge positions found in a periodic system always lie inside the box. When a
//! droplet spreads across the box boundary an edge reappears at the other side
//! and the raw left edge ends up to the right of the raw right edge. The
//! [`PeriodicInfo`] state machine counts how many box widths each edge has
//! wrapped so the unwrapped positions stay continuous in time.
//!
//! The state must be stepped with the snapshots of one series in temporal
//! order. An edge moving more than half the box width between two snapshots
//! is attributed to the wrong boundary.
//!
//! ```
//! use flowfield::ContactLineTracker;
//!
//! let mut tracker = ContactLineTracker::new(9.);
//!
//! // the droplet straddles the boundary from the start
//! let edges = tracker.push(7., 1.);
//! assert_eq!((edges.left, edges.right), (7., 10.));
//! assert_eq!(edges.radius(), 1.5);
//! ```

pub mod layers;

pub use layers::{InterfaceContour, LayerTracker, Recenter, YIndex};

/// Wrapping state of the two contact line edges of one series
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodicInfo {
    /// raw left edge of the previous step
    pub left_prev: Option<f64>,
    /// raw right edge of the previous step
    pub right_prev: Option<f64>,
    /// box widths added to the left edge
    pub multiplier_left: i64,
    /// box widths added to the right edge
    pub multiplier_right: i64,
}

/// +1 for an edge that moved backwards in the box, -1 for forwards
fn wrap_direction(displacement: f64) -> i64 {
    if displacement < 0. {
        1
    } else if displacement > 0. {
        -1
    } else {
        0
    }
}

impl PeriodicInfo {
    /// State at the start of a series
    pub fn init() -> Self {
        Self::default()
    }

    /// Fresh multipliers with known previous edge positions
    pub fn with_positions(left: f64, right: f64) -> Self {
        Self {
            left_prev: Some(left),
            right_prev: Some(right),
            ..Self::default()
        }
    }

    /// Advance the state with the raw edges of the next snapshot
    ///
    /// The edges are crossed when the left edge lies to the right of the right
    /// edge. A crossed first observation means the right edge has already
    /// wrapped. After that, a change of the crossed state is attributed to the
    /// edge that moved the farthest since the previous step (the right edge on
    /// a tie): an edge that moved backwards wrapped forwards through the high
    /// boundary and vice versa.
    pub fn step(&self, _box_width: f64, left: f64, right: f64) -> Self {
        let crossed = left > right;
        let mut next = *self;

        match (self.left_prev, self.right_prev) {
            (Some(left_prev), Some(right_prev)) => {
                let was_crossed = left_prev > right_prev;

                if crossed != was_crossed {
                    let dl = left - left_prev;
                    let dr = right - right_prev;

                    if dl.abs() > dr.abs() {
                        next.multiplier_left += wrap_direction(dl);
                    } else {
                        next.multiplier_right += wrap_direction(dr);
                    }
                }
            }
            _ => {
                if crossed {
                    next.multiplier_right += 1;
                }
            }
        }

        next.left_prev = Some(left);
        next.right_prev = Some(right);

        next
    }

    /// Raw edges shifted by their multiples of the box width
    pub fn unwrap_edges(&self, box_width: f64, left: f64, right: f64) -> (f64, f64) {
        (
            left + self.multiplier_left as f64 * box_width,
            right + self.multiplier_right as f64 * box_width,
        )
    }
}

/// Unwrapped edges of one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnwrappedEdges {
    pub left: f64,
    pub right: f64,
}

impl UnwrappedEdges {
    /// Half the distance between the edges
    pub fn radius(&self) -> f64 {
        0.5 * (self.right - self.left).abs()
    }
}

/// A [`PeriodicInfo`] bound to the box width of its series
#[derive(Debug, Clone, PartialEq)]
pub struct ContactLineTracker {
    box_width: f64,
    state: PeriodicInfo,
}

impl ContactLineTracker {
    pub fn new(box_width: f64) -> Self {
        Self {
            box_width,
            state: PeriodicInfo::init(),
        }
    }

    /// Continue a series from a known state
    pub fn with_state(box_width: f64, state: PeriodicInfo) -> Self {
        Self { box_width, state }
    }

    pub fn box_width(&self) -> f64 {
        self.box_width
    }

    pub fn state(&self) -> &PeriodicInfo {
        &self.state
    }

    /// Step with the raw edges of the next snapshot and unwrap them
    pub fn push(&mut self, left: f64, right: f64) -> UnwrappedEdges {
        self.state = self.state.step(self.box_width, left, right);
        let (left, right) = self.state.unwrap_edges(self.box_width, left, right);

        tracing::trace!(
            left,
            right,
            multiplier_left = self.state.multiplier_left,
            multiplier_right = self.state.multiplier_right,
            "unwrapped contact line"
        );

        UnwrappedEdges { left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multipliers(info: &PeriodicInfo) -> (i64, i64) {
        (info.multiplier_left, info.multiplier_right)
    }

    #[test]
    fn uncrossed_first_step_keeps_the_edges() {
        let info = PeriodicInfo::init().step(10., 2., 5.);
        assert_eq!(info.unwrap_edges(10., 2., 5.), (2., 5.));
        assert_eq!(info, PeriodicInfo::with_positions(2., 5.));
    }

    #[test]
    fn crossed_first_step_wraps_the_right_edge() {
        let info = PeriodicInfo::init().step(10., 5., 3.);
        assert_eq!(multipliers(&info), (0, 1));
    }

    #[test]
    fn edge_that_moved_farthest_wrapped() {
        let info = PeriodicInfo::with_positions(1., 2.);

        assert_eq!(multipliers(&info.step(10., 3., 1.)), (-1, 0));
        assert_eq!(multipliers(&info.step(10., 2., 0.5)), (0, 1));
    }

    #[test]
    fn unchanged_crossing_keeps_multipliers() {
        let info = PeriodicInfo::with_positions(1., 9.);
        assert_eq!(multipliers(&info.step(10., 1.5, 8.5)), (0, 0));
    }
}
