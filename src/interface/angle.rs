//! Dynamic contact angles from the interface of a droplet

use super::{DetectorConfig, InterfaceDetector};
use crate::prelude::*;

/// Left and right contact angles of a droplet, in degrees
///
/// The angles are measured between the floor layer and the uppermost
/// interface layer at most `height` above it. The floor layer is the bottom
/// interface layer, or the layer closest to `floor` when that is given; in
/// the latter case `None` is returned if that layer holds no liquid.
///
/// Returns `None` when no layer within `height` of the floor is found.
pub fn contact_angle(
    grid: &Grid,
    label: &str,
    config: &DetectorConfig,
    height: f64,
    floor: Option<f64>,
) -> Result<Option<(f64, f64)>> {
    let (xs, ys) = grid.coordinates(&config.coords)?;

    let floor_y = match floor {
        Some(floor) => match closest(ys, floor) {
            Some(y) => Some(y),
            None => return Ok(None),
        },
        None => None,
    };

    let mut config = config.clone();
    if floor_y.is_some() {
        config.y_range.0 = floor_y;
    }

    let mut layers = InterfaceDetector::new(grid, label, &config)?.layers();

    let bottom = match layers.next() {
        Some(edge) => edge,
        None => return Ok(None),
    };

    let y0 = ys[bottom.left];
    if let Some(floor_y) = floor_y {
        if y0 != floor_y {
            tracing::debug!(floor_y, y0, "no interface at the floor layer");
            return Ok(None);
        }
    }

    let (xl0, xr0) = (xs[bottom.left], xs[bottom.right]);
    let mut angles = None;

    for edge in layers {
        let dy = ys[edge.left] - y0;
        if dy > height {
            break;
        }

        let left = dy.atan2(xs[edge.left] - xl0).to_degrees();
        let right = dy.atan2(-(xs[edge.right] - xr0)).to_degrees();
        angles = Some((left, right));
    }

    Ok(angles)
}

fn closest(values: &[f64], target: f64) -> Option<f64> {
    values
        .iter()
        .copied()
        .min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
}
