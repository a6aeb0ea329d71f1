//! Contact line edges at the floor of a droplet

use super::{BoundaryEdge, DetectorConfig, InterfaceDetector};
use crate::prelude::*;

/// X positions of the left and right edges of the spreading layer
///
/// The spreading layer is the bottom interface layer, or when `floor` is
/// given the lowest layer of the grid at or above it. A floor that lies
/// exactly on a layer selects that layer, independent of the bin size.
/// Returns `None` when that layer has no interface.
pub fn spreading_edges(
    grid: &Grid,
    label: &str,
    config: &DetectorConfig,
    floor: Option<f64>,
) -> Result<Option<(f64, f64)>> {
    let (xs, ys) = grid.coordinates(&config.coords)?;

    let mut config = config.clone();
    if let Some(floor) = floor {
        let floor_y = match unique_sorted(ys).into_iter().find(|&y| y >= floor) {
            Some(y) => y,
            None => return Ok(None),
        };
        config.y_range = (Some(floor_y), Some(floor_y));
    }

    let edges = InterfaceDetector::new(grid, label, &config)?
        .layers()
        .next()
        .map(|edge| (xs[edge.left], xs[edge.right]));

    Ok(edges)
}

/// Bins of the left and right contact line regions
///
/// Takes the interface layers up to `size.1` above the bottom layer. The left
/// region spans from the left edges to `size.0` inwards (towards +X) of the
/// bottom left edge, the right region likewise towards -X, both bounded in Y
/// by the first and last of the layers. Returns two grids without bins if
/// there is no interface.
pub fn contact_line_cells(
    grid: &Grid,
    label: &str,
    config: &DetectorConfig,
    size: (f64, f64),
) -> Result<(Grid, Grid)> {
    let (xs, ys) = grid.coordinates(&config.coords)?;
    let mut layers = InterfaceDetector::new(grid, label, config)?.layers();

    let bottom = match layers.next() {
        Some(edge) => edge,
        None => return Ok((grid.take(&[]), grid.take(&[]))),
    };

    let ymax = ys[bottom.left] + size.1;
    let mut edges = vec![bottom];
    edges.extend(layers.take_while(|edge| ys[edge.left] <= ymax));

    let cells_towards = |edge_bin: fn(&BoundaryEdge) -> usize, direction: f64| {
        let bins: Vec<usize> = edges.iter().map(edge_bin).collect();

        let x_inner = xs[bins[0]] + size.0 * direction;
        let (x_lo, x_hi) = bins
            .iter()
            .map(|&i| xs[i])
            .fold((x_inner, x_inner), |(lo, hi), x| (lo.min(x), hi.max(x)));
        let (y_lo, y_hi) = (ys[bins[0]], ys[bins[bins.len() - 1]]);

        let inside: Vec<usize> = (0..grid.len())
            .filter(|&i| xs[i] >= x_lo && xs[i] <= x_hi && ys[i] >= y_lo && ys[i] <= y_hi)
            .collect();

        grid.take(&inside)
    };

    let left = cells_towards(|edge| edge.left, 1.);
    let right = cells_towards(|edge| edge.right, -1.);

    Ok((left, right))
}
