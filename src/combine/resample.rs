//! Block re-binning of regular grids onto coarser or finer bins

use super::{weight_of, weighted_mean};
use crate::prelude::*;

use ndarray::s;

/// shape and spacing of a grid that must be regular
fn regular_layout(grid: &Grid, operation: &'static str) -> Result<((usize, usize), (f64, f64))> {
    let info = grid.info();
    let shape = info
        .shape()
        .ok_or_else(|| Error::missing_metadata(operation, "shape"))?;
    let spacing = info
        .spacing()
        .ok_or_else(|| Error::missing_metadata(operation, "spacing"))?;

    let (nx, ny) = shape;
    if grid.len() != nx * ny {
        return Err(error::SizeMismatch::new("shape".to_string(), nx * ny, grid.len()).into());
    }

    Ok((shape, spacing))
}

/// Values of one field as an `(ny, nx)` array, rows of constant Y
fn to_rows(field: &Field, order: &[usize], (nx, ny): (usize, usize)) -> Result<Array2<f64>> {
    let values = field.as_slice();

    Array2::from_shape_vec((ny, nx), order.iter().map(|&i| values[i]).collect())
        .map_err(|_| error::SizeMismatch::new("shape".to_string(), nx * ny, order.len()).into())
}

/// Regular coordinates, X varying fastest
fn regular_coordinates(
    origin: (f64, f64),
    spacing: (f64, f64),
    (nx, ny): (usize, usize),
) -> (Array1<f64>, Array1<f64>) {
    let xs = (0..nx * ny)
        .map(|k| origin.0 + (k % nx) as f64 * spacing.0)
        .collect();
    let ys = (0..nx * ny)
        .map(|k| origin.1 + (k / nx) as f64 * spacing.1)
        .collect();

    (xs, ys)
}

/// Combine blocks of `factor.0` by `factor.1` bins into single bins
///
/// Blocks start at the bin with the lowest coordinates. Fields named in
/// `weights` as `(field, weight)` take the weighted mean of their block, all
/// other fields are summed. Bins that do not fill a whole block at the high
/// side of either axis are dropped.
///
/// The new bins are placed at the center of their blocks.
pub fn downsample(
    grid: &Grid,
    factor: (usize, usize),
    weights: &[(&str, &str)],
    coords: &CoordLabels,
) -> Result<Grid> {
    coords.check()?;
    let (shape, spacing) = regular_layout(grid, "downsample")?;
    let (nx, ny) = shape;
    let (fx, fy) = factor;

    if fx == 0 || fy == 0 || fx > nx || fy > ny {
        return Err(error::InvalidFactor::new(shape, factor).into());
    }

    let order = grid.row_major_order(coords)?;
    let (xs, ys) = grid.coordinates(coords)?;
    let lowest = |values: &[f64]| values.iter().copied().fold(f64::INFINITY, f64::min);

    let new_shape = (nx / fx, ny / fy);
    let new_spacing = (spacing.0 * fx as f64, spacing.1 * fy as f64);
    let new_origin = (
        lowest(xs) + 0.5 * (new_spacing.0 - spacing.0),
        lowest(ys) + 0.5 * (new_spacing.1 - spacing.1),
    );

    let block_sums = |values: &Array2<f64>| -> Array1<f64> {
        let (mx, my) = new_shape;
        (0..mx * my)
            .map(|k| {
                let (i, j) = (k % mx, k / mx);
                values
                    .slice(s![j * fy..(j + 1) * fy, i * fx..(i + 1) * fx])
                    .sum()
            })
            .collect()
    };

    let (new_xs, new_ys) = regular_coordinates(new_origin, new_spacing, new_shape);
    let mut fields = IndexMap::new();

    for (label, field) in grid.fields() {
        let values = if label == coords.x {
            new_xs.clone()
        } else if label == coords.y {
            new_ys.clone()
        } else {
            match weight_of(label, weights) {
                Some(weight) => {
                    let w = to_rows(grid.field(weight)?, &order, shape)?;
                    let fw = to_rows(field, &order, shape)? * &w;

                    let mut out = block_sums(&fw);
                    let total = block_sums(&w);
                    out.zip_mut_with(&total, |num, &den| *num = weighted_mean(*num, den));
                    out
                }
                None => block_sums(&to_rows(field, &order, shape)?),
            }
        };

        fields.insert(label.to_string(), field.with_values(values));
    }

    let mut info = GridInfo::default();
    info.set_shape(Some(new_shape))?;
    info.set_origin(Some(new_origin))?;
    info.set_spacing(Some(new_spacing))?;
    info.set_num_bins(Some(new_shape.0 * new_shape.1));

    tracing::debug!(?shape, ?factor, ?new_shape, "downsampled grid");

    Grid::from_parts(fields, info)
}

/// Sum of every `(2 * half_width + 1)`-wide square window, clipped at the edges
fn window_sums(values: &Array2<f64>, half_width: usize) -> Array2<f64> {
    let (rows, cols) = values.dim();

    Array2::from_shape_fn((rows, cols), |(j, i)| {
        let (j0, j1) = (j.saturating_sub(half_width), (j + half_width).min(rows - 1));
        let (i0, i1) = (i.saturating_sub(half_width), (i + half_width).min(cols - 1));
        values.slice(s![j0..=j1, i0..=i1]).sum()
    })
}

/// Refine every bin into `factor` by `factor` smaller bins
///
/// Each coarse value is spread over its fine bins and then smoothed with a
/// square window reaching `factor - 1` fine bins to each side. Fields named
/// in `weights` take the weighted mean over the window, all others the plain
/// mean. `None` or a factor of 1 returns an equivalent grid.
pub fn supersample(
    grid: &Grid,
    factor: Option<usize>,
    weights: &[(&str, &str)],
    coords: &CoordLabels,
) -> Result<Grid> {
    let factor = match factor {
        None | Some(1) => return Ok(grid.clone()),
        Some(factor) => factor,
    };

    coords.check()?;
    let (shape, spacing) = regular_layout(grid, "supersample")?;
    if factor == 0 {
        return Err(error::InvalidFactor::new(shape, (0, 0)).into());
    }

    let order = grid.row_major_order(coords)?;
    let (xs, ys) = grid.coordinates(coords)?;

    let origin = match grid.info().origin() {
        Some(origin) => origin,
        None => (
            xs.iter().copied().fold(f64::INFINITY, f64::min),
            ys.iter().copied().fold(f64::INFINITY, f64::min),
        ),
    };

    let new_shape = (shape.0 * factor, shape.1 * factor);
    let new_spacing = (spacing.0 / factor as f64, spacing.1 / factor as f64);
    let half_width = factor - 1;

    let refine = |field: &Field| -> Result<Array2<f64>> {
        let coarse = to_rows(field, &order, shape)?;
        Ok(Array2::from_shape_fn((new_shape.1, new_shape.0), |(j, i)| {
            coarse[[j / factor, i / factor]]
        }))
    };

    let flatten = |values: Array2<f64>| -> Array1<f64> { values.iter().copied().collect() };

    let counts = window_sums(&Array2::ones((new_shape.1, new_shape.0)), half_width);
    let (new_xs, new_ys) = regular_coordinates(origin, new_spacing, new_shape);
    let mut fields = IndexMap::new();

    for (label, field) in grid.fields() {
        let values = if label == coords.x {
            new_xs.clone()
        } else if label == coords.y {
            new_ys.clone()
        } else {
            match weight_of(label, weights) {
                Some(weight) => {
                    let w = refine(grid.field(weight)?)?;
                    let mut out = window_sums(&(refine(field)? * &w), half_width);
                    out.zip_mut_with(&window_sums(&w, half_width), |num, &den| {
                        *num = weighted_mean(*num, den)
                    });
                    flatten(out)
                }
                None => flatten(window_sums(&refine(field)?, half_width) / &counts),
            }
        };

        fields.insert(label.to_string(), field.with_values(values));
    }

    let mut info = *grid.info();
    info.set_shape(Some(new_shape))?;
    info.set_spacing(Some(new_spacing))?;
    info.set_num_bins(Some(new_shape.0 * new_shape.1));

    tracing::debug!(?shape, factor, ?new_shape, "supersampled grid");

    Grid::from_parts(fields, info)
}
