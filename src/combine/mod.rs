//! # Combining grids
//!
//! Grids sampled from the same system can be merged onto one common grid and
//! averaged bin by bin. All coordinate matching uses an absolute tolerance
//! of `1e-4`.
//!
//! ```
//! use flowfield::{average, CoordLabels, GridBuilder};
//!
//! let grid = |m: f64, u: f64| {
//!     GridBuilder::new()
//!         .field("X", vec![0., 1.])
//!         .field("Y", vec![0., 0.])
//!         .field("M", vec![m, m])
//!         .field("U", vec![u, u])
//!         .build()
//!         .unwrap()
//! };
//!
//! let grids = [grid(1., 1.), grid(5., 2.)];
//! let avg = average(&grids, &[("U", "M")], &CoordLabels::default()).unwrap();
//!
//! assert_eq!(avg.values("M").unwrap(), &[3., 3.]);
//! assert_eq!(avg.values("U").unwrap(), &[11. / 6., 11. / 6.]);
//! ```

pub mod resample;

use crate::prelude::*;
use crate::utils::bins_spanning;

use ndarray::Zip;

/// Weighting of the flow fields used by the simple data format:
/// flow by mass and temperature by number density
pub const SIMPLE_WEIGHTS: [(&str, &str); 3] = [("U", "M"), ("V", "M"), ("T", "N")];

/// `numerator / denominator`, or 0 where the denominator is 0
pub(crate) fn weighted_mean(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0. {
        0.
    } else {
        numerator / denominator
    }
}

/// the weight label of a weighted field
pub(crate) fn weight_of<'w>(label: &str, weights: &[(&str, &'w str)]) -> Option<&'w str> {
    weights
        .iter()
        .find(|(field, _)| *field == label)
        .map(|(_, weight)| *weight)
}

fn coordinate_extent(grids: &[Grid], coords: &CoordLabels) -> Result<Option<[f64; 4]>> {
    let mut extent: Option<[f64; 4]> = None;

    for grid in grids {
        let (xs, ys) = coords.of(grid)?;

        for (&x, &y) in xs.iter().zip(ys) {
            extent = Some(match extent {
                None => [x, x, y, y],
                Some([x0, x1, y0, y1]) => [x0.min(x), x1.max(x), y0.min(y), y1.max(y)],
            });
        }
    }

    Ok(extent)
}

/// The smallest regular grid with spacing `bin_size` that covers every input
///
/// Every grid with a set spacing must agree with `bin_size`. Bins are laid out
/// row by row with X varying fastest. The grid carries the union of the
/// inputs' fields, zero filled, with the coordinate fields first.
pub fn build_union_grid(grids: &[Grid], bin_size: (f64, f64), coords: &CoordLabels) -> Result<Grid> {
    coords.check()?;

    if grids.is_empty() {
        return Err(error::NoGrids::new("build_union_grid").into());
    }

    for grid in grids {
        if let Some(spacing) = grid.info().spacing() {
            if !(is_close(spacing.0, bin_size.0) && is_close(spacing.1, bin_size.1)) {
                return Err(error::SpacingMismatch::new(bin_size, spacing).into());
            }
        }
    }

    let mut info = GridInfo::default();
    info.set_spacing(Some(bin_size))?;

    let (xs, ys) = match coordinate_extent(grids, coords)? {
        Some([xmin, xmax, ymin, ymax]) => {
            let nx = bins_spanning(xmin, xmax, bin_size.0);
            let ny = bins_spanning(ymin, ymax, bin_size.1);

            info.set_shape(Some((nx, ny)))?;
            info.set_origin(Some((xmin, ymin)))?;

            let xs = (0..ny)
                .flat_map(|_| (0..nx).map(move |i| xmin + i as f64 * bin_size.0))
                .collect::<Array1<f64>>();
            let ys = (0..ny)
                .flat_map(|j| std::iter::repeat(ymin + j as f64 * bin_size.1).take(nx))
                .collect::<Array1<f64>>();

            (xs, ys)
        }
        None => (Array1::zeros(0), Array1::zeros(0)),
    };

    let num_bins = xs.len();
    info.set_num_bins(Some(num_bins));

    let first = &grids[0];
    let mut fields = IndexMap::new();
    fields.insert(coords.x.clone(), first.field(&coords.x)?.with_values(xs));
    fields.insert(coords.y.clone(), first.field(&coords.y)?.with_values(ys));

    for grid in grids {
        for (label, field) in grid.fields() {
            if !fields.contains_key(label) {
                fields.insert(label.to_string(), Field::zeros(num_bins, field.precision()));
            }
        }
    }

    tracing::debug!(
        num_grids = grids.len(),
        shape = ?info.shape(),
        num_fields = fields.len(),
        "built union grid"
    );

    Grid::from_parts(fields, info)
}

/// [`build_union_grid`] with the bin size taken from the first grid
pub fn union_grid(grids: &[Grid], coords: &CoordLabels) -> Result<Grid> {
    let first = grids
        .first()
        .ok_or_else(|| Error::from(error::NoGrids::new("union_grid")))?;

    let bin_size = first
        .info()
        .spacing()
        .ok_or_else(|| Error::missing_metadata("union_grid", "spacing"))?;

    build_union_grid(grids, bin_size, coords)
}

/// Bins of `grid` sorted by X for searching coordinates within the tolerance
struct CoordinateIndex<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
    by_x: Vec<usize>,
}

impl<'a> CoordinateIndex<'a> {
    fn new(grid: &'a Grid, coords: &CoordLabels) -> Result<Self> {
        let (xs, ys) = coords.of(grid)?;
        let mut by_x: Vec<usize> = (0..xs.len()).collect();
        by_x.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));

        Ok(Self { xs, ys, by_x })
    }

    /// every bin within the tolerance of `(x, y)`
    fn matches(&self, x: f64, y: f64) -> impl Iterator<Item = usize> + '_ {
        let xs = self.xs;
        let ys = self.ys;
        let lo = self.by_x.partition_point(|&i| xs[i] < x - COORD_TOLERANCE);
        let hi = self.by_x.partition_point(|&i| xs[i] <= x + COORD_TOLERANCE);

        self.by_x[lo..hi]
            .iter()
            .copied()
            .filter(move |&i| is_close(ys[i], y))
    }
}

/// Write the data of `source` into the matching bins of `union`
///
/// Every field present in both grids is overwritten at the bins of `source`.
/// Fails if two source bins share a coordinate, if a coordinate matches more
/// than one bin of `union`, or if it matches none.
pub fn project(union: &Grid, source: &Grid, coords: &CoordLabels) -> Result<Grid> {
    coords.check()?;

    let (xs, ys) = coords.of(source)?;
    let source_index = CoordinateIndex::new(source, coords)?;
    let union_index = CoordinateIndex::new(union, coords)?;

    let mut targets = Vec::with_capacity(source.len());

    for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        if source_index.matches(x, y).any(|other| other != i) {
            return Err(error::DuplicateCoordinate::new(x, y).into());
        }

        let mut found = union_index.matches(x, y);
        let target = found.next().ok_or_else(|| {
            Error::from(error::CoordinateMismatch::new(format!(
                "no bin at ({x}, {y}) in the union grid"
            )))
        })?;

        if found.next().is_some() {
            return Err(error::DuplicateCoordinate::new(x, y).into());
        }

        targets.push(target);
    }

    let mut fields = IndexMap::new();

    for (label, field) in union.fields() {
        let field = match source.field(label) {
            Ok(values) if !coords.contains(label) => {
                let mut out = field.values().to_owned();
                for (&target, &value) in targets.iter().zip(values.as_slice()) {
                    out[target] = value;
                }
                field.with_values(out)
            }
            _ => field.clone(),
        };

        fields.insert(label.to_string(), field);
    }

    Grid::from_parts(fields, *union.info())
}

fn check_coordinates(reference: &Grid, grid: &Grid, coords: &CoordLabels) -> Result<()> {
    let (x0, y0) = coords.of(reference)?;
    let (x1, y1) = coords.of(grid)?;

    if x0.len() != x1.len() {
        return Err(error::CoordinateMismatch::new(format!(
            "grids have {} and {} bins",
            x0.len(),
            x1.len()
        ))
        .into());
    }

    let matching = x0.iter().zip(x1).all(|(&a, &b)| is_close(a, b))
        && y0.iter().zip(y1).all(|(&a, &b)| is_close(a, b));

    if matching {
        Ok(())
    } else {
        Err(error::CoordinateMismatch::new("bin coordinates of the grids differ".to_string()).into())
    }
}

/// Bin-wise average of grids with identical coordinates
///
/// Fields named in `weights` as `(field, weight)` are averaged with the
/// weight, `sum(field * weight) / sum(weight)` or 0 where the weights sum to
/// 0. All other fields get the arithmetic mean. Coordinates and metadata are
/// taken from the first grid.
pub fn average(grids: &[Grid], weights: &[(&str, &str)], coords: &CoordLabels) -> Result<Grid> {
    coords.check()?;

    let first = match grids {
        [] => return Ok(Grid::empty()),
        [single] => return Ok(single.clone()),
        [first, ..] => first,
    };

    for grid in &grids[1..] {
        check_coordinates(first, grid, coords)?;
    }

    for (field, weight) in weights {
        for grid in grids {
            grid.field(field)?;
            grid.field(weight)?;
        }
    }

    let n = first.len();
    let mut fields = IndexMap::new();

    for (label, field) in first.fields() {
        if coords.contains(label) {
            fields.insert(label.to_string(), field.clone());
            continue;
        }

        let values = match weight_of(label, weights) {
            Some(weight) => {
                let mut numerator = Array1::<f64>::zeros(n);
                let mut denominator = Array1::<f64>::zeros(n);

                for grid in grids {
                    let f = grid.field(label)?.values();
                    let w = grid.field(weight)?.values();
                    numerator += &(&f * &w);
                    denominator += &w;
                }

                Zip::from(&mut numerator)
                    .and(&denominator)
                    .for_each(|num, &den| *num = weighted_mean(*num, den));

                numerator
            }
            None => {
                let mut total = Array1::<f64>::zeros(n);
                for grid in grids {
                    total += &grid.field(label)?.values();
                }
                total / grids.len() as f64
            }
        };

        fields.insert(label.to_string(), field.with_values(values));
    }

    tracing::debug!(num_grids = grids.len(), num_bins = n, "averaged grids");

    Grid::from_parts(fields, *first.info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn points(xs: Vec<f64>, ys: Vec<f64>, label: &str, values: Vec<f64>) -> Grid {
        GridBuilder::new()
            .field("X", xs)
            .field("Y", ys)
            .field(label, values)
            .info(GridInfo::default().with_spacing(1., 1.).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn weight_lookup() {
        assert_eq!(weight_of("T", &SIMPLE_WEIGHTS), Some("N"));
        assert_eq!(weight_of("M", &SIMPLE_WEIGHTS), None);
    }

    #[test]
    fn union_covers_all_inputs() {
        let coords = CoordLabels::default();
        let a = points(vec![0., 1.], vec![0., 0.], "M", vec![1., 2.]);
        let b = points(vec![2.], vec![1.], "T", vec![3.]);

        let union = build_union_grid(&[a, b], (1., 1.), &coords).unwrap();

        assert_eq!(union.info().shape(), Some((3, 2)));
        assert_eq!(union.info().origin(), Some((0., 0.)));
        assert_eq!(union.values("X").unwrap(), &[0., 1., 2., 0., 1., 2.]);
        assert_eq!(union.values("Y").unwrap(), &[0., 0., 0., 1., 1., 1.]);
        assert_eq!(union.labels().collect::<Vec<_>>(), vec!["X", "Y", "M", "T"]);
        assert_eq!(union.values("T").unwrap(), &[0.; 6]);
    }

    #[test]
    fn union_of_nothing_fails() {
        let err = union_grid(&[], &CoordLabels::default()).unwrap_err();
        assert!(matches!(err, Error::NoGrids(_)));
    }

    #[test]
    fn duplicate_source_coordinates_are_ambiguous() {
        let coords = CoordLabels::default();
        let source = points(vec![0., 0.], vec![0., 0.00001], "M", vec![1., 2.]);
        let union = build_union_grid(&[source.clone()], (1., 1.), &coords).unwrap();

        let err = project(&union, &source, &coords).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMapping);
    }

    #[test]
    fn projection_needs_matching_bins() {
        let coords = CoordLabels::default();
        let source = points(vec![0.5], vec![0.], "M", vec![1.]);
        let union = points(vec![0., 1.], vec![0., 0.], "M", vec![0., 0.]);

        let err = project(&union, &source, &coords).unwrap_err();
        assert!(matches!(err, Error::CoordinateMismatch(_)));
    }
}
