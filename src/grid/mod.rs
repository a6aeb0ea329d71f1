//! # Grids
//!
//! A [`Grid`] holds the binned data of one snapshot: any number of labelled
//! per-bin [`Field`]s of equal length plus the [`GridInfo`] metadata that
//! describes the regular bin layout, if there is one.
//!
//! Coordinates are fields like any other. Operations that need them take a
//! [`CoordLabels`](crate::CoordLabels) naming the two coordinate fields.
//!
//! Grids are never modified in place. Every operation that changes bins or
//! values returns a new grid, so a grid can be shared freely between readers.
//!
//! ```
//! use flowfield::{GridBuilder, GridInfo};
//!
//! let info = GridInfo::default().with_shape(3, 1).unwrap().with_spacing(1., 1.).unwrap();
//!
//! let grid = GridBuilder::new()
//!     .field("X", vec![0., 1., 2.])
//!     .field("Y", vec![0., 0., 0.])
//!     .field("M", vec![0.5f32, 2.0, 1.0])
//!     .info(info)
//!     .build()
//!     .unwrap();
//!
//! let heavy = grid.select("M", Some(1.0), None).unwrap();
//! assert_eq!(heavy.values("X").unwrap(), &[1., 2.]);
//! assert_eq!(heavy.info().shape(), None);
//! ```

mod field;
mod info;

pub use field::{Field, Precision};
pub use info::{GridInfo, RawInfo};

use crate::coords::CoordLabels;
use crate::error;
use crate::{Error, Result};

use indexmap::IndexMap;
use ndarray::Array1;

/// Co-indexed per-bin fields of one snapshot plus their metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    fields: IndexMap<String, Field>,
    info: GridInfo,
}

/// Value added to a field by [`Grid::translate`]
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// the same offset for every bin
    Scalar(f64),
    /// one offset per bin, or a single value that is broadcast
    PerBin(Array1<f64>),
}

impl From<f64> for Translation {
    fn from(x: f64) -> Self {
        Translation::Scalar(x)
    }
}

impl From<Vec<f64>> for Translation {
    fn from(x: Vec<f64>) -> Self {
        Translation::PerBin(Array1::from(x))
    }
}

impl From<&[f64]> for Translation {
    fn from(x: &[f64]) -> Self {
        Translation::PerBin(Array1::from(x.to_vec()))
    }
}

impl From<Array1<f64>> for Translation {
    fn from(x: Array1<f64>) -> Self {
        Translation::PerBin(x)
    }
}

impl Grid {
    /// A grid without any fields or metadata
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and assemble a grid from finished fields
    pub(crate) fn from_parts(fields: IndexMap<String, Field>, info: GridInfo) -> Result<Self> {
        let expected = fields.values().next().map(Field::len).unwrap_or(0);

        for (label, field) in fields.iter() {
            if field.len() != expected {
                return Err(error::SizeMismatch::new(label.clone(), expected, field.len()).into());
            }
        }

        if let Some(num_bins) = info.num_bins() {
            if !fields.is_empty() && num_bins != expected {
                return Err(error::SizeMismatch::new("num_bins".into(), expected, num_bins).into());
            }
        }

        Ok(Self { fields, info })
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.fields.values().next().map(Field::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn info(&self) -> &GridInfo {
        &self.info
    }

    /// Physical extent of the grid, see [`GridInfo::size`]
    pub fn size(&self) -> Option<(f64, f64)> {
        self.info.size()
    }

    /// Field labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Labelled fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(label, field)| (label.as_str(), field))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    pub fn field(&self, label: &str) -> Result<&Field> {
        self.fields
            .get(label)
            .ok_or_else(|| Error::missing_label(label))
    }

    /// Values of one field
    pub fn values(&self, label: &str) -> Result<&[f64]> {
        self.field(label).map(Field::as_slice)
    }

    /// Values of both coordinate fields
    pub fn coordinates(&self, coords: &CoordLabels) -> Result<(&[f64], &[f64])> {
        Ok((self.values(&coords.x)?, self.values(&coords.y)?))
    }

    /// An independent deep copy
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// The same bins and fields with different metadata
    pub fn with_info(&self, info: GridInfo) -> Result<Self> {
        Self::from_parts(self.fields.clone(), info)
    }

    /// A grid of the bins at `indices`, in that order
    ///
    /// The result is not assumed to be regular: `spacing` is kept, `shape`
    /// and `origin` are cleared and `num_bins` is the number of indices.
    pub fn take(&self, indices: &[usize]) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(label, field)| (label.clone(), field.take(indices)))
            .collect();

        Self {
            fields,
            info: self.info.irregular(indices.len()),
        }
    }

    /// Keep the bins where `min <= label <= max`
    ///
    /// Either bound can be `None` to leave that side open. See [`Grid::take`]
    /// for the metadata of the result.
    pub fn select(&self, label: &str, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        if min.map_or(false, f64::is_nan) || max.map_or(false, f64::is_nan) {
            return Err(error::InvalidBounds::new(min, max).into());
        }

        let field = self.field(label)?;
        let lo = min.unwrap_or(f64::NEG_INFINITY);
        let hi = max.unwrap_or(f64::INFINITY);

        let indices: Vec<usize> = field
            .values()
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= lo && v <= hi)
            .map(|(i, _)| i)
            .collect();

        Ok(self.take(&indices))
    }

    /// Cut out the bins inside a rectangle of coordinates
    ///
    /// Open bounds default to the origin and far edge of the grid when
    /// those are known. The result has its shape recounted from the distinct
    /// coordinates that remain and its origin at the lower bounds.
    pub fn rectangular_cut(
        &self,
        coords: &CoordLabels,
        x_range: (Option<f64>, Option<f64>),
        y_range: (Option<f64>, Option<f64>),
    ) -> Result<Self> {
        let origin = self.info.origin();
        let far_edge = match (origin, self.info.shape(), self.info.spacing()) {
            (Some((x0, y0)), Some((nx, ny)), Some((dx, dy))) => {
                Some((x0 + nx as f64 * dx, y0 + ny as f64 * dy))
            }
            _ => None,
        };

        let xmin = x_range.0.or(origin.map(|o| o.0));
        let xmax = x_range.1.or(far_edge.map(|f| f.0));
        let ymin = y_range.0.or(origin.map(|o| o.1));
        let ymax = y_range.1.or(far_edge.map(|f| f.1));

        let cut = self
            .select(&coords.x, xmin, xmax)?
            .select(&coords.y, ymin, ymax)?;

        let (xs, ys) = cut.coordinates(coords)?;
        let nx = crate::utils::unique_sorted(xs).len();
        let ny = crate::utils::unique_sorted(ys).len();

        let lowest = |values: &[f64]| values.iter().copied().reduce(f64::min);
        let new_origin = xmin
            .or_else(|| lowest(xs))
            .zip(ymin.or_else(|| lowest(ys)));

        let mut info = GridInfo::default();
        info.set_shape(Some((nx, ny)).filter(|&(nx, ny)| nx > 0 && ny > 0))?;
        info.set_origin(new_origin)?;
        info.set_spacing(self.info.spacing())?;
        info.set_num_bins(Some(cut.len()));

        cut.with_info(info)
    }

    /// Add `delta` to every bin of one field
    ///
    /// A per-bin delta must have one value per bin, or a single value.
    pub fn translate(&self, label: &str, delta: impl Into<Translation>) -> Result<Self> {
        let field = self.field(label)?;

        let values = match delta.into() {
            Translation::Scalar(dx) => field.values().mapv(|v| v + dx),
            Translation::PerBin(dxs) if dxs.len() == 1 => {
                let dx = dxs[0];
                field.values().mapv(|v| v + dx)
            }
            Translation::PerBin(dxs) if dxs.len() == field.len() => &field.values() + &dxs,
            Translation::PerBin(dxs) => {
                return Err(error::Broadcast::new(label.to_string(), field.len(), dxs.len()).into())
            }
        };

        let mut fields = self.fields.clone();
        fields.insert(label.to_string(), field.with_values(values));

        Ok(Self {
            fields,
            info: self.info,
        })
    }

    /// Bin indices sorted by Y, then by X within each row
    pub(crate) fn row_major_order(&self, coords: &CoordLabels) -> Result<Vec<usize>> {
        let (xs, ys) = self.coordinates(coords)?;

        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| ys[a].total_cmp(&ys[b]).then(xs[a].total_cmp(&xs[b])));

        Ok(order)
    }
}

/// Collects labelled arrays and metadata into a [`Grid`]
///
/// The precision of each field is inferred from its element type unless
/// set explicitly for that field with [`field_as`](GridBuilder::field_as),
/// or for every field with [`precision`](GridBuilder::precision).
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    fields: Vec<(String, Field, Option<Precision>)>,
    precision: Option<Precision>,
    info: GridInfo,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: impl Into<String>, values: impl Into<Field>) -> Self {
        self.fields.push((label.into(), values.into(), None));
        self
    }

    /// add a field stored with an explicit precision
    pub fn field_as(
        mut self,
        label: impl Into<String>,
        values: impl Into<Field>,
        precision: Precision,
    ) -> Self {
        self.fields.push((label.into(), values.into(), Some(precision)));
        self
    }

    /// add several labelled fields at once
    pub fn fields<L, F, I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (L, F)>,
        L: Into<String>,
        F: Into<Field>,
    {
        for (label, values) in fields {
            self = self.field(label, values);
        }
        self
    }

    /// store every field without its own explicit precision at `precision`
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn info(mut self, info: GridInfo) -> Self {
        self.info = info;
        self
    }

    pub fn build(self) -> Result<Grid> {
        let mut fields = IndexMap::with_capacity(self.fields.len());

        for (label, field, precision) in self.fields {
            if fields.contains_key(&label) {
                return Err(error::DuplicateLabel::new(label).into());
            }

            let field = match precision.or(self.precision) {
                Some(precision) => field.with_precision(precision),
                None => field,
            };

            fields.insert(label, field);
        }

        Grid::from_parts(fields, self.info)
    }
}
