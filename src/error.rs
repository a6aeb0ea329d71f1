//! Detail types carried by the variants of [`Error`](crate::Error)

use derive_more::{Constructor, Display, From};

/// Broad category of a failure, independent of the exact cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// malformed input or inputs that do not agree with each other
    Validation,
    /// a requested field label does not exist
    NotFound,
    /// a coordinate matched more than one bin
    AmbiguousMapping,
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "added arrays not all of equal size: field `{label}` has {actual} elements, expected {expected}"
)]
pub struct SizeMismatch {
    label: String,
    expected: usize,
    actual: usize,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "field label `{label}` was added more than once")]
pub struct DuplicateLabel {
    label: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "malformed grid information `{key}`: {reason}")]
pub struct MalformedMetadata {
    key: String,
    reason: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "operation `{operation}` requires the grid `{key}` to be set")]
pub struct MissingMetadata {
    operation: &'static str,
    key: &'static str,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "grid has no field with label `{label}`")]
pub struct MissingLabel {
    label: String,
}

impl MissingLabel {
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "bad limits ({min:?}, {max:?}): must be numbers or open")]
pub struct InvalidBounds {
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "cannot broadcast {actual} values onto field `{label}` with {expected} bins")]
pub struct Broadcast {
    label: String,
    expected: usize,
    actual: usize,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "grid spacing {actual:?} does not match the bin size {expected:?}")]
pub struct SpacingMismatch {
    expected: (f64, f64),
    actual: (f64, f64),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "coordinates do not match: {reason}")]
pub struct CoordinateMismatch {
    reason: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "bad coordinate labels: {reason}")]
pub struct CoordinateLabels {
    reason: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "input grid or data has duplicate coordinates at ({x}, {y})")]
pub struct DuplicateCoordinate {
    x: f64,
    y: f64,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "no grids were given to `{operation}`")]
pub struct NoGrids {
    operation: &'static str,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "cannot resample a grid of shape {shape:?} by factor {factor:?}")]
pub struct InvalidFactor {
    shape: (usize, usize),
    factor: (usize, usize),
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "bad interface contour: {reason}")]
pub struct InvalidContour {
    reason: String,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "cannot transfer layer data between layer spacings {previous} and {current}")]
pub struct LayerSpacing {
    previous: f64,
    current: f64,
}
