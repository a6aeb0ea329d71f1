#![doc = include_str!("../README.md")]

pub mod combine;
mod coords;
pub mod error;
pub mod grid;
pub mod interface;
pub mod prelude;
pub mod spreading;
mod traits;
pub mod tracker;
mod utils;

pub use coords::CoordLabels;
pub use error::ErrorKind;

pub use grid::{Field, Grid, GridBuilder, GridInfo, Precision, RawInfo, Translation};
pub use interface::{BoundaryEdge, DetectorConfig, InterfaceDetector, InterfaceLayers};
pub use tracker::{ContactLineTracker, PeriodicInfo, UnwrappedEdges};

pub use traits::{FieldRecord, Numeric};

pub use combine::resample::{downsample, supersample};
pub use combine::{average, build_union_grid, project, union_grid};

pub use spreading::{SpreadingConfig, SpreadingSample, SpreadingSeries};

#[cfg(feature = "derive")]
pub use flowfield_derive::FieldRecord;

pub use ndarray;

/// Result alias for every fallible operation in this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug, derive_more::From)]
pub enum Error {
    #[error("{0}")]
    SizeMismatch(error::SizeMismatch),
    #[error("{0}")]
    DuplicateLabel(error::DuplicateLabel),
    #[error("{0}")]
    MalformedMetadata(error::MalformedMetadata),
    #[error("{0}")]
    MissingMetadata(error::MissingMetadata),
    #[error("{0}")]
    MissingLabel(error::MissingLabel),
    #[error("{0}")]
    InvalidBounds(error::InvalidBounds),
    #[error("{0}")]
    Broadcast(error::Broadcast),
    #[error("{0}")]
    SpacingMismatch(error::SpacingMismatch),
    #[error("{0}")]
    CoordinateMismatch(error::CoordinateMismatch),
    #[error("{0}")]
    CoordinateLabels(error::CoordinateLabels),
    #[error("{0}")]
    DuplicateCoordinate(error::DuplicateCoordinate),
    #[error("{0}")]
    NoGrids(error::NoGrids),
    #[error("{0}")]
    InvalidFactor(error::InvalidFactor),
    #[error("{0}")]
    LayerSpacing(error::LayerSpacing),
    #[error("{0}")]
    InvalidContour(error::InvalidContour),
}

impl Error {
    /// The category this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingLabel(_) => ErrorKind::NotFound,
            Error::DuplicateCoordinate(_) => ErrorKind::AmbiguousMapping,
            _ => ErrorKind::Validation,
        }
    }

    pub(crate) fn missing_label(label: &str) -> Self {
        Error::from(error::MissingLabel::new(label.to_string()))
    }

    pub(crate) fn missing_metadata(operation: &'static str, key: &'static str) -> Self {
        Error::from(error::MissingMetadata::new(operation, key))
    }

    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        Error::from(error::MalformedMetadata::new(key.to_string(), reason.into()))
    }
}
