//! Common traits and types that are useful for working with `flowfield`
#![allow(unused_imports)]

pub use crate::coords::CoordLabels;
pub use crate::grid::{Field, Grid, GridBuilder, GridInfo, Precision, Translation};
pub use crate::interface::{BoundaryEdge, DetectorConfig, InterfaceDetector};
pub use crate::tracker::{ContactLineTracker, PeriodicInfo};
pub use crate::traits::{FieldRecord, Numeric};

pub(crate) use crate::error;
pub(crate) use crate::utils::{is_close, unique_sorted, COORD_TOLERANCE};
pub(crate) use crate::{Error, Result};

pub(crate) use indexmap::IndexMap;
pub(crate) use ndarray::{Array1, Array2};
