use crate::{error, Error, Result};

use serde::{Deserialize, Serialize};

/// Labels of the two fields that hold bin coordinates
///
/// Defaults to `("X", "Y")`. Every geometric operation takes one of these
/// explicitly, so data read with other coordinate names works unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordLabels {
    pub x: String,
    pub y: String,
}

impl CoordLabels {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.x == label || self.y == label
    }

    /// Fails when both axes name the same field
    pub fn check(&self) -> Result<()> {
        if self.x == self.y {
            return Err(error::CoordinateLabels::new(format!(
                "`{}` is used for both axes",
                self.x
            ))
            .into());
        }

        Ok(())
    }

    /// Coordinate fields of a grid that takes part in a combination
    ///
    /// A missing coordinate field is an invalid input here rather than a
    /// failed lookup.
    pub(crate) fn of<'g>(&self, grid: &'g crate::Grid) -> Result<(&'g [f64], &'g [f64])> {
        grid.coordinates(self).map_err(|err| match err {
            Error::MissingLabel(missing) => error::CoordinateLabels::new(format!(
                "grid has no coordinate field `{}`",
                missing.label()
            ))
            .into(),
            err => err,
        })
    }
}


impl Default for CoordLabels {
    fn default() -> Self {
        Self::new("X", "Y")
    }
}
