use crate::{Error, Result};
use serde::Deserialize;

/// Grid metadata: shape, origin, spacing and number of bins
///
/// Every property is optional. An unset shape, origin or spacing is `None`
/// for both components at once, never a half-set pair. Setters validate
/// their input and leave the previous value in place on failure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridInfo {
    shape: Option<(usize, usize)>,
    origin: Option<(f64, f64)>,
    spacing: Option<(f64, f64)>,
    num_bins: Option<usize>,
}

impl GridInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bins along each axis
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    /// Coordinate of the lowest-index bin
    pub fn origin(&self) -> Option<(f64, f64)> {
        self.origin
    }

    /// Bin pitch along each axis
    pub fn spacing(&self) -> Option<(f64, f64)> {
        self.spacing
    }

    pub fn num_bins(&self) -> Option<usize> {
        self.num_bins
    }

    pub fn set_shape(&mut self, shape: Option<(usize, usize)>) -> Result<()> {
        if let Some((nx, ny)) = shape {
            if nx == 0 || ny == 0 {
                return Err(Error::malformed("shape", format!("({nx}, {ny}) must be positive")));
            }
        }

        self.shape = shape;
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Option<(f64, f64)>) -> Result<()> {
        if let Some((x, y)) = origin {
            if !(x.is_finite() && y.is_finite()) {
                return Err(Error::malformed("origin", format!("({x}, {y}) must be finite")));
            }
        }

        self.origin = origin;
        Ok(())
    }

    pub fn set_spacing(&mut self, spacing: Option<(f64, f64)>) -> Result<()> {
        if let Some((dx, dy)) = spacing {
            if !(dx.is_finite() && dy.is_finite() && dx > 0. && dy > 0.) {
                return Err(Error::malformed(
                    "spacing",
                    format!("({dx}, {dy}) must be two positive numbers"),
                ));
            }
        }

        self.spacing = spacing;
        Ok(())
    }

    pub fn set_num_bins(&mut self, num_bins: Option<usize>) {
        self.num_bins = num_bins;
    }

    pub fn with_shape(mut self, nx: usize, ny: usize) -> Result<Self> {
        self.set_shape(Some((nx, ny)))?;
        Ok(self)
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Result<Self> {
        self.set_origin(Some((x, y)))?;
        Ok(self)
    }

    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Result<Self> {
        self.set_spacing(Some((dx, dy)))?;
        Ok(self)
    }

    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = Some(num_bins);
        self
    }

    /// The same spacing for `num_bins` bins that need not form a regular grid
    pub(crate) fn irregular(&self, num_bins: usize) -> Self {
        Self {
            shape: None,
            origin: None,
            spacing: self.spacing,
            num_bins: Some(num_bins),
        }
    }

    /// Physical extent of the system, `shape * spacing` along each axis
    pub fn size(&self) -> Option<(f64, f64)> {
        let (nx, ny) = self.shape?;
        let (dx, dy) = self.spacing?;
        Some((nx as f64 * dx, ny as f64 * dy))
    }
}

/// Untyped grid metadata as handed over by a reader
///
/// Deserializes from any serde format with the keys `shape`, `origin`,
/// `spacing` and `num_bins`. Unknown keys are rejected. Convert into a
/// validated [`GridInfo`] with `TryFrom`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInfo {
    #[serde(default)]
    pub shape: Option<Vec<f64>>,
    #[serde(default)]
    pub origin: Option<Vec<f64>>,
    #[serde(default)]
    pub spacing: Option<Vec<f64>>,
    #[serde(default)]
    pub num_bins: Option<f64>,
}

fn pair(key: &str, values: Option<Vec<f64>>) -> Result<Option<(f64, f64)>> {
    match values.as_deref() {
        None | Some([]) => Ok(None),
        Some([a, b]) => Ok(Some((*a, *b))),
        Some(other) => Err(Error::malformed(
            key,
            format!("expected two values, got {}", other.len()),
        )),
    }
}

fn count(key: &str, value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0. && value.fract() == 0. {
        Ok(value as usize)
    } else {
        Err(Error::malformed(key, format!("{value} is not a whole number")))
    }
}

impl TryFrom<RawInfo> for GridInfo {
    type Error = Error;

    fn try_from(raw: RawInfo) -> Result<Self> {
        let mut info = GridInfo::default();

        let shape = match pair("shape", raw.shape)? {
            Some((nx, ny)) => Some((count("shape", nx)?, count("shape", ny)?)),
            None => None,
        };

        info.set_shape(shape)?;
        info.set_origin(pair("origin", raw.origin)?)?;
        info.set_spacing(pair("spacing", raw.spacing)?)?;
        info.num_bins = raw.num_bins.map(|n| count("num_bins", n)).transpose()?;

        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn irregular_keeps_only_the_spacing() {
        let info = GridInfo::default()
            .with_shape(3, 2)
            .unwrap()
            .with_origin(1., 1.)
            .unwrap()
            .with_spacing(0.5, 0.25)
            .unwrap()
            .with_num_bins(6)
            .irregular(4);

        assert_eq!(info.shape(), None);
        assert_eq!(info.origin(), None);
        assert_eq!(info.spacing(), Some((0.5, 0.25)));
        assert_eq!(info.num_bins(), Some(4));
    }

    #[test]
    fn unset_values_are_none() {
        let info = GridInfo::default();
        assert_eq!(info.shape(), None);
        assert_eq!(info.origin(), None);
        assert_eq!(info.spacing(), None);
        assert_eq!(info.num_bins(), None);
        assert_eq!(info.size(), None);
    }

    #[test]
    fn rejected_setter_keeps_previous_value() {
        let mut info = GridInfo::default().with_shape(2, 3).unwrap();

        let err = info.set_shape(Some((0, 3))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(info.shape(), Some((2, 3)));

        assert!(info.set_spacing(Some((1., -1.))).is_err());
        assert!(info.set_origin(Some((f64::NAN, 0.))).is_err());
    }

    #[test]
    fn size_from_shape_and_spacing() {
        let info = GridInfo::default()
            .with_shape(4, 2)
            .unwrap()
            .with_spacing(0.5, 2.)
            .unwrap();

        assert_eq!(info.size(), Some((2., 4.)));
    }

    #[test]
    fn raw_info_arity_is_checked() {
        let raw = RawInfo {
            spacing: Some(vec![1.]),
            ..Default::default()
        };
        assert!(GridInfo::try_from(raw).is_err());

        let raw = RawInfo {
            shape: Some(vec![2.5, 1.]),
            ..Default::default()
        };
        assert!(GridInfo::try_from(raw).is_err());

        let raw = RawInfo {
            shape: Some(vec![]),
            origin: Some(vec![0., 1.]),
            num_bins: Some(4.),
            ..Default::default()
        };
        let info = GridInfo::try_from(raw).unwrap();
        assert_eq!(info.shape(), None);
        assert_eq!(info.origin(), Some((0., 1.)));
        assert_eq!(info.num_bins(), Some(4));
    }
}
