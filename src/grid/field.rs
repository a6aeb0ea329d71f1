use crate::traits::Numeric;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Logical element type of a field
///
/// Values are held as `f64` internally but are always representable in
/// the precision of their field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    Float32,
    Float64,
    Int32,
    Int64,
}

impl Precision {
    /// round a value to what this precision can represent
    pub fn cast(&self, value: f64) -> f64 {
        match self {
            Precision::Float64 => value,
            Precision::Float32 => value as f32 as f64,
            Precision::Int32 => value as i32 as f64,
            Precision::Int64 => value as i64 as f64,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Precision::Int32 | Precision::Int64)
    }
}

/// The per-bin values of one labelled quantity
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    precision: Precision,
    values: Array1<f64>,
}

impl Field {
    /// build a field, casting the values to `precision`
    pub fn new(values: Array1<f64>, precision: Precision) -> Self {
        let values = if values.is_standard_layout() {
            values
        } else {
            values.as_standard_layout().into_owned()
        };

        let values = if precision == Precision::Float64 {
            values
        } else {
            values.mapv_into(|v| precision.cast(v))
        };

        Self { precision, values }
    }

    /// build a field with the precision inferred from the element type
    pub fn from_vec<T: Numeric>(values: Vec<T>) -> Self {
        let values = values.into_iter().map(Numeric::to_f64).collect();
        Self::new(values, T::as_precision())
    }

    pub fn from_array<T: Numeric>(values: Array1<T>) -> Self {
        Self::new(values.mapv(Numeric::to_f64), T::as_precision())
    }

    /// a field of `len` zeros
    pub fn zeros(len: usize, precision: Precision) -> Self {
        Self {
            precision,
            values: Array1::zeros(len),
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.values
            .as_slice()
            .expect("one dimensional owned arrays are contiguous")
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// copy the values out as a vector of any numeric type
    pub fn to_vec<T: Numeric>(&self) -> Vec<T> {
        self.values.iter().map(|v| T::from_f64(*v)).collect()
    }

    pub fn into_values(self) -> Array1<f64> {
        self.values
    }

    /// the same field with another precision
    pub fn with_precision(self, precision: Precision) -> Self {
        Self::new(self.values, precision)
    }

    /// a field of the same precision holding other values
    pub(crate) fn with_values(&self, values: Array1<f64>) -> Self {
        Self::new(values, self.precision)
    }

    /// gather the values at the given bin indices
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        let values = indices.iter().map(|&i| self.values[i]).collect();
        Self {
            precision: self.precision,
            values,
        }
    }

    pub(crate) fn min_max(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

impl<T: Numeric> From<Vec<T>> for Field {
    fn from(values: Vec<T>) -> Self {
        Field::from_vec(values)
    }
}

impl<T: Numeric> From<Array1<T>> for Field {
    fn from(values: Array1<T>) -> Self {
        Field::from_array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_is_inferred_from_element_type() {
        assert_eq!(Field::from_vec(vec![1.0f32]).precision(), Precision::Float32);
        assert_eq!(Field::from_vec(vec![1.0f64]).precision(), Precision::Float64);
        assert_eq!(Field::from_vec(vec![1i32]).precision(), Precision::Int32);
        assert_eq!(Field::from_vec(vec![1usize]).precision(), Precision::Int64);
    }

    #[test]
    fn values_are_cast_to_precision() {
        let field = Field::new(ndarray::arr1(&[1.7, -2.5]), Precision::Int32);
        assert_eq!(field.as_slice(), &[1.0, -2.0]);

        let field = Field::new(ndarray::arr1(&[0.1]), Precision::Float32);
        assert_eq!(field.as_slice(), &[0.1f32 as f64]);
    }

    #[test]
    fn to_vec_converts_back() {
        let field = Field::from_vec(vec![1u32, 2, 3]);
        let out: Vec<u32> = field.to_vec();
        assert_eq!(out, vec![1, 2, 3]);
    }
}
