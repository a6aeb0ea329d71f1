//! # Traits
//!
//! `Numeric` describes the element types a field can be built from and read back into.
//! `FieldRecord` moves data between a plain struct of per-bin vectors and a [`Grid`]. With
//! the `derive` feature it can be derived:
//!
//! ```ignore
//! #[derive(flowfield::FieldRecord)]
//! struct SimpleMap {
//!     #[flowfield(label = "X")]
//!     x: Vec<f64>,
//!     #[flowfield(label = "Y")]
//!     y: Vec<f64>,
//!     #[flowfield(label = "M")]
//!     mass: Vec<f32>,
//!     // the label defaults to the field name
//!     n_atoms: Vec<u32>,
//! }
//! ```
//!
//! Reading a record back out of a grid requires every labelled field to be present.

use crate::grid::{Grid, GridInfo, Precision};
use num_traits::NumCast;

/// Element types that can be stored in a [`Field`](crate::Field)
pub trait Numeric: Copy + NumCast + PartialOrd + std::fmt::Debug {
    /// precision inferred for fields built from this type
    fn as_precision() -> Precision;

    fn to_f64(self) -> f64 {
        // every implementor is a primitive number, which always converts
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// convert a stored value back, saturating at the bounds of the type
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_numeric_int {
    ($($ty:ty => $prec:expr),*) => {
        $(
            impl Numeric for $ty {
                fn as_precision() -> Precision {
                    $prec
                }

                fn from_f64(value: f64) -> Self {
                    // `as` on floats saturates and maps NaN to zero
                    value as $ty
                }
            }
        )*
    };
}

impl Numeric for f64 {
    fn as_precision() -> Precision {
        Precision::Float64
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Numeric for f32 {
    fn as_precision() -> Precision {
        Precision::Float32
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl_numeric_int!(
    i32 => Precision::Int32,
    i64 => Precision::Int64,
    u32 => Precision::Int64,
    usize => Precision::Int64
);

/// A struct of equally long per-bin vectors that maps onto the fields of a [`Grid`]
pub trait FieldRecord: Sized {
    /// labels of the fields this record reads and writes, in declaration order
    fn labels() -> Vec<&'static str>;

    /// build a grid with one field per struct member
    fn into_grid(self, info: GridInfo) -> Result<Grid, crate::Error>;

    /// read every labelled field back out of a grid
    fn from_grid(grid: &Grid) -> Result<Self, crate::Error>;
}
