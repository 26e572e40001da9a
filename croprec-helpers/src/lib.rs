use ndarray::{NdFloat, ScalarOperand};

use num_traits::FromPrimitive;

use std::iter::Sum;

mod common;
mod distance;

pub use common::DataPoint;
pub use distance::{Distance, L2Dist};

/// Float types usable as feature values (`f32`, `f64`).
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Sum
    + ScalarOperand
    + std::marker::Unpin
{
}

impl Float for f32 {}

impl Float for f64 {}
