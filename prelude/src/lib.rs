#![allow(non_camel_case_types)]

pub use nalgebra;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

pub type float = f64;

pub type Matrix = DMatrix<float>;
pub type Vector = DVector<float>;

// Standard normal draw from a caller-supplied generator.
pub fn randn<R: Rng + ?Sized>(rng: &mut R) -> float {
    rng.sample(StandardNormal)
}
