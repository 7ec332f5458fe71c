#![allow(non_snake_case)]

mod ekf;
pub use ekf::{EkfOptions, Estimate, EKF};

mod errors;
pub use errors::FilterError;
