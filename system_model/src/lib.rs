#![allow(non_snake_case)]

use prelude::*;

mod expm;

mod linear;
pub use linear::{Linear, LinearMeasurement};

mod odeint;
pub use odeint::rk4;

mod van_der_pol;
pub use van_der_pol::VanDerPol;

pub trait ProcessModel {
    fn state_dim(&self) -> usize;

    fn noise_dim(&self) -> usize;

    fn step(&self, dt: float, num_steps: u32, x: &Vector, t: float, u: Option<&Vector>) -> Vector {
        rk4(dt, num_steps, t, x, |x, t| self.derivative(x, t, u))
    }

    // Returns the state space derivative at a given operating point
    fn derivative(&self, x: &Vector, t: float, u: Option<&Vector>) -> Vector;

    // Returns the jacobian of the state space derivative with respect to the state
    fn jacobian(&self, x: &Vector, t: float, u: Option<&Vector>) -> Matrix;

    // Maps the process noise vector into the state space derivative
    fn noise_influence(&self, x: &Vector, t: float, u: Option<&Vector>) -> Matrix;
}

pub trait MeasurementModel {
    // Returns the expected measurement at a given operating point
    fn expectation(&self, x: &Vector, t: float) -> Vector;

    // Returns the jacobian of the expected measurement with respect to the state
    fn jacobian(&self, x: &Vector, t: float) -> Matrix;
}

/// Discretisation scheme for the state transition matrix of linearised dynamics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Discretisation {
    /// First order hold, `I + F * dt`.
    #[default]
    FirstOrder,
    /// Matrix exponential of `F * dt`.
    MatrixExponential,
}

impl Discretisation {
    pub fn transition(self, dt: float, F: &Matrix) -> Matrix {
        match self {
            Discretisation::FirstOrder => Matrix::identity(F.nrows(), F.ncols()) + F * dt,
            Discretisation::MatrixExponential => expm::expm(&(F * dt)),
        }
    }
}
