use prelude::*;

use crate::{MeasurementModel, ProcessModel};

// Linear time invariant dynamics xdot = A x with constant noise influence G.
pub struct Linear {
    A: Matrix,
    G: Matrix,
}

impl Linear {
    pub fn new(A: Matrix, G: Matrix) -> Linear {
        assert_eq!(A.nrows(), A.ncols());
        assert_eq!(G.nrows(), A.nrows());
        Linear { A, G }
    }
}

impl ProcessModel for Linear {
    fn state_dim(&self) -> usize {
        self.A.nrows()
    }

    fn noise_dim(&self) -> usize {
        self.G.ncols()
    }

    fn derivative(&self, x: &Vector, _t: float, _u: Option<&Vector>) -> Vector {
        &self.A * x
    }

    fn jacobian(&self, _x: &Vector, _t: float, _u: Option<&Vector>) -> Matrix {
        self.A.clone()
    }

    fn noise_influence(&self, _x: &Vector, _t: float, _u: Option<&Vector>) -> Matrix {
        self.G.clone()
    }
}

// Linear measurement y = H x.
pub struct LinearMeasurement {
    H: Matrix,
}

impl LinearMeasurement {
    pub fn new(H: Matrix) -> LinearMeasurement {
        LinearMeasurement { H }
    }
}

impl MeasurementModel for LinearMeasurement {
    fn expectation(&self, x: &Vector, _t: float) -> Vector {
        &self.H * x
    }

    fn jacobian(&self, _x: &Vector, _t: float) -> Matrix {
        self.H.clone()
    }
}
