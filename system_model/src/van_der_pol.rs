use nalgebra::{dmatrix, dvector};
use prelude::*;

use crate::ProcessModel;

// Van der Pol oscillator with damping ratio zeta and natural frequency omega.
// Process noise enters through the velocity derivative.
pub struct VanDerPol {
    zeta: float,
    omega: float,
}

impl VanDerPol {
    pub fn new(zeta: float, omega: float) -> VanDerPol {
        VanDerPol { zeta, omega }
    }
}

impl ProcessModel for VanDerPol {
    fn state_dim(&self) -> usize {
        2
    }

    fn noise_dim(&self) -> usize {
        1
    }

    fn derivative(&self, x: &Vector, _t: float, _u: Option<&Vector>) -> Vector {
        let (zeta, omega) = (self.zeta, self.omega);
        dvector![
            x[1],
            -2.0 * zeta * omega * (x[0] * x[0] - 1.0) * x[1] - omega * omega * x[0]
        ]
    }

    fn jacobian(&self, x: &Vector, _t: float, _u: Option<&Vector>) -> Matrix {
        let (zeta, omega) = (self.zeta, self.omega);
        let dfdx1 = -4.0 * zeta * omega * x[0] * x[1] - omega * omega;
        let dfdx2 = -2.0 * zeta * omega * (x[0] * x[0] - 1.0);
        #[rustfmt::skip]
        let F = dmatrix![
            0.0, 1.0;
            dfdx1, dfdx2
        ];
        F
    }

    fn noise_influence(&self, _x: &Vector, _t: float, _u: Option<&Vector>) -> Matrix {
        dmatrix![
            0.0;
            1.0
        ]
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use super::VanDerPol;
    use crate::ProcessModel;

    #[test]
    fn jacobian_matches_finite_difference() {
        let model = VanDerPol::new(1.0, 1.0);
        let x = dvector![0.7, -1.3];
        let F = model.jacobian(&x, 0.0, None);

        let eps = 1e-6;
        for j in 0..2 {
            let mut hi = x.clone();
            let mut lo = x.clone();
            hi[j] += eps;
            lo[j] -= eps;
            let dfdxj =
                (model.derivative(&hi, 0.0, None) - model.derivative(&lo, 0.0, None)) / (2.0 * eps);
            for i in 0..2 {
                assert!((F[(i, j)] - dfdxj[i]).abs() < 1e-6);
            }
        }
    }
}
