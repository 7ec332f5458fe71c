use nalgebra::dvector;

use prelude::*;
use system_model::VanDerPol;

use crate::config::SimulatorConfig;

// Builds a Van der Pol model from a [zeta, omega] parameter pair.
pub fn model_from_params(params: &[float]) -> VanDerPol {
    assert_eq!(params.len(), 2, "model parameters must be [zeta, omega]");
    VanDerPol::new(params[0], params[1])
}

// Interprets a flat row-major vector as a square covariance matrix.
pub fn covariance_from_config(values: &[float]) -> Matrix {
    let n = (values.len() as float).sqrt() as usize;
    assert_eq!(n * n, values.len(), "covariance must be square");
    Matrix::from_row_slice(n, n, values)
}

pub fn initial_state(config: &SimulatorConfig) -> Vector {
    assert_eq!(config.x_0.len(), 2, "x_0 must be [position, velocity]");
    Vector::from_column_slice(&config.x_0)
}

// Maps the first position measurement to an initial state and covariance.
pub fn init_from_measurement(z: &Vector) -> (Vector, Matrix) {
    let x_0 = dvector![z[0], 0.0];
    let P_0 = 1000.0 * Matrix::identity(2, 2) + Matrix::from_element(2, 2, 1e-6);
    (x_0, P_0)
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use system_model::MeasurementModel;

    use super::init_from_measurement;

    // The seed measurement is the sensor's noiseless expectation of the
    // initial state, so the seeded position must equal the true position
    // exactly.
    #[test]
    fn seed_copies_the_position_verbatim() {
        let sensor = system_model::LinearMeasurement::new(nalgebra::dmatrix![1.0, 0.0]);
        let x = dvector![1.0, 0.0];
        let z_0 = sensor.expectation(&x, 0.0);
        let (x_0, P_0) = init_from_measurement(&z_0);

        assert_eq!(x_0, dvector![1.0, 0.0]);
        assert_eq!(P_0[(0, 0)], 1000.0 + 1e-6);
        assert_eq!(P_0[(0, 1)], 1e-6);
    }
}
