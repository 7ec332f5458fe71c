#![allow(non_snake_case)]

use nalgebra::{dmatrix, dvector};

use estimator::EKF;
use prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use system_model::{LinearMeasurement, ProcessModel, VanDerPol};

// Position tracking exercise: noisy position measurements of a Van der Pol
// oscillator fused at every step, with the estimate seeded from the first
// measurement. Returns the number of steps with a small position error and
// the largest position variance over the second half of the run.
fn run_scenario(truth: VanDerPol, seed: u64) -> (usize, float) {
    let dt = 0.01;
    let sigma = 0.01;
    let R = dmatrix![1e-4];

    let model = VanDerPol::new(1.0, 1.0);
    let sensor = LinearMeasurement::new(dmatrix![1.0, 0.0]);
    let mut ekf = EKF::new(2, 1, model, dmatrix![20.0]).unwrap();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = dvector![1.0, 0.0];
    let mut t = 0.0;

    let z_0 = dvector![x[0] + sigma * randn(&mut rng)];
    ekf.init(
        &z_0,
        |z: &Vector| {
            (
                dvector![z[0], 0.0],
                1000.0 * Matrix::identity(2, 2) + Matrix::from_element(2, 2, 1e-6),
            )
        },
        t,
    )
    .unwrap();

    let steps = 1000;
    let mut in_bound = 0;
    let mut P11_late_max: float = 0.0;
    for k in 0..steps {
        ekf.propagate(dt).unwrap();
        x = truth.step(dt, 4, &x, t, None);
        t += dt;

        let z = dvector![x[0] + sigma * randn(&mut rng)];
        ekf.update(t, &z, &sensor, &R).unwrap();

        let est = ekf.estimate().unwrap();
        assert!((&est.P - est.P.transpose()).amax() < 1e-9);
        assert!(est.P[(0, 0)] > 0.0 && est.P[(1, 1)] > 0.0);
        if (x[0] - est.x_hat[0]).abs() < 0.5 {
            in_bound += 1;
        }
        if k >= steps / 2 {
            P11_late_max = float::max(P11_late_max, est.P[(0, 0)]);
        }
    }
    (in_bound, P11_late_max)
}

#[test]
fn tracks_the_oscillator_position() {
    let (in_bound, P11_late_max) = run_scenario(VanDerPol::new(1.0, 1.0), 7);
    assert!(in_bound >= 900);
    assert!(P11_late_max < 0.1);
}

#[test]
fn tolerates_an_overdamped_truth_model() {
    // the truth damps harder than the filter model; process noise absorbs the mismatch
    let (in_bound, P11_late_max) = run_scenario(VanDerPol::new(1.5, 1.0), 11);
    assert!(in_bound >= 900);
    assert!(P11_late_max < 0.1);
}
