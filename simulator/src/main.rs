// Ignore this lint otherwise many warnings are generated for common mathematical notation
#![allow(non_snake_case)]

mod config;
mod simulation_model;

use std::fs::File;
use std::io::{BufWriter, Write};

use log::{debug, info, warn};
use nalgebra::dmatrix;
use rand::rngs::StdRng;
use rand::SeedableRng;

use estimator::EKF;
use prelude::*;
use system_model::{LinearMeasurement, MeasurementModel, ProcessModel};

fn main() {
    env_logger::init();

    let sim_config = config::SimulatorConfig::load();

    let truth_model = simulation_model::model_from_params(&sim_config.truth_params);
    let filter_model = simulation_model::model_from_params(&sim_config.model_params);
    let sensor = LinearMeasurement::new(dmatrix![1.0, 0.0]);
    let R = simulation_model::covariance_from_config(&sim_config.R);
    let Q = simulation_model::covariance_from_config(&sim_config.Q);

    let mut ekf = EKF::new(2, 1, filter_model, Q).expect("invalid filter configuration");

    let mut rng = StdRng::seed_from_u64(sim_config.seed);
    let mut x = simulation_model::initial_state(&sim_config);
    let mut t = 0.0;

    // Seed the filter from the noiseless expected measurement of the initial state
    let z_0 = sensor.expectation(&x, t);
    ekf.init(&z_0, simulation_model::init_from_measurement, t)
        .expect("unable to initialise filter");

    let mut out =
        BufWriter::new(File::create(&sim_config.output).expect("unable to create output file"));
    writeln!(out, "t,x1,x2,ymeas,x1hat,x2hat,P11,P22").expect("unable to write output");

    let n_steps = (sim_config.t / sim_config.dt) as usize;
    let mut stats = stats::OnlineStats::new();

    for _ in 0..n_steps {
        // Propagate the filter, then run the (mismatched) truth forward
        ekf.propagate(sim_config.dt).expect("propagation failed");
        x = truth_model.step(sim_config.dt, 4, &x, t, None);
        t += sim_config.dt;

        // Add noise to measurement
        let z = noisy_measurement(&sensor, &x, t, sim_config.measurement_sigma, &mut rng);

        // Fuse, keeping the propagated prior if the update is rejected
        if let Err(e) = ekf.update(t, &z, &sensor, &R) {
            warn!("measurement rejected at t = {}: {}", t, e);
        }

        let est = ekf.estimate().expect("filter not initialised");
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            t,
            x[0],
            x[1],
            z[0],
            est.x_hat[0],
            est.x_hat[1],
            est.P[(0, 0)],
            est.P[(1, 1)]
        )
        .expect("unable to write output");

        stats.add((x[0] - est.x_hat[0]).abs());
        debug!("t = {} x1 = {} x1hat = {}", t, x[0], est.x_hat[0]);
    }

    info!("trajectory written to {}", sim_config.output);
    println!("Position error (mean, stdev): {:?}", stats);
}

fn noisy_measurement<R: rand::Rng>(
    sensor: &LinearMeasurement,
    x: &Vector,
    t: float,
    sigma: float,
    rng: &mut R,
) -> Vector {
    let mut z = sensor.expectation(x, t);
    for i in 0..z.len() {
        z[i] += randn(rng) * sigma;
    }
    z
}
