use log::{debug, warn};

use prelude::*;
use system_model::{Discretisation, MeasurementModel, ProcessModel};

use crate::FilterError;

#[derive(Clone, Copy, Debug)]
pub struct EkfOptions {
    /// Discretisation of the linearised dynamics for the covariance propagation.
    pub discretisation: Discretisation,
    /// Internal integration substeps per `propagate` call.
    pub integration_substeps: u32,
    /// Relative floor on the Cholesky factor diagonal of the innovation covariance
    /// below which an update is rejected as singular.
    pub innovation_tolerance: float,
}

impl Default for EkfOptions {
    fn default() -> EkfOptions {
        EkfOptions {
            discretisation: Discretisation::FirstOrder,
            integration_substeps: 1,
            innovation_tolerance: 1e-12,
        }
    }
}

/// Snapshot of the filter belief, cloned out so callers can never alias
/// engine-internal buffers.
#[derive(Clone, Debug)]
pub struct Estimate {
    pub x_hat: Vector,
    pub P: Matrix,
    pub t: float,
}

struct Belief {
    // Estimated state
    x_hat: Vector,
    // Estimated state covariance
    P: Matrix,
    t: float,
}

pub struct EKF<M: ProcessModel> {
    model: M,
    // Process noise covariance
    Q: Matrix,
    n: usize,
    p: usize,
    options: EkfOptions,
    belief: Option<Belief>,
}

impl<M: ProcessModel> EKF<M> {
    pub fn new(n: usize, p: usize, model: M, Q: Matrix) -> Result<EKF<M>, FilterError> {
        EKF::with_options(n, p, model, Q, EkfOptions::default())
    }

    pub fn with_options(
        n: usize,
        p: usize,
        model: M,
        Q: Matrix,
        options: EkfOptions,
    ) -> Result<EKF<M>, FilterError> {
        if n == 0 || p == 0 {
            return Err(FilterError::InvalidDimensions { n, p });
        }
        if model.state_dim() != n {
            return Err(FilterError::Config("model state dimension does not match n"));
        }
        let nw = model.noise_dim();
        check_shape("Q", &Q, nw, nw)?;
        if options.integration_substeps == 0 {
            return Err(FilterError::Config("integration_substeps must be at least 1"));
        }
        Ok(EKF {
            model,
            Q,
            n,
            p,
            options,
            belief: None,
        })
    }

    pub fn is_initialised(&self) -> bool {
        self.belief.is_some()
    }

    /// Seeds the filter from an initial measurement.
    ///
    /// `init_fn` maps the seed measurement to the initial state estimate and
    /// covariance. The covariance is taken as-is: it is not symmetrised or
    /// otherwise sanitised, and an asymmetric or indefinite initial covariance
    /// leaves later numerical behaviour undefined. Calling `init` again
    /// re-seeds the filter.
    pub fn init<F>(&mut self, seed: &Vector, init_fn: F, t_0: float) -> Result<(), FilterError>
    where
        F: FnOnce(&Vector) -> (Vector, Matrix),
    {
        check_len("seed measurement", seed, self.p)?;
        let (x_0, P_0) = init_fn(seed);
        check_len("initial state", &x_0, self.n)?;
        check_shape("initial covariance", &P_0, self.n, self.n)?;

        debug!("filter initialised at t = {}", t_0);
        self.belief = Some(Belief {
            x_hat: x_0,
            P: P_0,
            t: t_0,
        });
        Ok(())
    }

    /// Advances the estimate by `dt` without measurement information.
    ///
    /// The state is integrated with the configured number of Runge-Kutta
    /// substeps. The jacobian and noise influence for the covariance
    /// propagation are evaluated at the pre-propagation state.
    pub fn propagate(&mut self, dt: float) -> Result<(), FilterError> {
        self.propagate_with_control(dt, None)
    }

    pub fn propagate_with_control(
        &mut self,
        dt: float,
        u: Option<&Vector>,
    ) -> Result<(), FilterError> {
        let belief = self
            .belief
            .as_mut()
            .ok_or(FilterError::Uninitialised("propagate"))?;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(FilterError::InvalidTimeStep(dt));
        }

        let F = self.model.jacobian(&belief.x_hat, belief.t, u);
        check_shape("jacobian", &F, self.n, self.n)?;
        let G = self.model.noise_influence(&belief.x_hat, belief.t, u);
        check_shape("noise influence", &G, self.n, self.Q.nrows())?;

        // Predict
        let x_predict =
            self.model
                .step(dt, self.options.integration_substeps, &belief.x_hat, belief.t, u);
        check_len("propagated state", &x_predict, self.n)?;
        let F_d = self.options.discretisation.transition(dt, &F);
        let P_predict = &F_d * &belief.P * F_d.transpose() + &G * &self.Q * G.transpose() * dt;
        let P_predict = symmetrise(P_predict);
        check_diverged(&P_predict)?;

        belief.x_hat = x_predict;
        belief.P = P_predict;
        belief.t += dt;
        Ok(())
    }

    /// Corrects the estimate with a measurement taken at time `t`.
    ///
    /// `t` must not precede the filter time. A numerically singular innovation
    /// covariance rejects the update, leaving the propagated prior untouched.
    pub fn update<Z: MeasurementModel + ?Sized>(
        &mut self,
        t: float,
        z: &Vector,
        sensor: &Z,
        R: &Matrix,
    ) -> Result<(), FilterError> {
        let belief = self
            .belief
            .as_mut()
            .ok_or(FilterError::Uninitialised("update"))?;
        if t < belief.t {
            return Err(FilterError::StaleMeasurement { t, filter_t: belief.t });
        }

        let z_hat = sensor.expectation(&belief.x_hat, t);
        let p_k = z_hat.len();
        if p_k == 0 {
            return Err(FilterError::InvalidDimensions { n: self.n, p: 0 });
        }
        check_len("measurement", z, p_k)?;
        let H = sensor.jacobian(&belief.x_hat, t);
        check_shape("measurement jacobian", &H, p_k, self.n)?;
        check_shape("R", R, p_k, p_k)?;

        // Innovation
        let y = z - z_hat;

        // Innovation covariance
        let S = &H * &belief.P * H.transpose() + R;
        let chol = match S.cholesky() {
            Some(chol) => chol,
            None => {
                warn!("update rejected at t = {}: innovation covariance not positive-definite", t);
                return Err(FilterError::SingularInnovation);
            }
        };
        let diag = chol.l_dirty().diagonal();
        if !(diag.min() > self.options.innovation_tolerance * diag.max()) {
            warn!("update rejected at t = {}: innovation covariance near-singular", t);
            return Err(FilterError::SingularInnovation);
        }

        // Kalman gain, solved through the Cholesky factors rather than an explicit inverse
        let K = chol.solve(&(&H * &belief.P)).transpose();

        let x_update = &belief.x_hat + &K * y;
        let I = Matrix::identity(self.n, self.n);
        let IKH = I - &K * &H;
        // Use the numerically stable Joseph form to preserve positive-semi-definiteness of P
        let P_update = &IKH * &belief.P * IKH.transpose() + &K * R * K.transpose();
        let P_update = symmetrise(P_update);
        check_diverged(&P_update)?;

        belief.x_hat = x_update;
        belief.P = P_update;
        belief.t = t;
        Ok(())
    }

    /// Returns the current belief, or a sequencing error before `init`.
    pub fn estimate(&self) -> Result<Estimate, FilterError> {
        let belief = self
            .belief
            .as_ref()
            .ok_or(FilterError::Uninitialised("estimate"))?;
        Ok(Estimate {
            x_hat: belief.x_hat.clone(),
            P: belief.P.clone(),
            t: belief.t,
        })
    }
}

// Counters floating point drift away from symmetry.
fn symmetrise(P: Matrix) -> Matrix {
    let P_t = P.transpose();
    (P + P_t) * 0.5
}

fn check_shape(name: &'static str, m: &Matrix, rows: usize, cols: usize) -> Result<(), FilterError> {
    if m.nrows() != rows || m.ncols() != cols {
        return Err(FilterError::ShapeMismatch {
            name,
            rows: m.nrows(),
            cols: m.ncols(),
            expected_rows: rows,
            expected_cols: cols,
        });
    }
    Ok(())
}

fn check_len(name: &'static str, v: &Vector, len: usize) -> Result<(), FilterError> {
    if v.len() != len {
        return Err(FilterError::ShapeMismatch {
            name,
            rows: v.len(),
            cols: 1,
            expected_rows: len,
            expected_cols: 1,
        });
    }
    Ok(())
}

// A negative variance means the recursion has lost positive semi-definiteness.
fn check_diverged(P: &Matrix) -> Result<(), FilterError> {
    let mut max_var: float = 0.0;
    for i in 0..P.nrows() {
        if P[(i, i)] > max_var {
            max_var = P[(i, i)];
        }
    }
    let floor = -1e-9 * float::max(1.0, max_var);
    for i in 0..P.nrows() {
        let v = P[(i, i)];
        if !(v >= floor) {
            return Err(FilterError::CovarianceDiverged { index: i, variance: v });
        }
    }
    Ok(())
}
