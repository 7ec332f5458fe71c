use prelude::float;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum FilterError {
    #[error("state and measurement dimensions must be positive (n = {n}, p = {p})")]
    InvalidDimensions { n: usize, p: usize },
    #[error("invalid filter configuration: {0}")]
    Config(&'static str),
    #[error("{name} is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    ShapeMismatch {
        name: &'static str,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
    #[error("`{0}` called before `init`")]
    Uninitialised(&'static str),
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(float),
    #[error("measurement at t = {t} is older than the filter time t = {filter_t}")]
    StaleMeasurement { t: float, filter_t: float },
    #[error("innovation covariance is singular to working precision")]
    SingularInnovation,
    #[error("covariance diverged: variance {variance} at state index {index}")]
    CovarianceDiverged { index: usize, variance: float },
}
