use thiserror::Error;

/// An arithmetic precondition violated inside the physics, sampling or
/// integration code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("temperature must be a non-negative finite number, got {0} K")]
    InvalidTemperature(f64),

    #[error("thermal velocity must be positive and finite, got {0} m/s")]
    InvalidThermalVelocity(f64),

    #[error("magnetic field must be non-zero and finite, got {0} T")]
    InvalidMagneticField(f64),

    #[error("cyclotron frequency is zero or not finite ({0} rad/s)")]
    InvalidCyclotronFrequency(f64),

    #[error("collision frequency must be positive and finite, got {0} Hz")]
    InvalidCollisionFrequency(f64),

    #[error("collision period evaluates to zero steps")]
    ZeroCollisionPeriod,

    #[error("trajectory needs at least 2 steps, got {0}")]
    TooFewSteps(usize),

    #[error("gaussian parameters must be finite with non-negative spread (mean={mean}, std_dev={std_dev})")]
    InvalidGaussian { mean: f64, std_dev: f64 },

    #[error("histogram needs at least one sample and one bin")]
    EmptyHistogram,

    #[error("{0} produced a non-finite value")]
    NonFinite(&'static str),
}

/// Errors reported to the caller of a simulation run.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid input: {message}")]
    InputValidation {
        message: String,
        #[source]
        cause: Option<DomainError>,
    },

    #[error("No simulation has been run yet; run the trajectories first")]
    StateNotReady,

    #[error("Simulation cancelled")]
    Cancelled,

    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimulationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        SimulationError::InputValidation {
            message: message.into(),
            cause: None,
        }
    }
}

impl From<DomainError> for SimulationError {
    fn from(err: DomainError) -> Self {
        SimulationError::InputValidation {
            message: err.to_string(),
            cause: Some(err),
        }
    }
}

pub type PlasmaResult<T> = Result<T, SimulationError>;
