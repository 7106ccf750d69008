//! Entry point used by the front end: validated parameters in, a complete
//! [`SimulationResult`] out.

use std::env;

use log::{info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::constants::*;
use crate::ensemble::{self, CancelToken};
use crate::error::{DomainError, PlasmaResult, SimulationError};
use crate::histogram::Histogram;
use crate::physics::DerivedQuantities;
use crate::sampling::{entropy_seed, gaussian_inverse_transform, seeded_rng};
use crate::trajectory::{IntegratorSettings, ParticleState, Trajectory};

/// Key offsets from the run seed: population, collision kicks, histogram view.
const KICK_KEY_OFFSET: u64 = 1;
const HISTOGRAM_KEY_OFFSET: u64 = 2;

// ===================================================================================
// Simulation Parameters
// ===================================================================================

/// The four user inputs of a run. Only constructible through validation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationParameters {
    temperature: f64,
    particle_count: usize,
    step_count: usize,
    magnetic_field: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            temperature: DEFAULT_TEMPERATURE,
            particle_count: DEFAULT_NUM_PARTICLES,
            step_count: DEFAULT_NUM_STEPS,
            magnetic_field: DEFAULT_MAGNETIC_FIELD,
        }
    }
}

impl SimulationParameters {
    /// Validate the four inputs.
    pub fn new(
        temperature: f64,
        particle_count: usize,
        step_count: usize,
        magnetic_field: f64,
    ) -> PlasmaResult<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(SimulationError::invalid_input(format!(
                "temperature must be a positive number of kelvin, got {temperature}"
            )));
        }
        if particle_count == 0 {
            return Err(SimulationError::invalid_input("particle count must be at least 1"));
        }
        if step_count < 2 {
            return Err(SimulationError::invalid_input(format!(
                "step count must be at least 2, got {step_count}"
            )));
        }
        if !magnetic_field.is_finite() || magnetic_field == 0.0 {
            return Err(SimulationError::invalid_input(format!(
                "magnetic field must be a non-zero number of tesla, got {magnetic_field}"
            )));
        }
        Ok(SimulationParameters {
            temperature,
            particle_count,
            step_count,
            magnetic_field,
        })
    }

    /// Parse the four text entries of the GUI.
    pub fn from_inputs(
        temperature: &str,
        particle_count: &str,
        step_count: &str,
        magnetic_field: &str,
    ) -> PlasmaResult<Self> {
        Self::new(
            parse_field("Temperature (K)", temperature)?,
            parse_field("Number of particles", particle_count)?,
            parse_field("Number of steps", step_count)?,
            parse_field("Magnetic field B0 (T)", magnetic_field)?,
        )
    }

    /// Electron temperature (K).
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Field strength B0 (T).
    pub fn magnetic_field(&self) -> f64 {
        self.magnetic_field
    }
}

fn parse_field<T: std::str::FromStr>(label: &str, raw: &str) -> PlasmaResult<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SimulationError::invalid_input(format!("{label} is missing")));
    }
    trimmed
        .parse()
        .map_err(|_| SimulationError::invalid_input(format!("{label}: '{trimmed}' is not a valid number")))
}

// ===================================================================================
// Run Options
// ===================================================================================

/// How a run is executed. Does not affect the physics.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Fixed seed for a reproducible run; fresh entropy when `None`.
    pub seed: Option<u64>,
    /// Worker threads for the particle loop.
    pub threads: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            seed: None,
            threads: num_cpus::get_physical().max(1),
        }
    }
}

impl RunOptions {
    /// Defaults with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        RunOptions {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Defaults overridden by `PLASMA_SEED` and `PLASMA_THREADS`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Ok(raw) = env::var("PLASMA_SEED") {
            match raw.trim().parse() {
                Ok(seed) => opts.seed = Some(seed),
                Err(_) => warn!("ignoring PLASMA_SEED={raw:?}: not an unsigned integer"),
            }
        }
        if let Ok(raw) = env::var("PLASMA_THREADS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => opts.threads = n,
                _ => warn!("ignoring PLASMA_THREADS={raw:?}: not a positive integer"),
            }
        }
        opts
    }
}

// ===================================================================================
// Simulation Result
// ===================================================================================

/// Everything one run produced.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Inputs the run was made with.
    pub parameters: SimulationParameters,
    /// The four informational scalars.
    pub derived: DerivedQuantities,
    /// Seed the run was driven by; rerun with it to reproduce the result.
    pub seed: u64,
    /// Initial velocity of each particle.
    pub velocities: Vec<ParticleState>,
    /// One trajectory per particle, same order as `velocities`.
    pub trajectories: Vec<Trajectory>,
}

impl SimulationResult {
    /// `(v0x, v0y)` of every particle.
    pub fn velocity_distribution(&self) -> Vec<(f64, f64)> {
        self.velocities.iter().map(|p| (p.vx, p.vy)).collect()
    }

    /// Fresh draws of Normal(v_e, 1) through the inverse-transform sampler.
    pub fn gaussian_histogram_sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sample_count: usize,
    ) -> Result<Vec<f64>, DomainError> {
        gaussian_inverse_transform(rng, self.derived.thermal_velocity, 1.0, sample_count)
    }

    /// The draws above, binned for display.
    pub fn gaussian_histogram<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sample_count: usize,
        bins: usize,
    ) -> Result<Histogram, DomainError> {
        Histogram::density(&self.gaussian_histogram_sample(rng, sample_count)?, bins)
    }

    /// Mean per-step displacement of each particle.
    pub fn mean_displacements(&self) -> Vec<f64> {
        self.trajectories.iter().map(|t| t.mean_displacement).collect()
    }
}

/// Run a whole simulation: derived quantities, population, trajectories.
pub fn run_simulation(
    params: &SimulationParameters,
    constants: &PlasmaConstants,
    options: &RunOptions,
) -> PlasmaResult<SimulationResult> {
    run_simulation_with_cancel(params, constants, options, &CancelToken::new())
}

/// [`run_simulation`] that stops early once `cancel` is triggered.
pub fn run_simulation_with_cancel(
    params: &SimulationParameters,
    constants: &PlasmaConstants,
    options: &RunOptions,
    cancel: &CancelToken,
) -> PlasmaResult<SimulationResult> {
    let derived = DerivedQuantities::compute(params, constants)?;
    info!("derived quantities: {derived}");

    let seed = options.seed.unwrap_or_else(entropy_seed);
    let mut rng = seeded_rng(seed);
    let velocities = ensemble::initial_velocities(&mut rng, derived.thermal_velocity, params.particle_count)?;

    let settings = IntegratorSettings {
        collision_frequency: derived.collision_frequency,
        cyclotron_frequency: derived.cyclotron_frequency,
        steps: params.step_count,
        collision_angle_std_dev: constants.collision_angle_std_dev,
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.max(1))
        .build()?;
    let kick_seed = seed.wrapping_add(KICK_KEY_OFFSET);
    let trajectories = ensemble::run_ensemble(&pool, &velocities, &settings, kick_seed, cancel)?;

    info!(
        "simulated {} particles x {} steps (seed {seed})",
        params.particle_count, params.step_count
    );

    Ok(SimulationResult {
        parameters: params.clone(),
        derived,
        seed,
        velocities,
        trajectories,
    })
}

// ===================================================================================
// Session
// ===================================================================================

/// Holds the last successful run for the views that depend on it.
#[derive(Debug, Default)]
pub struct Session {
    constants: PlasmaConstants,
    options: RunOptions,
    last: Option<SimulationResult>,
    /// Histogram draws served so far; each one reads its own stream.
    histogram_draws: u64,
}

impl Session {
    /// Empty session; views fail until the first run.
    pub fn new(constants: PlasmaConstants, options: RunOptions) -> Self {
        Session {
            constants,
            options,
            last: None,
            histogram_draws: 0,
        }
    }

    /// Run and remember the result. A failed run keeps the previous result.
    pub fn run(&mut self, params: &SimulationParameters) -> PlasmaResult<&SimulationResult> {
        let result = run_simulation(params, &self.constants, &self.options)?;
        Ok(&*self.last.insert(result))
    }

    /// The last successful run, or `StateNotReady`.
    pub fn last_result(&self) -> PlasmaResult<&SimulationResult> {
        self.last.as_ref().ok_or(SimulationError::StateNotReady)
    }

    /// Initial velocities of the last run.
    pub fn velocity_distribution(&self) -> PlasmaResult<Vec<(f64, f64)>> {
        Ok(self.last_result()?.velocity_distribution())
    }

    /// Fresh Normal(v_e, 1) draws; every call gives a new sample.
    pub fn gaussian_histogram_sample(&mut self, sample_count: usize) -> PlasmaResult<Vec<f64>> {
        let mut rng = self.next_histogram_rng()?;
        Ok(self.last_result()?.gaussian_histogram_sample(&mut rng, sample_count)?)
    }

    /// Fresh draws as above, binned for display.
    pub fn gaussian_histogram(&mut self, sample_count: usize, bins: usize) -> PlasmaResult<Histogram> {
        let mut rng = self.next_histogram_rng()?;
        Ok(self.last_result()?.gaussian_histogram(&mut rng, sample_count, bins)?)
    }

    /// Generator keyed apart from the population (`seed`) and the kicks
    /// (`seed + 1`), on a stream not used by any earlier call.
    fn next_histogram_rng(&mut self) -> PlasmaResult<ChaCha8Rng> {
        let seed = self.last_result()?.seed;
        let mut rng = seeded_rng(seed.wrapping_add(HISTOGRAM_KEY_OFFSET));
        rng.set_stream(self.histogram_draws);
        self.histogram_draws += 1;
        Ok(rng)
    }
}
