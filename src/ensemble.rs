//! Population generation and the per-particle integration loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use rand::Rng;
use rayon::prelude::*;

use crate::error::{DomainError, PlasmaResult, SimulationError};
use crate::sampling::{gaussian_inverse_transform, seeded_rng, uniform_angle};
use crate::trajectory::{self, IntegratorSettings, ParticleState, Trajectory};

/// Initial velocities: speed ~ Normal(v_e, 1), direction uniform in (-π, π].
pub fn initial_velocities<R: Rng + ?Sized>(
    rng: &mut R,
    thermal_velocity: f64,
    n: usize,
) -> Result<Vec<ParticleState>, DomainError> {
    let speeds = gaussian_inverse_transform(rng, thermal_velocity, 1.0, n)?;
    let angles = uniform_angle(rng, n);
    Ok(speeds
        .into_iter()
        .zip(angles)
        .map(|(v, angle)| ParticleState::new(v * angle.cos(), v * angle.sin()))
        .collect())
}

/// Shared flag that stops a running ensemble between particles.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every run holding a clone to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Integrate every particle of the population.
///
/// Particle `i` draws its collision kicks from stream `i` of the ChaCha8
/// generator seeded with `seed`, so the output depends only on the seed and
/// never on how rayon splits the work. Results keep the population order.
pub fn run_ensemble(
    pool: &rayon::ThreadPool,
    population: &[ParticleState],
    settings: &IntegratorSettings,
    seed: u64,
    cancel: &CancelToken,
) -> PlasmaResult<Vec<Trajectory>> {
    // Reject bad settings once instead of once per particle.
    let period = trajectory::validate(settings)?;
    debug!(
        "integrating {} particles x {} steps on {} threads, collision every {} step(s)",
        population.len(),
        settings.steps,
        pool.current_num_threads(),
        period
    );

    pool.install(|| {
        population
            .par_iter()
            .enumerate()
            .map(|(i, &particle)| {
                if cancel.is_cancelled() {
                    return Err(SimulationError::Cancelled);
                }
                let mut rng = seeded_rng(seed);
                rng.set_stream(i as u64);
                Ok(trajectory::integrate(&mut rng, particle, settings)?)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(threads: usize) -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap()
    }

    fn settings() -> IntegratorSettings {
        IntegratorSettings {
            collision_frequency: 2.5e3,
            cyclotron_frequency: 5.97e11,
            steps: 40,
            collision_angle_std_dev: 0.1,
        }
    }

    #[test]
    fn velocities_have_thermal_speed() {
        let mut rng = seeded_rng(12);
        let ve = 2.3e7;
        let pop = initial_velocities(&mut rng, ve, 1000).unwrap();
        assert_eq!(pop.len(), 1000);
        // spread of 1 m/s around v_e
        assert!(pop.iter().all(|p| (p.speed() - ve).abs() < 10.0));
    }

    #[test]
    fn results_do_not_depend_on_thread_count() {
        let mut rng = seeded_rng(5);
        let pop = initial_velocities(&mut rng, 1.0e7, 64).unwrap();
        let cancel = CancelToken::new();
        let one = run_ensemble(&pool(1), &pop, &settings(), 77, &cancel).unwrap();
        let four = run_ensemble(&pool(4), &pop, &settings(), 77, &cancel).unwrap();
        assert_eq!(one, four);
        assert_eq!(one.len(), 64);
    }

    #[test]
    fn different_particles_get_different_kicks() {
        let pop = vec![ParticleState::new(1.0e7, 0.0); 2];
        let out = run_ensemble(&pool(2), &pop, &settings(), 1, &CancelToken::new()).unwrap();
        assert_ne!(out[0].y, out[1].y);
    }

    #[test]
    fn cancelled_run_reports_cancellation() {
        let pop = vec![ParticleState::new(1.0e7, 0.0); 8];
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = run_ensemble(&pool(2), &pop, &settings(), 1, &cancel).unwrap_err();
        assert!(matches!(err, SimulationError::Cancelled));
    }

    #[test]
    fn bad_settings_are_input_errors() {
        let pop = vec![ParticleState::new(1.0e7, 0.0)];
        let s = IntegratorSettings {
            cyclotron_frequency: 0.0,
            ..settings()
        };
        let err = run_ensemble(&pool(1), &pop, &s, 1, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, SimulationError::InputValidation { cause: Some(_), .. }));
    }
}
