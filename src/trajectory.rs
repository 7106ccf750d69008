//! Single-particle trajectory under cyclotron rotation with periodic
//! collision kicks.

use log::debug;
use rand::Rng;

use crate::constants::MIN_CYCLOTRON_FREQUENCY;
use crate::error::DomainError;
use crate::sampling::gaussian_inverse_transform;

/// Initial velocity of one particle (m/s).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleState {
    /// Velocity along x.
    pub vx: f64,
    /// Velocity along y.
    pub vy: f64,
}

impl ParticleState {
    /// State from velocity components.
    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    /// Magnitude of the velocity.
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

/// Positions of one particle, stored as separate x and y arrays so they can
/// be handed to a plot directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// x-coordinate per step, `x[0] == 0`.
    pub x: Vec<f64>,
    /// y-coordinate per step, `y[0] == 0`.
    pub y: Vec<f64>,
    /// Distance between consecutive positions, one shorter than `x`.
    pub displacements: Vec<f64>,
    /// Mean of `displacements`.
    pub mean_displacement: f64,
}

impl Trajectory {
    /// Number of positions (the run's step count).
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True only for a trajectory built by hand with no positions.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Inputs shared by every particle of a run.
#[derive(Clone, Copy, Debug)]
pub struct IntegratorSettings {
    /// Electron-ion collision frequency vei (Hz).
    pub collision_frequency: f64,
    /// ω_c (rad/s); each step moves by `v / ω_c`.
    pub cyclotron_frequency: f64,
    /// Positions per trajectory, origin included.
    pub steps: usize,
    /// Spread of the kick angle (rad).
    pub collision_angle_std_dev: f64,
}

/// Number of steps between collision kicks, `floor(tau_c / dt)`.
///
/// Both the step interval and the collision time are `1 / vei`, so this is
/// always 1 and every step carries a kick.
pub fn collision_period_steps(collision_frequency: f64) -> Result<usize, DomainError> {
    if !collision_frequency.is_finite() || collision_frequency <= 0.0 {
        return Err(DomainError::InvalidCollisionFrequency(collision_frequency));
    }
    let dt = 1.0 / collision_frequency;
    let tau_c = 1.0 / collision_frequency;
    let period = (tau_c / dt).floor();
    if !period.is_finite() || period < 1.0 {
        return Err(DomainError::ZeroCollisionPeriod);
    }
    Ok(period as usize)
}

/// Rotate `(vx, vy)` by `angle` radians.
pub fn rotate(vx: f64, vy: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (vx * cos - vy * sin, vx * sin + vy * cos)
}

/// Check the settings once, before any particle is integrated.
/// Returns the collision period in steps.
pub fn validate(settings: &IntegratorSettings) -> Result<usize, DomainError> {
    if settings.steps < 2 {
        return Err(DomainError::TooFewSteps(settings.steps));
    }
    let omega_c = settings.cyclotron_frequency;
    if !omega_c.is_finite() || omega_c.abs() <= MIN_CYCLOTRON_FREQUENCY {
        return Err(DomainError::InvalidCyclotronFrequency(omega_c));
    }
    let std_dev = settings.collision_angle_std_dev;
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(DomainError::InvalidGaussian { mean: 0.0, std_dev });
    }
    collision_period_steps(settings.collision_frequency)
}

/// Advance one particle from the origin for `settings.steps` positions.
///
/// Each step moves the particle by `v / ω_c`; on collision steps the
/// velocity is first rotated by a Gaussian angle.
pub fn integrate<R: Rng + ?Sized>(
    rng: &mut R,
    initial: ParticleState,
    settings: &IntegratorSettings,
) -> Result<Trajectory, DomainError> {
    let period = validate(settings)?;
    let steps = settings.steps;
    let omega_c = settings.cyclotron_frequency;

    let mut x = vec![0.0; steps];
    let mut y = vec![0.0; steps];
    let mut displacements = Vec::with_capacity(steps - 1);
    let (mut vx, mut vy) = (initial.vx, initial.vy);

    for i in 1..steps {
        if i % period == 0 {
            let dtheta = gaussian_inverse_transform(rng, 0.0, settings.collision_angle_std_dev, 1)?[0];
            (vx, vy) = rotate(vx, vy, dtheta);
        }

        x[i] = x[i - 1] + vx / omega_c;
        y[i] = y[i - 1] + vy / omega_c;
        displacements.push((x[i] - x[i - 1]).hypot(y[i] - y[i - 1]));
    }

    let mean_displacement = displacements.iter().sum::<f64>() / displacements.len() as f64;
    if !mean_displacement.is_finite() {
        debug!("non-finite displacement for initial velocity {initial:?}");
        return Err(DomainError::NonFinite("trajectory displacement"));
    }

    Ok(Trajectory {
        x,
        y,
        displacements,
        mean_displacement,
    })
}
