//! Electron trajectories in a magnetized plasma.
//!
//! Electrons start at the origin with a thermal speed and a random direction,
//! drift by `v / ω_c` per step and get their velocity rotated by a small
//! Gaussian angle on every collision step. The GUI in `main.rs` only calls
//! [`run_simulation`] (usually through a [`Session`]) and plots what comes back.

pub mod constants;
pub mod ensemble;
pub mod error;
pub mod histogram;
pub mod physics;
pub mod sampling;
pub mod simulation;
pub mod trajectory;

pub use constants::PlasmaConstants;
pub use ensemble::{CancelToken, initial_velocities, run_ensemble};
pub use error::{DomainError, PlasmaResult, SimulationError};
pub use histogram::{Histogram, gaussian_pdf};
pub use physics::{DerivedQuantities, collision_frequency, cyclotron_frequency, larmor_radius, thermal_velocity};
pub use sampling::{gaussian_inverse_transform, seeded_rng, standard_normal, uniform_angle};
pub use simulation::{
    RunOptions, Session, SimulationParameters, SimulationResult, run_simulation, run_simulation_with_cancel,
};
pub use trajectory::{IntegratorSettings, ParticleState, Trajectory, integrate};
