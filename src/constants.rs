//! Physical constants and the default knobs of a run.
//!
//! The collision and cyclotron formulas use the rounded electron mass and
//! charge (`9.11e-31`, `1.6e-19`); the thermal velocity uses the more precise
//! mass. Both are kept so the derived quantities match the closed forms.

// ===================================================================================
// Physical constants (SI)
// ===================================================================================

/// Boltzmann constant (J/K).
pub const K_BOLTZMANN: f64 = 1.380649e-23;

/// Electron mass used for the thermal velocity (kg).
pub const M_ELECTRON: f64 = 9.10938e-31;

/// Rounded electron mass used by the collision and cyclotron formulas (kg).
pub const M_ELECTRON_ROUNDED: f64 = 9.11e-31;

/// Rounded elementary charge (C).
pub const Q_ELECTRON: f64 = 1.6e-19;

/// Vacuum permittivity (F/m).
pub const EPSILON_0: f64 = 8.85e-12;

/// Ion density (m^-3).
pub const ION_DENSITY: f64 = 1e19;

/// Ion charge state Z.
pub const CHARGE_STATE: f64 = 1.0;

/// Coulomb logarithm, held fixed.
pub const COULOMB_LOG: f64 = 17.0;

/// Standard deviation of the collision kick angle (rad).
pub const COLLISION_ANGLE_STD_DEV: f64 = 0.1;

// ===================================================================================
// Default run parameters (the values pre-filled in the GUI)
// ===================================================================================

pub const DEFAULT_TEMPERATURE: f64 = 1.16e7;
pub const DEFAULT_NUM_PARTICLES: usize = 10_000;
pub const DEFAULT_NUM_STEPS: usize = 100;
pub const DEFAULT_MAGNETIC_FIELD: f64 = 3.4;

/// Draws for the inverse-transform histogram view.
pub const DEFAULT_HISTOGRAM_SAMPLES: usize = 1_000_000;
/// Bins for the inverse-transform histogram view.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Cyclotron frequencies at or below this magnitude are treated as zero.
pub const MIN_CYCLOTRON_FREQUENCY: f64 = 1e-300;

/// Physical constants entering the formulas, with the documented defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct PlasmaConstants {
    pub boltzmann: f64,
    /// Mass entering `sqrt(3 kB T / m)`.
    pub thermal_electron_mass: f64,
    /// Mass entering the collision and cyclotron frequencies.
    pub electron_mass: f64,
    pub elementary_charge: f64,
    pub ion_density: f64,
    pub charge_state: f64,
    pub vacuum_permittivity: f64,
    pub coulomb_log: f64,
    pub collision_angle_std_dev: f64,
}

impl Default for PlasmaConstants {
    fn default() -> Self {
        PlasmaConstants {
            boltzmann: K_BOLTZMANN,
            thermal_electron_mass: M_ELECTRON,
            electron_mass: M_ELECTRON_ROUNDED,
            elementary_charge: Q_ELECTRON,
            ion_density: ION_DENSITY,
            charge_state: CHARGE_STATE,
            vacuum_permittivity: EPSILON_0,
            coulomb_log: COULOMB_LOG,
            collision_angle_std_dev: COLLISION_ANGLE_STD_DEV,
        }
    }
}
