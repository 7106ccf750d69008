//! Closed-form plasma quantities: thermal velocity, electron-ion collision
//! frequency, cyclotron frequency and Larmor radius.
//!
//! All functions are pure.

use std::f64::consts::PI;
use std::fmt;

use crate::constants::{MIN_CYCLOTRON_FREQUENCY, PlasmaConstants};
use crate::error::DomainError;
use crate::simulation::SimulationParameters;

/// `sqrt(3 kB T / m_e)` in m/s.
pub fn thermal_velocity(temperature: f64, boltzmann: f64, electron_mass: f64) -> Result<f64, DomainError> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(DomainError::InvalidTemperature(temperature));
    }
    let v = (3.0 * boltzmann * temperature / electron_mass).sqrt();
    if !v.is_finite() {
        return Err(DomainError::NonFinite("thermal velocity"));
    }
    Ok(v)
}

/// Electron-ion collision frequency
/// `(n_i Z² q⁴ lnΛ) / (4π v_e³ m_e² ε₀²)` in Hz.
pub fn collision_frequency(
    coulomb_log: f64,
    thermal_velocity: f64,
    constants: &PlasmaConstants,
) -> Result<f64, DomainError> {
    if !thermal_velocity.is_finite() || thermal_velocity <= 0.0 {
        return Err(DomainError::InvalidThermalVelocity(thermal_velocity));
    }
    let c = constants;
    let numerator = c.ion_density * c.charge_state.powi(2) * c.elementary_charge.powi(4) * coulomb_log;
    let denominator = 4.0
        * PI
        * thermal_velocity.powi(3)
        * c.electron_mass.powi(2)
        * c.vacuum_permittivity.powi(2);
    let vei = numerator / denominator;
    if !vei.is_finite() {
        return Err(DomainError::NonFinite("collision frequency"));
    }
    Ok(vei)
}

/// `q B / m` in rad/s.
pub fn cyclotron_frequency(charge: f64, magnetic_field: f64, mass: f64) -> Result<f64, DomainError> {
    if !magnetic_field.is_finite() || magnetic_field == 0.0 {
        return Err(DomainError::InvalidMagneticField(magnetic_field));
    }
    let omega = charge * magnetic_field / mass;
    if !omega.is_finite() || omega.abs() <= MIN_CYCLOTRON_FREQUENCY {
        return Err(DomainError::InvalidCyclotronFrequency(omega));
    }
    Ok(omega)
}

/// `v_e / ω_c` in m.
pub fn larmor_radius(thermal_velocity: f64, cyclotron_frequency: f64) -> Result<f64, DomainError> {
    if !cyclotron_frequency.is_finite() || cyclotron_frequency.abs() <= MIN_CYCLOTRON_FREQUENCY {
        return Err(DomainError::InvalidCyclotronFrequency(cyclotron_frequency));
    }
    Ok(thermal_velocity / cyclotron_frequency)
}

/// The four scalars derived from one set of run parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedQuantities {
    /// v_e (m/s).
    pub thermal_velocity: f64,
    /// vei (Hz).
    pub collision_frequency: f64,
    /// ω_c (rad/s).
    pub cyclotron_frequency: f64,
    /// r_L (m).
    pub larmor_radius: f64,
}

impl DerivedQuantities {
    /// Evaluate all four formulas for one run.
    pub fn compute(params: &SimulationParameters, constants: &PlasmaConstants) -> Result<Self, DomainError> {
        let ve = thermal_velocity(
            params.temperature(),
            constants.boltzmann,
            constants.thermal_electron_mass,
        )?;
        let vei = collision_frequency(constants.coulomb_log, ve, constants)?;
        let omega_c = cyclotron_frequency(
            constants.elementary_charge,
            params.magnetic_field(),
            constants.electron_mass,
        )?;
        let r_l = larmor_radius(ve, omega_c)?;

        Ok(DerivedQuantities {
            thermal_velocity: ve,
            collision_frequency: vei,
            cyclotron_frequency: omega_c,
            larmor_radius: r_l,
        })
    }

    /// `vei = 1.126e4 Hz`
    pub fn collision_frequency_label(&self) -> String {
        format!("vei = {:.3e} Hz", self.collision_frequency)
    }

    /// `ω_c = 5.97e11 rad/s`
    pub fn cyclotron_frequency_label(&self) -> String {
        format!("ω_c = {:.2e} rad/s", self.cyclotron_frequency)
    }

    /// `r_L = 3.85e-5 m`
    pub fn larmor_radius_label(&self) -> String {
        format!("r_L = {:.2e} m", self.larmor_radius)
    }
}

impl fmt::Display for DerivedQuantities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v_e = {:.3e} m/s, {}, {}, {}",
            self.thermal_velocity,
            self.collision_frequency_label(),
            self.cyclotron_frequency_label(),
            self.larmor_radius_label()
        )
    }
}
