use plasma_trajectories::constants::*;
use plasma_trajectories::*;

/// Parameters of the reference scenario with a given particle count.
fn reference_params(particles: usize) -> SimulationParameters {
    SimulationParameters::new(1.16e7, particles, 100, 3.4).unwrap()
}

fn rel_close(a: f64, b: f64) -> bool {
    ((a - b) / b).abs() < 1e-9
}

// ==================================================================================
// Reference scenario
// ==================================================================================

#[test]
fn reference_scenario_matches_closed_forms() {
    let result = run_simulation(&reference_params(1), &PlasmaConstants::default(), &RunOptions::with_seed(1)).unwrap();
    let d = result.derived;

    let ve = (3.0 * K_BOLTZMANN * 1.16e7 / M_ELECTRON).sqrt();
    let vei = (ION_DENSITY * CHARGE_STATE.powi(2) * Q_ELECTRON.powi(4) * COULOMB_LOG)
        / (4.0 * std::f64::consts::PI * ve.powi(3) * M_ELECTRON_ROUNDED.powi(2) * EPSILON_0.powi(2));
    let omega_c = Q_ELECTRON * 3.4 / M_ELECTRON_ROUNDED;

    assert!(rel_close(d.thermal_velocity, ve));
    assert!(rel_close(d.collision_frequency, vei));
    assert!(rel_close(d.cyclotron_frequency, omega_c));
    assert!(rel_close(d.larmor_radius, ve / omega_c));
}

#[test]
fn every_trajectory_has_step_count_positions_from_origin() {
    let params = SimulationParameters::new(5.0e6, 25, 37, 2.0).unwrap();
    let result = run_simulation(&params, &PlasmaConstants::default(), &RunOptions::with_seed(8)).unwrap();

    assert_eq!(result.trajectories.len(), 25);
    assert_eq!(result.velocities.len(), 25);
    for t in &result.trajectories {
        assert_eq!(t.x.len(), 37);
        assert_eq!(t.y.len(), 37);
        assert_eq!(t.displacements.len(), 36);
        assert_eq!((t.x[0], t.y[0]), (0.0, 0.0));
        assert!(t.mean_displacement > 0.0);
    }
}

#[test]
fn mean_displacement_is_thermal_speed_over_omega() {
    let result = run_simulation(&reference_params(10), &PlasmaConstants::default(), &RunOptions::with_seed(4)).unwrap();
    let expected = result.derived.larmor_radius;
    for d in result.mean_displacements() {
        // speeds spread by 1 m/s around v_e
        assert!(((d - expected) / expected).abs() < 1e-6);
    }
}

// ==================================================================================
// Reproducibility
// ==================================================================================

#[test]
fn same_seed_same_run_regardless_of_threads() {
    let params = reference_params(40);
    let constants = PlasmaConstants::default();
    let single = RunOptions {
        seed: Some(99),
        threads: 1,
    };
    let many = RunOptions {
        seed: Some(99),
        threads: 3,
    };
    let a = run_simulation(&params, &constants, &single).unwrap();
    let b = run_simulation(&params, &constants, &many).unwrap();
    assert_eq!(a.velocities, b.velocities);
    assert_eq!(a.trajectories, b.trajectories);
    assert_eq!(a.seed, 99);
}

#[test]
fn different_seeds_differ() {
    let params = reference_params(3);
    let constants = PlasmaConstants::default();
    let a = run_simulation(&params, &constants, &RunOptions::with_seed(1)).unwrap();
    let b = run_simulation(&params, &constants, &RunOptions::with_seed(2)).unwrap();
    assert_ne!(a.velocities, b.velocities);
}

// ==================================================================================
// Validation and errors
// ==================================================================================

#[test]
fn zero_particles_is_an_input_error() {
    let err = SimulationParameters::new(1.16e7, 0, 100, 3.4).unwrap_err();
    assert!(matches!(err, SimulationError::InputValidation { .. }));
}

#[test]
fn zero_field_is_an_input_error() {
    let err = SimulationParameters::from_inputs("1.16e7", "1", "100", "0.0").unwrap_err();
    assert!(matches!(err, SimulationError::InputValidation { .. }));
}

#[test]
fn domain_errors_surface_as_input_errors_with_cause() {
    // valid parameters, but a zero electron mass makes the thermal velocity infinite
    let constants = PlasmaConstants {
        thermal_electron_mass: 0.0,
        ..PlasmaConstants::default()
    };
    let err = run_simulation(&reference_params(1), &constants, &RunOptions::with_seed(1)).unwrap_err();
    match err {
        SimulationError::InputValidation { cause, .. } => {
            assert_eq!(cause, Some(DomainError::NonFinite("thermal velocity")))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cancelled_run_returns_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = run_simulation_with_cancel(
        &reference_params(10),
        &PlasmaConstants::default(),
        &RunOptions::with_seed(1),
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, SimulationError::Cancelled));
}

// ==================================================================================
// Views
// ==================================================================================

#[test]
fn velocity_distribution_matches_population() {
    let result = run_simulation(&reference_params(12), &PlasmaConstants::default(), &RunOptions::with_seed(6)).unwrap();
    let dist = result.velocity_distribution();
    assert_eq!(dist.len(), 12);
    for ((vx, vy), p) in dist.iter().zip(&result.velocities) {
        assert_eq!((*vx, *vy), (p.vx, p.vy));
    }
}

#[test]
fn gaussian_histogram_sample_is_centred_on_thermal_velocity() {
    let result = run_simulation(&reference_params(1), &PlasmaConstants::default(), &RunOptions::with_seed(6)).unwrap();
    let mut rng = seeded_rng(10);
    let xs = result.gaussian_histogram_sample(&mut rng, DEFAULT_HISTOGRAM_SAMPLES).unwrap();
    assert_eq!(xs.len(), 1_000_000);
    let mean = xs.iter().sum::<f64>() / xs.len() as f64;
    assert!((mean - result.derived.thermal_velocity).abs() < 0.01);
}

#[test]
fn session_reports_state_not_ready_then_serves_views() {
    let mut session = Session::new(PlasmaConstants::default(), RunOptions::with_seed(2));
    assert!(matches!(session.velocity_distribution(), Err(SimulationError::StateNotReady)));
    assert!(matches!(session.gaussian_histogram(100, 5), Err(SimulationError::StateNotReady)));

    session.run(&reference_params(5)).unwrap();
    assert_eq!(session.velocity_distribution().unwrap().len(), 5);
    assert_eq!(session.gaussian_histogram_sample(1000).unwrap().len(), 1000);
}

#[test]
fn failed_run_keeps_previous_result() {
    let mut session = Session::new(PlasmaConstants::default(), RunOptions::with_seed(2));
    session.run(&reference_params(3)).unwrap();

    // non-zero field whose cyclotron frequency underflows to zero
    let tiny_field = SimulationParameters::new(1.16e7, 7, 100, 1e-310).unwrap();
    let err = session.run(&tiny_field).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::InputValidation {
            cause: Some(DomainError::InvalidCyclotronFrequency(_)),
            ..
        }
    ));
    assert_eq!(session.last_result().unwrap().velocities.len(), 3);
}
