// tests/tuning_tests.rs

use qcond::{
    Operator, OperatorBuilder, Pauli, QcondError, SearchStatus, SweepMode, Tunable, Tuner, TunerSettings,
    linear_targets,
};

// A = c*I + Z: kappa(c) = (c + 1) / (c - 1) for c > 1, reaching every target above 1.
fn shifted_z() -> Result<Operator, QcondError> {
    OperatorBuilder::new(1).add_term(1.0, "Z".parse()?).offset(5.0).build()
}

// 10 * (Y on every site) + 1 * (XX on every adjacent pair), identity offset left free.
fn four_qubit_chain() -> Result<Operator, QcondError> {
    let mut builder = OperatorBuilder::new(4);
    for site in 0..4 {
        builder = builder.add_local(10.0, &[(site, Pauli::Y)]);
    }
    for site in 0..3 {
        builder = builder.add_local(1.0, &[(site, Pauli::X), (site + 1, Pauli::X)]);
    }
    builder.build()
}

#[test]
fn test_four_qubit_offset_sweep() -> Result<(), QcondError> {
    let base = four_qubit_chain()?;
    // Above -lambda_min the shifted operator is positive definite and its
    // condition number falls monotonically as the offset grows.
    let (lambda_min, lambda_max) = base.spectral_range();
    println!("spectrum of the chain: [{}, {}]", lambda_min, lambda_max);
    assert!(lambda_min < -40.0 && lambda_max > 40.0);

    let settings = TunerSettings {
        tolerance: 0.1,
        initial_step: 1.0,
        min_step: 1e-8,
        max_iterations: 10_000,
        lower_bound: Some(-lambda_min),
        ..TunerSettings::default()
    };
    let tuner = Tuner::new(base, Tunable::Offset)?
        .with_initial_value(60.0)
        .with_settings(settings);

    let targets = linear_targets(10.0, 200.0, 10.0);
    let results = tuner.sweep(&targets, SweepMode::Fresh)?;
    assert_eq!(results.len(), 20);

    for (result, target) in results.iter().zip(&targets) {
        println!("{}", result);
        assert_eq!(result.target, *target);
        assert!(result.converged, "target {} did not converge", target);
        assert!(result.error() <= 0.1);
        assert_eq!(result.operator.offset(), result.achieved_coefficient);
        assert!(result.operator.is_hermitian(1e-12));
    }
    for pair in results.windows(2) {
        assert!(
            pair[1].achieved_coefficient < pair[0].achieved_coefficient,
            "offset should fall as the target rises: {} then {}",
            pair[0],
            pair[1]
        );
    }
    Ok(())
}

#[test]
fn test_converges_on_reachable_targets() -> Result<(), QcondError> {
    let settings = TunerSettings {
        tolerance: 1e-3,
        min_step: 1e-9,
        lower_bound: Some(1.0),
        ..TunerSettings::default()
    };
    let tuner = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings);
    for target in [1.2, 2.0, 3.0, 7.5, 40.0] {
        let result = tuner.tune(target)?;
        assert!(result.converged, "target {} did not converge: {}", target, result);
        assert!((result.achieved_condition_number - target).abs() <= 1e-3);
        // Invert kappa(c) analytically to check the coefficient too.
        let expected = (target + 1.0) / (target - 1.0);
        assert!(
            (result.achieved_coefficient - expected).abs() < 1e-2,
            "target {}: coefficient {} vs {}",
            target,
            result.achieved_coefficient,
            expected
        );
    }
    Ok(())
}

#[test]
fn test_tunes_a_term_coefficient() -> Result<(), QcondError> {
    // 0.225 * IZI + c * IIZ + 0.55: kappa = 21 at c = 0.275.
    let base = OperatorBuilder::new(3)
        .add_term(0.225, "IZI".parse()?)
        .add_term(0.2, "IIZ".parse()?)
        .offset(0.55)
        .build()?;
    let settings = TunerSettings {
        initial_step: 0.01,
        tolerance: 0.05,
        min_step: 1e-9,
        lower_bound: Some(0.0),
        upper_bound: Some(0.32),
        ..TunerSettings::default()
    };
    let result = Tuner::new(base, Tunable::Term(1))?.with_settings(settings).tune(21.0)?;
    assert!(result.converged, "{}", result);
    assert!((result.achieved_coefficient - 0.275).abs() < 1e-3);
    assert_eq!(result.operator.terms()[1].coefficient, result.achieved_coefficient);
    Ok(())
}

#[test]
fn test_unreachable_target_stops_at_iteration_budget() -> Result<(), QcondError> {
    // kappa >= 1 always; every step upward still improves, so only the budget stops it.
    let settings = TunerSettings { max_iterations: 200, ..TunerSettings::default() };
    let result = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings).tune(0.5)?;
    assert!(!result.converged);
    assert_eq!(result.iterations, 200);
    assert!(result.achieved_coefficient > 5.0);
    Ok(())
}

#[test]
fn test_unreachable_target_stops_at_step_floor() -> Result<(), QcondError> {
    let settings = TunerSettings {
        upper_bound: Some(10.0),
        min_step: 1e-3,
        ..TunerSettings::default()
    };
    let result = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings.clone()).tune(0.5)?;
    assert!(!result.converged);
    assert!(result.iterations < settings.max_iterations);
    assert!(result.final_step < settings.min_step);
    assert_eq!(result.achieved_coefficient, 10.0);
    Ok(())
}

#[test]
fn test_failed_target_does_not_halt_sweep() -> Result<(), QcondError> {
    let settings = TunerSettings {
        tolerance: 1e-3,
        min_step: 1e-9,
        lower_bound: Some(1.0),
        upper_bound: Some(10.0),
        ..TunerSettings::default()
    };
    let tuner = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings);
    let results = tuner.sweep(&[3.0, 0.5, 5.0], SweepMode::Fresh)?;
    let converged: Vec<bool> = results.iter().map(|r| r.converged).collect();
    assert_eq!(converged, vec![true, false, true]);
    Ok(())
}

#[test]
fn test_search_is_deterministic() -> Result<(), QcondError> {
    let tuner = Tuner::new(four_qubit_chain()?, Tunable::Offset)?.with_initial_value(55.0);
    let first = tuner.tune(25.0)?;
    let second = tuner.tune(25.0)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_sweep_is_lazy() -> Result<(), QcondError> {
    let settings = TunerSettings { lower_bound: Some(1.0), ..TunerSettings::default() };
    let tuner = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings);
    // An unbounded target stream: only the items pulled are ever tuned.
    let results = tuner
        .sweep_iter((1..).map(|k| 1.0 + k as f64), SweepMode::CarryForward)
        .take(3)
        .collect::<Result<Vec<_>, _>>()?;
    let targets: Vec<f64> = results.iter().map(|r| r.target).collect();
    assert_eq!(targets, vec![2.0, 3.0, 4.0]);
    assert!(results.iter().all(|r| r.converged));
    Ok(())
}

#[test]
fn test_manual_stepping_respects_caller_budget() -> Result<(), QcondError> {
    let tuner = Tuner::new(shifted_z()?, Tunable::Offset)?;
    let mut search = tuner.search(0.5)?;
    for _ in 0..10 {
        assert_eq!(search.step()?, SearchStatus::Searching);
    }
    assert_eq!(search.state().iterations(), 10);
    let result = search.finish();
    assert!(!result.converged);
    assert_eq!(result.iterations, 10);
    Ok(())
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_sweep_matches_sequential() -> Result<(), QcondError> {
    let settings = TunerSettings { tolerance: 1e-3, min_step: 1e-9, lower_bound: Some(1.0), ..TunerSettings::default() };
    let tuner = Tuner::new(shifted_z()?, Tunable::Offset)?.with_settings(settings);
    let targets = linear_targets(2.0, 20.0, 2.0);
    assert_eq!(tuner.sweep_par(&targets)?, tuner.sweep(&targets, SweepMode::Fresh)?);
    Ok(())
}
