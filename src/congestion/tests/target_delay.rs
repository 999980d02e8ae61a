//! DelayTargetEstimator 测试
//! Tests for DelayTargetEstimator

use crate::config::Config;
use crate::congestion::target_delay::DelayTargetEstimator;
use crate::error::Error;
use std::time::Duration;

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[test]
fn test_coefficients_derived_from_bounds() {
    let estimator = DelayTargetEstimator::new(&Config::default()).unwrap();

    let expected_alpha = 2.0 / (1.0 - 1.0 / 100_000f64.sqrt());
    assert!((estimator.alpha_coefficient() - expected_alpha).abs() < 1e-12);
    assert!((estimator.beta() + expected_alpha / 100_000f64.sqrt()).abs() < 1e-12);
    assert!(estimator.beta() < 0.0);
}

#[test]
fn test_target_at_minimum_window() {
    let estimator = DelayTargetEstimator::new(&Config::default()).unwrap();
    let target = ms(estimator.target_delay(1.0).unwrap());

    // 4ms fixed part plus 1/sqrt(1) + beta
    let expected = 4.0 + 1.0 + estimator.beta();
    assert!((target - expected).abs() < 1e-5, "target {}", target);
}

#[test]
fn test_fairness_term_clamped_at_zero_for_large_windows() {
    let estimator = DelayTargetEstimator::new(&Config::default()).unwrap();
    let target = ms(estimator.target_delay(100_000.0).unwrap());
    assert!((target - 4.0).abs() < 1e-5);
}

#[test]
fn test_fairness_term_clamped_at_range() {
    let config = Config {
        min_window: 0.01,
        max_window: 1.0e6,
        fairness_scaling_range: 0.5,
        ..Default::default()
    };
    let estimator = DelayTargetEstimator::new(&config).unwrap();
    // 1/sqrt(0.01) = 10, far above the 0.5 range.
    let target = ms(estimator.target_delay(0.01).unwrap());
    assert!((target - 4.5).abs() < 1e-5);
}

#[test]
fn test_target_shrinks_as_window_grows() {
    let estimator = DelayTargetEstimator::new(&Config::default()).unwrap();
    let mut last = f64::MAX;
    for window in [1.0, 2.0, 10.0, 100.0, 1000.0, 10_000.0] {
        let target = ms(estimator.target_delay(window).unwrap());
        assert!(target <= last);
        last = target;
    }
}

#[test]
fn test_non_positive_window_rejected() {
    let estimator = DelayTargetEstimator::new(&Config::default()).unwrap();
    for window in [0.0, -3.0, f64::NAN] {
        assert!(matches!(
            estimator.target_delay(window),
            Err(Error::Precondition(_))
        ));
    }
}

#[test]
fn test_invalid_bounds_rejected() {
    let config = Config {
        min_window: 50.0,
        max_window: 10.0,
        ..Default::default()
    };
    assert!(matches!(
        DelayTargetEstimator::new(&config),
        Err(Error::Configuration { .. })
    ));

    let config = Config {
        min_window: 0.0,
        ..Default::default()
    };
    assert!(DelayTargetEstimator::new(&config).is_err());
}

#[test]
fn test_constructor_runs_domain_checks() {
    let cases = [
        Config { fairness_scaling_range: -1.0, ..Default::default() },
        Config { max_window: f64::NAN, ..Default::default() },
        Config { max_window: f64::INFINITY, ..Default::default() },
        Config { base_delay: Duration::MAX, ..Default::default() },
    ];
    for config in cases {
        assert!(
            matches!(DelayTargetEstimator::new(&config), Err(Error::Configuration { .. })),
            "accepted {:?}",
            config
        );
    }
}

#[test]
fn test_large_delay_stays_representable() {
    let config = Config {
        base_delay: Duration::from_secs(86_400),
        hop_count: 10_000,
        hop_delay_scale: Duration::from_secs(60),
        ..Default::default()
    };
    let estimator = DelayTargetEstimator::new(&config).unwrap();
    let target = estimator.target_delay(1.0).unwrap();
    assert!(target > Duration::from_secs(86_400 + 600_000));
}
