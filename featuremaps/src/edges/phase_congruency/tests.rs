use std::num::NonZeroUsize;

use super::*;
use crate::testing::{init_tracing, vertical_step};

fn compute(image: &Array2<f64>, config: &PhaseCongruencyConfig) -> PhaseCongruency {
    LogGaborPhaseCongruency::default()
        .compute(image.view(), config)
        .unwrap()
}

#[test]
fn test_output_shapes() {
    let image = vertical_step(24, 32);
    let config = PhaseCongruencyConfig {
        nscale: 3,
        norient: 4,
        ..Default::default()
    };
    let result = compute(&image, &config);

    for map in [
        &result.max_moment,
        &result.min_moment,
        &result.orientation,
        &result.feature_type,
    ] {
        assert_eq!(map.dim(), (24, 32));
    }
    assert_eq!(result.pc.len(), 4);
    assert_eq!(result.eo.len(), 4);
    for per_scale in &result.eo {
        assert_eq!(per_scale.len(), 3);
        assert!(per_scale.iter().all(|eo| eo.dim() == (24, 32)));
    }
}

#[test]
fn test_step_edge_has_high_maximum_moment() {
    init_tracing();
    let image = vertical_step(64, 64);
    let result = compute(&image, &PhaseCongruencyConfig::default());

    let row = result.max_moment.row(32);
    let at_edge = row.iter().skip(30).take(4).copied().fold(0.0, f64::max);
    let far = row[16];
    assert!(at_edge > 0.2, "edge response {at_edge}");
    assert!(at_edge > far, "edge {at_edge} vs plateau {far}");
}

#[test]
fn test_moments_are_ordered() {
    let image = Array2::from_shape_fn((20, 20), |(y, x)| {
        if (5..15).contains(&y) && (5..15).contains(&x) {
            1.0
        } else {
            0.0
        }
    });
    let result = compute(&image, &PhaseCongruencyConfig::default());
    Zip::from(&result.max_moment)
        .and(&result.min_moment)
        .for_each(|&max, &min| assert!(max >= min));
    assert!(result
        .orientation
        .iter()
        .all(|&deg| (0.0..180.0).contains(&deg)));
    assert!(result
        .pc
        .iter()
        .flat_map(|pc| pc.iter())
        .all(|&v| v.is_finite() && v >= 0.0));
}

#[test]
fn test_diagonal_edge_orientation_is_anticlockwise() {
    let config = PhaseCongruencyConfig {
        norient: 8,
        ..Default::default()
    };
    // Bright above the main diagonal: the edge runs from top-left to
    // bottom-right, a vertical edge turned 45 degrees anticlockwise.
    let falling = Array2::from_shape_fn((64, 64), |(y, x)| f64::from(u8::from(x > y)));
    // Bright below the anti-diagonal: the mirrored edge.
    let rising = Array2::from_shape_fn((64, 64), |(y, x)| f64::from(u8::from(x + y > 63)));

    let falling = compute(&falling, &config);
    let rising = compute(&rising, &config);
    for x in [32, 33] {
        let deg = falling.orientation[[32, x]];
        assert!((30.0..60.0).contains(&deg), "falling edge at (32, {x}): {deg}");
    }
    for x in [31, 32] {
        let deg = rising.orientation[[32, x]];
        assert!((120.0..150.0).contains(&deg), "rising edge at (32, {x}): {deg}");
    }
}

#[test]
fn test_constant_image_has_no_response() {
    let image = Array2::from_elem((16, 16), 7.0);
    let result = compute(&image, &PhaseCongruencyConfig::default());
    for pc in &result.pc {
        assert!(pc.iter().all(|&v| v.abs() < 1e-6));
    }
    assert!(result.max_moment.iter().all(|&v| v.is_finite() && v.abs() < 1e-3));
    assert!(result.min_moment.iter().all(|&v| v.is_finite() && v.abs() < 1e-3));
}

#[test]
fn test_fixed_threshold_is_reported() {
    let config = PhaseCongruencyConfig {
        noise_method: NoiseMethod::Fixed(0.25),
        ..Default::default()
    };
    let result = compute(&vertical_step(16, 16), &config);
    assert_eq!(result.threshold, 0.25);
}

#[test]
fn test_noise_estimators_give_positive_threshold() {
    let image = Array2::from_shape_fn((32, 32), |(y, x)| ((y * 13 + x * 7) % 5) as f64);
    for noise_method in [NoiseMethod::Median, NoiseMethod::RayleighMode] {
        let config = PhaseCongruencyConfig {
            noise_method,
            ..Default::default()
        };
        let result = compute(&image, &config);
        assert!(result.threshold > 0.0, "{noise_method}");
    }
}

#[test]
fn test_worker_count_does_not_change_result() {
    let image = vertical_step(32, 40);
    let config = PhaseCongruencyConfig::default();
    let single = LogGaborPhaseCongruency::new(WorkerPool::with_workers(NonZeroUsize::MIN))
        .compute(image.view(), &config)
        .unwrap();
    let many = LogGaborPhaseCongruency::new(WorkerPool::auto())
        .compute(image.view(), &config)
        .unwrap();
    assert_eq!(single.max_moment, many.max_moment);
    assert_eq!(single.min_moment, many.min_moment);
    assert_eq!(single.pc, many.pc);
}

#[test]
fn test_rejects_invalid_config() {
    let config = PhaseCongruencyConfig {
        nscale: 1,
        ..Default::default()
    };
    let result = LogGaborPhaseCongruency::default().compute(vertical_step(8, 8).view(), &config);
    assert!(matches!(
        result,
        Err(Error::InvalidParameter { name: "nscale", .. })
    ));
}
