use ndarray::{array, Array2};

use super::*;

#[test]
fn test_maps_limits_to_level_range() {
    let rescaler = GrayLevelRescaler::new(8.0, (0.0, 99.0)).unwrap();
    assert_eq!(rescaler.rescale_value(0.0), 0);
    assert_eq!(rescaler.rescale_value(99.0), 8);
    // 50 * 8 / 99 = 4.04
    assert_eq!(rescaler.rescale_value(50.0), 4);
}

#[test]
fn test_rounds_half_to_even() {
    let rescaler = GrayLevelRescaler::new(4.0, (0.0, 8.0)).unwrap();
    // x * 0.5
    assert_eq!(rescaler.rescale_value(1.0), 0);
    assert_eq!(rescaler.rescale_value(3.0), 2);
    assert_eq!(rescaler.rescale_value(5.0), 2);
    assert_eq!(rescaler.rescale_value(7.0), 4);
}

#[test]
fn test_idempotent_on_level_range() {
    let levels = 16.0;
    let image = Array2::from_shape_fn((9, 11), |(y, x)| ((y * 7 + x * 3) % 17) as f64 - 0.25);
    let image = image.mapv(|v: f64| v.clamp(0.0, levels));
    let rescaler = GrayLevelRescaler::new(levels, (0.0, levels)).unwrap();

    let once = rescaler.rescale(&image);
    let twice = rescaler.rescale(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_defaults_come_from_image() {
    let image = to_f64(&array![[2u8, 4], [6, 10]]);
    let rescaler = GrayLevelRescaler::with_image_defaults(&image, None, None).unwrap();
    assert_eq!(rescaler.levels(), 10.0);
    assert_eq!(rescaler.limits(), (2.0, 10.0));
    // (x - 2) * 10 / 8
    assert_eq!(rescaler.rescale(&image), array![[0i64, 2], [5, 10]].into_dyn());
}

#[test]
fn test_degenerate_range_is_division_by_zero() {
    assert!(matches!(
        GrayLevelRescaler::new(8.0, (3.0, 3.0)),
        Err(Error::DivisionByZero { value }) if value == 3.0
    ));

    let flat = array![[5.0, 5.0], [5.0, 5.0]];
    assert!(matches!(
        rescale_gray_levels(&flat, None, None),
        Err(Error::DivisionByZero { .. })
    ));
}

#[test]
fn test_inverted_range_is_invalid() {
    assert!(matches!(
        GrayLevelRescaler::new(8.0, (10.0, 1.0)),
        Err(Error::InvalidRange { .. })
    ));
}

#[test]
fn test_negative_levels_are_rejected() {
    assert!(matches!(
        GrayLevelRescaler::new(-1.0, (0.0, 1.0)),
        Err(Error::InvalidParameter {
            name: "n_gray_levels",
            ..
        })
    ));
}

#[test]
fn test_values_outside_limits_are_not_clamped() {
    let rescaler = GrayLevelRescaler::new(10.0, (0.0, 10.0)).unwrap();
    assert_eq!(rescaler.rescale_value(-3.0), -3);
    assert_eq!(rescaler.rescale_value(14.0), 14);
}
