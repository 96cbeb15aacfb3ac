use assert_approx_eq::assert_approx_eq;
use demand_forecast::scaler::{self, ScalerParams};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn fit_scales_into_unit_range() {
    let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let (scaled, params) = scaler::fit(&data);

    assert_eq!(params, ScalerParams { min: 10.0, max: 50.0 });
    assert_eq!(scaled.len(), data.len());
    assert_approx_eq!(scaled[0], 0.0);
    assert_approx_eq!(scaled[2], 0.5);
    assert_approx_eq!(scaled[4], 1.0);
}

#[rstest]
#[case(2.0)]
#[case(6.5)]
#[case(10.0)]
#[case(-3.0)] // outside the fitted range still round-trips
fn invert_undoes_apply(#[case] value: f64) {
    let params = ScalerParams { min: 2.0, max: 10.0 };
    assert_approx_eq!(scaler::invert(scaler::apply(value, &params), &params), value);
}

#[test]
fn degenerate_series_scales_to_zero() {
    let data = vec![5.0, 5.0, 5.0, 5.0];
    let (scaled, params) = scaler::fit(&data);

    assert_eq!(params, ScalerParams { min: 5.0, max: 5.0 });
    assert!(scaled.iter().all(|&v| v == 0.0));
}

#[test]
fn degenerate_invert_recovers_the_constant() {
    let params = ScalerParams { min: 5.0, max: 5.0 };

    // Effective range is 1, so the inverse transform stays finite
    assert_approx_eq!(scaler::invert(0.0, &params), 5.0);
    assert_approx_eq!(scaler::invert(1.0, &params), 6.0);
    assert!(scaler::apply(5.0, &params).is_finite());
}

#[test]
fn empty_series_fits_harmless_params() {
    let (scaled, params) = scaler::fit(&[]);
    assert!(scaled.is_empty());
    assert_eq!(params, ScalerParams { min: 0.0, max: 0.0 });
    assert!(scaler::invert(0.0, &params).is_finite());
}
