#![allow(dead_code)]

use std::sync::Once;

use approx::assert_abs_diff_eq;
use umbra::coordinates::GeographicCoordinate;
use umbra::ephemeris::LowPrecisionEphemeris;
use umbra::polynomial_elements::{PolynomialBesselianElements, PolynomialLunarEclipseElements};

static INIT_LOGGER: Once = Once::new();

/// Route the crate's `log` records to the test output, filtered by `RUST_LOG`.
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::from_default_env().is_test(true).try_init();
    });
}

/// Besselian elements of the total solar eclipse of 2017 August 21, centered on 18h TT.
pub fn elements_2017() -> PolynomialBesselianElements {
    PolynomialBesselianElements::from_ephemeris(&LowPrecisionEphemeris, 2457987.25, 2.0 / 24.0, 68.4)
        .unwrap()
}

/// Besselian elements of the partial solar eclipse of 2018 August 11, centered on 10h TT.
pub fn elements_2018() -> PolynomialBesselianElements {
    PolynomialBesselianElements::from_ephemeris(
        &LowPrecisionEphemeris,
        2458341.5 + 10.0 / 24.0,
        2.0 / 24.0,
        69.0,
    )
    .unwrap()
}

/// Lunar eclipse elements of the total lunar eclipse of 2000 January 21.
pub fn lunar_elements_2000() -> PolynomialLunarEclipseElements {
    PolynomialLunarEclipseElements::from_ephemeris(&LowPrecisionEphemeris, 2451564.7, 0.1, 64.0)
        .unwrap()
}

pub fn assert_geo_close(actual: &GeographicCoordinate, latitude: f64, longitude: f64, epsilon: f64) {
    assert_abs_diff_eq!(actual.latitude, latitude, epsilon = epsilon);
    assert_abs_diff_eq!(actual.longitude, longitude, epsilon = epsilon);
}

/// Angular distances between consecutive points, degrees.
pub fn gaps(points: &[GeographicCoordinate]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| w[0].angular_distance(&w[1]))
        .collect()
}

/// Whether every gap above `threshold` belongs to a tangency.
///
/// Near an external or internal tangency the limb points move like `√t`, so the steps there are
/// large and shrink monotonically away from it. A tangency sits either at an end of the curve or
/// at its largest gap. A gap above `threshold` that is not on such a monotone run is a jump
/// between branches.
pub fn large_gaps_at_tangencies(gaps: &[f64], threshold: f64) -> bool {
    let Some(peak) = gaps
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
    else {
        return true;
    };

    gaps.iter()
        .enumerate()
        .filter(|&(_, &g)| g > threshold)
        .all(|(i, _)| {
            let from_start = gaps[..=i].windows(2).all(|w| w[0] > w[1]);
            let from_end = gaps[i..].windows(2).all(|w| w[0] < w[1]);
            let from_peak = if i < peak {
                gaps[i..=peak].windows(2).all(|w| w[0] < w[1])
            } else {
                gaps[peak..=i].windows(2).all(|w| w[0] > w[1])
            };
            from_start || from_end || from_peak
        })
}
