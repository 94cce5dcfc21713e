use hifitime::{Epoch, TimeScale};
use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, JulianDay, Seconds, DAYS_PER_CENTURY, J2000, JDTOMJD, RADEG, SECONDS_PER_DAY,
    SIDEREAL_RATE,
};
use crate::geometry::angle::to360;
use crate::ref_system::{arcsec_to_deg, mean_obliquity, nutation};
use crate::umbra_errors::UmbraError;

/// Calendar date with a fractional day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    /// Day of month with fraction, `1.0 ≤ day < 32.0`.
    pub day: f64,
}

/// Transformation from a Gregorian date with fractional day to a Julian Day.
///
/// The time scale is not changed: a UT date gives a JD(UT), a TT date a JDE.
///
/// Argument
/// --------
/// * `year`, `month`: Gregorian year and month (1–12).
/// * `day`: day of month with fraction (e.g. `21.75` for 18h).
///
/// Return
/// ------
/// * The Julian Day, or [`UmbraError::InvalidParameter`] for an impossible date.
pub fn julian_day(year: i32, month: u8, day: f64) -> Result<JulianDay, UmbraError> {
    if !(1..=12).contains(&month) || !(1.0..32.0).contains(&day) {
        return Err(UmbraError::InvalidParameter(format!(
            "invalid calendar date {year}-{month}-{day}"
        )));
    }

    // Separation of day and fraction day
    let day_int = day.trunc() as u8;
    let fraction = day - day_int as f64;

    let hours = fraction * 24.0;
    let hour = hours.trunc() as u8;
    let minutes = (hours - hour as f64) * 60.0;
    let minute = minutes.trunc() as u8;
    let seconds = (minutes - minute as f64) * 60.0;
    let second = seconds.trunc() as u8;
    let nano = ((seconds - second as f64) * 1e9) as u32;

    let epoch = Epoch::maybe_from_gregorian(
        year,
        month,
        day_int,
        hour,
        minute,
        second,
        nano,
        TimeScale::UTC,
    )
    .map_err(|e| UmbraError::InvalidParameter(e.to_string()))?;

    Ok(epoch.to_jde_utc_days())
}

/// Transformation from a Julian Day to a Gregorian date with fractional day.
pub fn calendar_date(jd: JulianDay) -> CalendarDate {
    let (year, month, day, hour, minute, second, nano) = Epoch::from_jde_utc(jd).to_gregorian_utc();
    let fraction = (hour as f64 + (minute as f64 + (second as f64 + nano as f64 * 1e-9) / 60.0) / 60.0)
        / 24.0;
    CalendarDate {
        year,
        month,
        day: day as f64 + fraction,
    }
}

/// Transformation from Julian Day to Modified Julian Day.
pub fn jd_to_mjd(jd: JulianDay) -> f64 {
    jd - JDTOMJD
}

/// Decimal year of a Julian Day.
pub fn decimal_year(jd: JulianDay) -> f64 {
    2000.0 + (jd - J2000) / 365.25
}

/// ΔT = TT − UT in seconds (Espenak & Meeus polynomial model, valid −1999…+3000).
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (either scale, the model is insensitive to the difference).
///
/// Return
/// ------
/// * ΔT in seconds.
pub fn delta_t(jd: JulianDay) -> Seconds {
    let y = decimal_year(jd);
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };

    match y {
        y if y < -500.0 => long_term(y),
        y if y < 500.0 => {
            let u = y / 100.0;
            poly(
                u,
                &[
                    10583.6,
                    -1014.41,
                    33.78311,
                    -5.952053,
                    -0.1798452,
                    0.022174192,
                    0.0090316521,
                ],
            )
        }
        y if y < 1600.0 => {
            let u = (y - 1000.0) / 100.0;
            poly(
                u,
                &[
                    1574.2,
                    -556.01,
                    71.23472,
                    0.319781,
                    -0.8503463,
                    -0.005050998,
                    0.0083572073,
                ],
            )
        }
        y if y < 1700.0 => poly(y - 1600.0, &[120.0, -0.9808, -0.01532, 1.0 / 7129.0]),
        y if y < 1800.0 => poly(
            y - 1700.0,
            &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0],
        ),
        y if y < 1860.0 => poly(
            y - 1800.0,
            &[
                13.72,
                -0.332447,
                0.0068612,
                0.0041116,
                -0.00037436,
                0.0000121272,
                -0.0000001699,
                0.000000000875,
            ],
        ),
        y if y < 1900.0 => poly(
            y - 1860.0,
            &[
                7.62,
                0.5737,
                -0.251754,
                0.01680668,
                -0.0004473624,
                1.0 / 233_174.0,
            ],
        ),
        y if y < 1920.0 => poly(
            y - 1900.0,
            &[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197],
        ),
        y if y < 1941.0 => poly(y - 1920.0, &[21.20, 0.84493, -0.076100, 0.0020936]),
        y if y < 1961.0 => poly(y - 1950.0, &[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0]),
        y if y < 1986.0 => poly(y - 1975.0, &[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0]),
        y if y < 2005.0 => poly(
            y - 2000.0,
            &[
                63.86,
                0.3345,
                -0.060374,
                0.0017275,
                0.000651814,
                0.00002373599,
            ],
        ),
        y if y < 2050.0 => poly(y - 2000.0, &[62.92, 0.32217, 0.005589]),
        y if y < 2150.0 => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    }
}

fn poly(t: f64, coeffs: &[f64]) -> f64 {
    crate::numerics::polynomial_value(coeffs, t)
}

/// Greenwich mean sidereal time of an instant given in universal time.
///
/// The IAU 1982 expression gives the sidereal time at the preceding 0h UT as a cubic in Julian
/// centuries from J2000.0. The elapsed fraction of the day is then added at the sidereal rate.
///
/// Arguments
/// ---------
/// * `jd`: Julian Day on the UT scale. A JDE must first be shifted by ΔT.
///
/// Return
/// ------
/// * The mean sidereal time in degrees, in `[0, 360)`.
pub fn mean_sidereal_time(jd: JulianDay) -> Degree {
    // Seconds of sidereal time at 0h UT
    const AT_MIDNIGHT: [f64; 4] = [24110.54841, 8640184.812866, 9.3104e-2, -6.2e-6];

    let midnight = (jd - 0.5).floor() + 0.5;
    let t = (midnight - J2000) / DAYS_PER_CENTURY;
    let theta0 = poly(t, &AT_MIDNIGHT) * 360.0 / SECONDS_PER_DAY;

    to360(theta0 + (jd - midnight) * 360.0 * SIDEREAL_RATE)
}

/// Greenwich apparent sidereal time in degrees: the mean sidereal time corrected by the equation
/// of the equinoxes `Δψ·cos ε`.
pub fn apparent_sidereal_time(jd: JulianDay) -> Degree {
    let nut = nutation(jd);
    let epsilon = mean_obliquity(jd) + arcsec_to_deg(nut.delta_epsilon);
    to360(mean_sidereal_time(jd) + arcsec_to_deg(nut.delta_psi) * (epsilon * RADEG).cos())
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_julian_day() {
        assert_abs_diff_eq!(julian_day(2000, 1, 1.5).unwrap(), J2000, epsilon = 1e-9);
        assert_abs_diff_eq!(julian_day(2021, 1, 1.0).unwrap(), 2459215.5, epsilon = 1e-9);
        // Meeus, example 7.a
        assert_abs_diff_eq!(julian_day(1957, 10, 4.81).unwrap(), 2436116.31, epsilon = 1e-6);
        assert_abs_diff_eq!(
            julian_day(2017, 8, 21.75).unwrap(),
            2457987.25,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_julian_day_invalid() {
        assert!(matches!(
            julian_day(2020, 13, 1.0),
            Err(UmbraError::InvalidParameter(_))
        ));
        assert!(matches!(
            julian_day(2020, 1, 0.5),
            Err(UmbraError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_calendar_date() {
        let date = calendar_date(2436116.31);
        assert_eq!((date.year, date.month), (1957, 10));
        assert_abs_diff_eq!(date.day, 4.81, epsilon = 1e-8);

        let date = calendar_date(2451564.69796);
        assert_eq!((date.year, date.month), (2000, 1));
        assert_abs_diff_eq!(date.day, 21.19796, epsilon = 1e-8);
    }

    #[test]
    fn test_delta_t() {
        assert_abs_diff_eq!(delta_t(J2000), 63.86, epsilon = 0.01);
        assert_abs_diff_eq!(delta_t(2457987.27), 70.34, epsilon = 0.05);
        assert_abs_diff_eq!(delta_t(2415020.5), -2.79, epsilon = 0.2);
        assert!(delta_t(julian_day(-1000, 1, 1.0).unwrap()) > 20_000.0);
    }

    #[test]
    fn test_mean_sidereal_time() {
        assert_abs_diff_eq!(mean_sidereal_time(J2000), 280.46061837, epsilon = 1e-7);
        // Meeus, examples 12.a and 12.b
        assert_abs_diff_eq!(mean_sidereal_time(2446895.5), 197.693195, epsilon = 1e-6);
        assert_abs_diff_eq!(mean_sidereal_time(2446896.30625), 128.7378734, epsilon = 1e-6);
    }

    #[test]
    fn test_apparent_sidereal_time() {
        // Meeus, example 12.a: 13h10m46.1351s
        assert_abs_diff_eq!(apparent_sidereal_time(2446895.5), 197.692230, epsilon = 1e-4);
    }
}
