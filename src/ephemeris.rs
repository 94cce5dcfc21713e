//! # Sun and Moon ephemeris
//!
//! The eclipse engine only needs apparent geocentric equatorial coordinates and distances of the
//! Sun and the Moon. They are obtained through the [`LunarSolarEphemeris`] trait so that a caller
//! can plug a high-precision theory; [`LowPrecisionEphemeris`] is the analytic implementation
//! shipped with the crate:
//!
//! - **Sun**: geometric longitude from the mean elements and the equation of center, corrected for
//!   aberration and nutation (Meeus, *Astronomical Algorithms*, ch. 25). About 0.01°.
//! - **Moon**: the 60 main longitude/distance terms and 60 latitude terms of the ELP-2000/82
//!   truncation (Meeus ch. 47), plus the Venus, Jupiter and flattening additive terms. About
//!   10″ in longitude, 4″ in latitude.
//!
//! Distances are returned in Earth equatorial radii.
use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, EarthRadii, JulianDay, AU_EARTH_RADII, EARTH_EQUATORIAL_RADIUS_KM, RADEG,
};
use crate::coordinates::{EclipticalCoordinate, EquatorialCoordinate};
use crate::geometry::angle::to360;
use crate::ref_system::{
    arcsec_to_deg, centuries_since_j2000, mean_obliquity, nutation, true_obliquity,
};

/// Apparent geocentric position of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub equatorial: EquatorialCoordinate,
    /// Geocentric distance, Earth equatorial radii.
    pub distance: EarthRadii,
}

/// Sun and Moon positions at one instant, the input of the element calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunMoonPosition {
    /// Instant, Julian Day (TT).
    pub jd: JulianDay,
    pub sun: EquatorialCoordinate,
    /// Earth equatorial radii.
    pub sun_distance: EarthRadii,
    pub moon: EquatorialCoordinate,
    /// Earth equatorial radii.
    pub moon_distance: EarthRadii,
}

/// Provider of apparent geocentric Sun and Moon positions.
///
/// Instants are Julian Days on the TT scale.
pub trait LunarSolarEphemeris {
    fn sun(&self, jd: JulianDay) -> BodyPosition;

    fn moon(&self, jd: JulianDay) -> BodyPosition;

    fn sun_moon_position(&self, jd: JulianDay) -> SunMoonPosition {
        let sun = self.sun(jd);
        let moon = self.moon(jd);
        SunMoonPosition {
            jd,
            sun: sun.equatorial,
            sun_distance: sun.distance,
            moon: moon.equatorial,
            moon_distance: moon.distance,
        }
    }

    /// Apparent ecliptical coordinates of the Moon, referred to the true equinox of date.
    fn moon_ecliptical(&self, jd: JulianDay) -> (EclipticalCoordinate, EarthRadii) {
        let moon = self.moon(jd);
        (
            moon.equatorial.to_ecliptical(true_obliquity(jd)),
            moon.distance,
        )
    }
}

/// Analytic low-precision Sun and Moon theory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LowPrecisionEphemeris;

/// Fundamental arguments of the lunar theory, degrees.
struct LunarArguments {
    /// Mean longitude `L′`.
    l: Degree,
    /// Mean elongation `D`.
    d: Degree,
    /// Sun mean anomaly `M`.
    m: Degree,
    /// Moon mean anomaly `M′`.
    mp: Degree,
    /// Argument of latitude `F`.
    f: Degree,
    /// Eccentricity factor of the Earth orbit.
    e: f64,
}

impl LunarArguments {
    fn new(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        LunarArguments {
            l: to360(
                218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0
                    - t4 / 65194000.0,
            ),
            d: to360(
                297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
                    - t4 / 113065000.0,
            ),
            m: to360(357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0),
            mp: to360(
                134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
                    - t4 / 14712000.0,
            ),
            f: to360(
                93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
                    + t4 / 863310000.0,
            ),
            e: 1.0 - 0.002516 * t - 0.0000074 * t2,
        }
    }

    /// Argument `d·D + m·M + m′·M′ + f·F` in radians and its eccentricity factor `E^|m|`.
    fn term(&self, d: i8, m: i8, mp: i8, f: i8) -> (f64, f64) {
        let arg = (d as f64 * self.d + m as f64 * self.m + mp as f64 * self.mp + f as f64 * self.f)
            * RADEG;
        (arg, self.e.powi(m.abs() as i32))
    }
}

impl LowPrecisionEphemeris {
    /// Geometric (no nutation) ecliptical position of the Moon, distance in kilometers.
    ///
    /// Arguments
    /// ---------
    /// * `jd`: Julian Day (TT).
    ///
    /// Return
    /// ------
    /// * `(λ, β, Δ)`: longitude and latitude referred to the mean equinox of date, degrees, and the
    ///   distance between the centers of the Earth and the Moon, kilometers.
    pub fn moon_geometric(&self, jd: JulianDay) -> (Degree, Degree, f64) {
        let t = centuries_since_j2000(jd);
        let args = LunarArguments::new(t);

        let a1 = (119.75 + 131.849 * t) * RADEG;
        let a2 = (53.09 + 479264.290 * t) * RADEG;
        let a3 = (313.45 + 481266.484 * t) * RADEG;
        let l = args.l * RADEG;
        let f = args.f * RADEG;
        let mp = args.mp * RADEG;

        let (mut sum_l, mut sum_r) = LONGITUDE_DISTANCE_TERMS.iter().fold(
            (0.0, 0.0),
            |(sl, sr), &(d, m, mp, f, cl, cr)| {
                let (arg, e) = args.term(d, m, mp, f);
                (sl + cl * e * arg.sin(), sr + cr * e * arg.cos())
            },
        );
        let mut sum_b = LATITUDE_TERMS
            .iter()
            .map(|&(d, m, mp, f, cb)| {
                let (arg, e) = args.term(d, m, mp, f);
                cb * e * arg.sin()
            })
            .sum::<f64>();

        // Venus, Jupiter and Earth flattening
        sum_l += 3958.0 * a1.sin() + 1962.0 * (l - f).sin() + 318.0 * a2.sin();
        sum_b += -2235.0 * l.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f).sin()
            + 175.0 * (a1 + f).sin()
            + 127.0 * (l - mp).sin()
            - 115.0 * (l + mp).sin();
        sum_r /= 1000.0;

        (
            to360(args.l + sum_l / 1e6),
            sum_b / 1e6,
            385000.56 + sum_r,
        )
    }

    /// Geometric longitude of the Sun referred to the mean equinox of date, degrees, and the
    /// radius vector in AU.
    pub fn sun_geometric(&self, jd: JulianDay) -> (Degree, f64) {
        let t = centuries_since_j2000(jd);
        let t2 = t * t;

        let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t2;
        let m = (357.52911 + 35999.05029 * t - 0.0001537 * t2) * RADEG;
        let e = 0.016708634 - 0.000042037 * t - 0.0000001267 * t2;

        let c = (1.914602 - 0.004817 * t - 0.000014 * t2) * m.sin()
            + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
            + 0.000289 * (3.0 * m).sin();

        let nu = m + c * RADEG;
        let r = 1.000001018 * (1.0 - e * e) / (1.0 + e * nu.cos());

        (to360(l0 + c), r)
    }
}

impl LunarSolarEphemeris for LowPrecisionEphemeris {
    fn sun(&self, jd: JulianDay) -> BodyPosition {
        let (theta, r) = self.sun_geometric(jd);
        let nut = nutation(jd);
        let epsilon = mean_obliquity(jd) + arcsec_to_deg(nut.delta_epsilon);

        // Annual aberration −20.4898″/R, then nutation in longitude
        let lambda = theta + arcsec_to_deg(-20.4898 / r + nut.delta_psi);

        BodyPosition {
            equatorial: EclipticalCoordinate::new(lambda, 0.0).to_equatorial(epsilon),
            distance: r * AU_EARTH_RADII,
        }
    }

    fn moon(&self, jd: JulianDay) -> BodyPosition {
        let (lambda, beta, distance_km) = self.moon_geometric(jd);
        let nut = nutation(jd);
        let epsilon = mean_obliquity(jd) + arcsec_to_deg(nut.delta_epsilon);

        BodyPosition {
            equatorial: EclipticalCoordinate::new(lambda + arcsec_to_deg(nut.delta_psi), beta)
                .to_equatorial(epsilon),
            distance: distance_km / EARTH_EQUATORIAL_RADIUS_KM,
        }
    }

    fn moon_ecliptical(&self, jd: JulianDay) -> (EclipticalCoordinate, EarthRadii) {
        let (lambda, beta, distance_km) = self.moon_geometric(jd);
        (
            EclipticalCoordinate::new(lambda + arcsec_to_deg(nutation(jd).delta_psi), beta),
            distance_km / EARTH_EQUATORIAL_RADIUS_KM,
        )
    }
}

/// Periodic terms `(D, M, M′, F, Σl coefficient [1e-6 deg], Σr coefficient [1e-3 km])`.
#[rustfmt::skip]
const LONGITUDE_DISTANCE_TERMS: [(i8, i8, i8, i8, f64, f64); 60] = [
    (0, 0, 1, 0, 6288774.0, -20905355.0),
    (2, 0, -1, 0, 1274027.0, -3699111.0),
    (2, 0, 0, 0, 658314.0, -2955968.0),
    (0, 0, 2, 0, 213618.0, -569925.0),
    (0, 1, 0, 0, -185116.0, 48888.0),
    (0, 0, 0, 2, -114332.0, -3149.0),
    (2, 0, -2, 0, 58793.0, 246158.0),
    (2, -1, -1, 0, 57066.0, -152138.0),
    (2, 0, 1, 0, 53322.0, -170733.0),
    (2, -1, 0, 0, 45758.0, -204586.0),
    (0, 1, -1, 0, -40923.0, -129620.0),
    (1, 0, 0, 0, -34720.0, 108743.0),
    (0, 1, 1, 0, -30383.0, 104755.0),
    (2, 0, 0, -2, 15327.0, 10321.0),
    (0, 0, 1, 2, -12528.0, 0.0),
    (0, 0, 1, -2, 10980.0, 79661.0),
    (4, 0, -1, 0, 10675.0, -34782.0),
    (0, 0, 3, 0, 10034.0, -23210.0),
    (4, 0, -2, 0, 8548.0, -21636.0),
    (2, 1, -1, 0, -7888.0, 24208.0),
    (2, 1, 0, 0, -6766.0, 30824.0),
    (1, 0, -1, 0, -5163.0, -8379.0),
    (1, 1, 0, 0, 4987.0, -16675.0),
    (2, -1, 1, 0, 4036.0, -12831.0),
    (2, 0, 2, 0, 3994.0, -10445.0),
    (4, 0, 0, 0, 3861.0, -11650.0),
    (2, 0, -3, 0, 3665.0, 14403.0),
    (0, 1, -2, 0, -2689.0, -7003.0),
    (2, 0, -1, 2, -2602.0, 0.0),
    (2, -1, -2, 0, 2390.0, 10056.0),
    (1, 0, 1, 0, -2348.0, 6322.0),
    (2, -2, 0, 0, 2236.0, -9884.0),
    (0, 1, 2, 0, -2120.0, 5751.0),
    (0, 2, 0, 0, -2069.0, 0.0),
    (2, -2, -1, 0, 2048.0, -4950.0),
    (2, 0, 1, -2, -1773.0, 4130.0),
    (2, 0, 0, 2, -1595.0, 0.0),
    (4, -1, -1, 0, 1215.0, -3958.0),
    (0, 0, 2, 2, -1110.0, 0.0),
    (3, 0, -1, 0, -892.0, 3258.0),
    (2, 1, 1, 0, -810.0, 2616.0),
    (4, -1, -2, 0, 759.0, -1897.0),
    (0, 2, -1, 0, -713.0, -2117.0),
    (2, 2, -1, 0, -700.0, 2354.0),
    (2, 1, -2, 0, 691.0, 0.0),
    (2, -1, 0, -2, 596.0, 0.0),
    (4, 0, 1, 0, 549.0, -1423.0),
    (0, 0, 4, 0, 537.0, -1117.0),
    (4, -1, 0, 0, 520.0, -1571.0),
    (1, 0, -2, 0, -487.0, -1739.0),
    (2, 1, 0, -2, -399.0, 0.0),
    (0, 0, 2, -2, -381.0, -4421.0),
    (1, 1, 1, 0, 351.0, 0.0),
    (3, 0, -2, 0, -340.0, 0.0),
    (4, 0, -3, 0, 330.0, 0.0),
    (2, -1, 2, 0, 327.0, 0.0),
    (0, 2, 1, 0, -323.0, 1165.0),
    (1, 1, -1, 0, 299.0, 0.0),
    (2, 0, 3, 0, 294.0, 0.0),
    (2, 0, -1, -2, 0.0, 8752.0),
];

/// Periodic terms `(D, M, M′, F, Σb coefficient [1e-6 deg])`.
#[rustfmt::skip]
const LATITUDE_TERMS: [(i8, i8, i8, i8, f64); 60] = [
    (0, 0, 0, 1, 5128122.0),
    (0, 0, 1, 1, 280602.0),
    (0, 0, 1, -1, 277693.0),
    (2, 0, 0, -1, 173237.0),
    (2, 0, -1, 1, 55413.0),
    (2, 0, -1, -1, 46271.0),
    (2, 0, 0, 1, 32573.0),
    (0, 0, 2, 1, 17198.0),
    (2, 0, 1, -1, 9266.0),
    (0, 0, 2, -1, 8822.0),
    (2, -1, 0, -1, 8216.0),
    (2, 0, -2, -1, 4324.0),
    (2, 0, 1, 1, 4200.0),
    (2, 1, 0, -1, -3359.0),
    (2, -1, -1, 1, 2463.0),
    (2, -1, 0, 1, 2211.0),
    (2, -1, -1, -1, 2065.0),
    (0, 1, -1, -1, -1870.0),
    (4, 0, -1, -1, 1828.0),
    (0, 1, 0, 1, -1794.0),
    (0, 0, 0, 3, -1749.0),
    (0, 1, -1, 1, -1565.0),
    (1, 0, 0, 1, -1491.0),
    (0, 1, 1, 1, -1475.0),
    (0, 1, 1, -1, -1410.0),
    (0, 1, 0, -1, -1344.0),
    (1, 0, 0, -1, -1335.0),
    (0, 0, 3, 1, 1107.0),
    (4, 0, 0, -1, 1021.0),
    (4, 0, -1, 1, 833.0),
    (0, 0, 1, -3, 777.0),
    (4, 0, -2, 1, 671.0),
    (2, 0, 0, -3, 607.0),
    (2, 0, 2, -1, 596.0),
    (2, -1, 1, -1, 491.0),
    (2, 0, -2, 1, -451.0),
    (0, 0, 3, -1, 439.0),
    (2, 0, 2, 1, 422.0),
    (2, 0, -3, -1, 421.0),
    (2, 1, -1, 1, -366.0),
    (2, 1, 0, 1, -351.0),
    (4, 0, 0, 1, 331.0),
    (2, -1, 1, 1, 315.0),
    (2, -2, 0, -1, 302.0),
    (0, 0, 1, 3, -283.0),
    (2, 1, 1, -1, -229.0),
    (1, 1, 0, -1, 223.0),
    (1, 1, 0, 1, 223.0),
    (0, 1, -2, -1, -220.0),
    (2, 1, -1, -1, -220.0),
    (1, 0, 1, 1, -185.0),
    (2, -1, -2, -1, 181.0),
    (0, 1, 2, 1, -177.0),
    (4, 0, -2, -1, 176.0),
    (4, -1, -1, -1, 166.0),
    (1, 0, 1, -1, -164.0),
    (4, 0, 1, -1, 132.0),
    (1, 0, -1, -1, -119.0),
    (4, -1, 0, -1, 115.0),
    (2, -2, 0, 1, 107.0),
];

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_moon_meeus_47a() {
        // 1992 April 12, 0h TD
        let jd = 2448724.5;
        let eph = LowPrecisionEphemeris;
        let (lambda, beta, distance) = eph.moon_geometric(jd);
        assert_abs_diff_eq!(lambda, 133.162655, epsilon = 1e-5);
        assert_abs_diff_eq!(beta, -3.229126, epsilon = 1e-5);
        assert_abs_diff_eq!(distance, 368409.7, epsilon = 0.1);

        let moon = eph.moon(jd);
        assert_abs_diff_eq!(moon.equatorial.alpha, 134.688470, epsilon = 1e-4);
        assert_abs_diff_eq!(moon.equatorial.delta, 13.768368, epsilon = 1e-4);
        assert_abs_diff_eq!(moon.distance, 368409.7 / 6378.137, epsilon = 1e-4);
    }

    #[test]
    fn test_sun_meeus_25a() {
        // 1992 October 13, 0h TD
        let sun = LowPrecisionEphemeris.sun(2448908.5);
        assert_abs_diff_eq!(sun.equatorial.alpha, 198.38083, epsilon = 1e-3);
        assert_abs_diff_eq!(sun.equatorial.delta, -7.78507, epsilon = 1e-3);
        assert_abs_diff_eq!(sun.distance / AU_EARTH_RADII, 0.99766, epsilon = 1e-5);
    }

    #[test]
    fn test_moon_ecliptical_default_matches_direct() {
        struct Wrapped;
        impl LunarSolarEphemeris for Wrapped {
            fn sun(&self, jd: JulianDay) -> BodyPosition {
                LowPrecisionEphemeris.sun(jd)
            }
            fn moon(&self, jd: JulianDay) -> BodyPosition {
                LowPrecisionEphemeris.moon(jd)
            }
        }

        let jd = 2460409.26;
        let (direct, _) = LowPrecisionEphemeris.moon_ecliptical(jd);
        let (through_equator, _) = Wrapped.moon_ecliptical(jd);
        assert_abs_diff_eq!(direct.lambda, through_equator.lambda, epsilon = 1e-9);
        assert_abs_diff_eq!(direct.beta, through_equator.beta, epsilon = 1e-9);
    }

    #[test]
    fn test_sun_moon_position() {
        let pos = LowPrecisionEphemeris.sun_moon_position(2457987.25);
        assert_eq!(pos.jd, 2457987.25);
        // New moon of 2017 August 21: both bodies within half a degree
        assert!(pos.sun.separation(&pos.moon) < 0.5);
        assert!(pos.moon_distance > 55.0 && pos.moon_distance < 64.0);
    }
}
