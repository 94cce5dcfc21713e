//! # Besselian elements of a solar eclipse
//!
//! The fundamental plane passes through the center of the Earth, perpendicular to the axis of the
//! lunar shadow (the line through the centers of the Sun and the Moon). On this plane, with the
//! unit of length the Earth equatorial radius:
//!
//! * `X`, `Y` – coordinates of the shadow axis, `Y` toward the north celestial pole,
//! * `L1`, `L2` – radii of the penumbral and umbral cones (`L2 < 0` for a total eclipse),
//! * `d`, `μ` – declination and ephemeris hour angle of the shadow axis direction,
//! * `tan f1`, `tan f2` – tangents of the half-angles of both cones.
//!
//! The computation is a single closed-form evaluation, with no iteration.
use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, EarthRadii, JulianDay, Seconds, MOON_RADIUS_PENUMBRA, MOON_RADIUS_UMBRA, RADEG,
    SUN_RADIUS,
};
use crate::ephemeris::SunMoonPosition;
use crate::geometry::angle::to360;
use crate::time::apparent_sidereal_time;

/// Besselian elements valid for exactly one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstantBesselianElements {
    /// Instant, Julian Day (TT).
    pub jd: JulianDay,
    /// ΔT = TT − UT used to turn ephemeris longitudes into Greenwich longitudes, seconds.
    pub delta_t: Seconds,
    pub x: EarthRadii,
    pub y: EarthRadii,
    /// Penumbral radius on the fundamental plane.
    pub l1: EarthRadii,
    /// Umbral radius on the fundamental plane (negative when the vertex is beyond the plane).
    pub l2: EarthRadii,
    /// Declination of the shadow axis, degrees.
    pub d: Degree,
    /// Ephemeris hour angle of the shadow axis, degrees in `[0, 360)`.
    pub mu: Degree,
    pub tan_f1: f64,
    pub tan_f2: f64,
    /// `dX/dt`, Earth radii per hour, when known (elements evaluated from a polynomial).
    pub dx: Option<f64>,
    /// `dY/dt`, Earth radii per hour, when known.
    pub dy: Option<f64>,
}

impl InstantBesselianElements {
    /// Compute the Besselian elements from the apparent geocentric positions of the Sun and the
    /// Moon.
    ///
    /// Arguments
    /// ---------
    /// * `position`: Sun and Moon positions at one instant (TT); distances must be positive.
    /// * `delta_t`: ΔT in seconds, carried along for the projection to Earth.
    ///
    /// Return
    /// ------
    /// * The instant elements.
    ///
    /// Remarks
    /// -------
    /// * The direction of the shadow axis is that of `G = r_sun − r_moon`. `d` is its
    ///   declination and `a` its right ascension; `μ = θ − a`, with `θ` the apparent sidereal
    ///   time evaluated at the TT instant.
    /// * The Moon's vector is then rotated into the fundamental frame: `x`, `y` in the plane, `z`
    ///   along the axis.
    /// * `sin f1 = (R_sun + k1) / |G|`, `sin f2 = (R_sun − k2) / |G|`, and
    ///   `L1 = z·tan f1 + k1 / cos f1`, `L2 = z·tan f2 − k2 / cos f2`.
    pub fn from_position(position: &SunMoonPosition, delta_t: Seconds) -> Self {
        let sun = position.sun.to_rectangular(position.sun_distance);
        let moon = position.moon.to_rectangular(position.moon_distance);

        let g = sun - moon;
        let g_norm = g.norm();

        let d = (g.z / g_norm).clamp(-1.0, 1.0).asin();
        let a = g.y.atan2(g.x);

        let alpha_m = position.moon.alpha * RADEG;
        let delta_m = position.moon.delta * RADEG;
        let r_m = position.moon_distance;
        let h = alpha_m - a;

        let x = r_m * delta_m.cos() * h.sin();
        let y = r_m * (delta_m.sin() * d.cos() - delta_m.cos() * d.sin() * h.cos());
        let z = r_m * (delta_m.sin() * d.sin() + delta_m.cos() * d.cos() * h.cos());

        let f1 = ((SUN_RADIUS + MOON_RADIUS_PENUMBRA) / g_norm)
            .clamp(-1.0, 1.0)
            .asin();
        let f2 = ((SUN_RADIUS - MOON_RADIUS_UMBRA) / g_norm)
            .clamp(-1.0, 1.0)
            .asin();

        let l1 = z * f1.tan() + MOON_RADIUS_PENUMBRA / f1.cos();
        let l2 = z * f2.tan() - MOON_RADIUS_UMBRA / f2.cos();

        let mu = to360(apparent_sidereal_time(position.jd) - a / RADEG);

        InstantBesselianElements {
            jd: position.jd,
            delta_t,
            x,
            y,
            l1,
            l2,
            d: d / RADEG,
            mu,
            tan_f1: f1.tan(),
            tan_f2: f2.tan(),
            dx: None,
            dy: None,
        }
    }

    /// Distance of the shadow axis from the center of the Earth, Earth radii.
    pub fn axis_distance(&self) -> EarthRadii {
        self.x.hypot(self.y)
    }
}

/// Compute the Besselian elements for one instant.
///
/// See [`InstantBesselianElements::from_position`].
pub fn compute_besselian_elements(
    position: &SunMoonPosition,
    delta_t: Seconds,
) -> InstantBesselianElements {
    InstantBesselianElements::from_position(position, delta_t)
}

#[cfg(test)]
mod besselian_test {
    use super::*;
    use crate::coordinates::EquatorialCoordinate;
    use crate::ephemeris::{LowPrecisionEphemeris, LunarSolarEphemeris};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_total_eclipse_2017() {
        // 2017 August 21, 18h TT; reference values from the published polynomial at t0
        let pos = LowPrecisionEphemeris.sun_moon_position(2457987.25);
        let el = compute_besselian_elements(&pos, 68.4);

        assert_abs_diff_eq!(el.x, -0.129576, epsilon = 5e-3);
        assert_abs_diff_eq!(el.y, 0.485417, epsilon = 5e-3);
        assert_abs_diff_eq!(el.d, 11.86697, epsilon = 1e-2);
        assert_abs_diff_eq!(el.mu, 89.24543, epsilon = 2e-2);
        assert_abs_diff_eq!(el.l1, 0.542093, epsilon = 5e-4);
        assert_abs_diff_eq!(el.l2, -0.004028, epsilon = 5e-4);
        assert_abs_diff_eq!(el.tan_f1, 0.0046222, epsilon = 5e-6);
        assert_abs_diff_eq!(el.tan_f2, 0.0045992, epsilon = 5e-6);
        assert!(el.dx.is_none());
    }

    fn aligned(sun: EquatorialCoordinate, moon: EquatorialCoordinate) -> SunMoonPosition {
        SunMoonPosition {
            jd: 2451545.0,
            sun,
            sun_distance: 23_450.0,
            moon,
            moon_distance: 60.0,
        }
    }

    #[test]
    fn test_central_alignment() {
        let sun = EquatorialCoordinate::new(123.4, 17.5);
        let el = compute_besselian_elements(&aligned(sun, sun), 0.0);

        assert_abs_diff_eq!(el.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(el.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(el.d, 17.5, epsilon = 1e-9);
        let theta = apparent_sidereal_time(2451545.0);
        assert_abs_diff_eq!(el.mu, to360(theta - 123.4), epsilon = 1e-9);
        assert!(el.l1 > 0.5 && el.l2 < 0.0);
    }

    #[test]
    fn test_opposed_alignment() {
        let sun = EquatorialCoordinate::new(300.0, -20.0);
        let moon = EquatorialCoordinate::new(120.0, 20.0);
        let el = compute_besselian_elements(&aligned(sun, moon), 0.0);

        assert_abs_diff_eq!(el.d, -20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(el.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(el.y, 0.0, epsilon = 1e-9);
        let theta = apparent_sidereal_time(2451545.0);
        assert_abs_diff_eq!(el.mu, to360(theta - 300.0), epsilon = 1e-9);
        for v in [el.x, el.y, el.l1, el.l2, el.d, el.mu, el.tan_f1, el.tan_f2] {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_no_nan_for_random_geometry() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let pos = SunMoonPosition {
                jd: 2451545.0 + rng.random_range(-50_000.0..50_000.0),
                sun: EquatorialCoordinate::new(
                    rng.random_range(0.0..360.0),
                    rng.random_range(-23.5..23.5),
                ),
                sun_distance: rng.random_range(23_000.0..24_000.0),
                moon: EquatorialCoordinate::new(
                    rng.random_range(0.0..360.0),
                    rng.random_range(-29.0..29.0),
                ),
                moon_distance: rng.random_range(55.0..64.0),
            };
            let el = compute_besselian_elements(&pos, 0.0);
            for v in [el.x, el.y, el.l1, el.l2, el.d, el.mu, el.tan_f1, el.tan_f2] {
                assert!(v.is_finite());
            }
        }
    }
}
