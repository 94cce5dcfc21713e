use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, JulianDay, Seconds, MOON_RADIUS_PENUMBRA, RADEG, SHADOW_ENLARGEMENT, SUN_RADIUS,
};
use crate::ephemeris::SunMoonPosition;
use crate::geometry::angle::{to180, to360};

/// Elements of a lunar eclipse at one instant.
///
/// The Moon is located relative to the axis of the Earth's shadow (the anti-solar point); all
/// quantities are angles seen from the center of the Earth, in degrees. The shadow radii include
/// the conventional 2 % atmospheric enlargement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstantLunarEclipseElements {
    /// Instant, Julian Day (TT).
    pub jd: JulianDay,
    /// ΔT, seconds.
    pub delta_t: Seconds,
    /// Offset of the Moon from the shadow axis along the equator, `Δα·cos δ`.
    pub x: Degree,
    /// Offset of the Moon from the shadow axis in declination.
    pub y: Degree,
    /// Penumbral radius `1.02·(π_moon + π_sun + s_sun)`.
    pub f1: Degree,
    /// Umbral radius `1.02·(π_moon + π_sun − s_sun)`.
    pub f2: Degree,
    /// Lunar semidiameter.
    pub f3: Degree,
    /// Geocentric right ascension of the Moon.
    pub alpha: Degree,
    /// Geocentric declination of the Moon.
    pub delta: Degree,
    /// Equatorial horizontal parallax of the Moon.
    pub parallax: Degree,
}

impl InstantLunarEclipseElements {
    /// Compute the lunar eclipse elements from Sun and Moon positions.
    ///
    /// Arguments
    /// ---------
    /// * `position`: apparent geocentric positions at one instant (TT).
    /// * `delta_t`: ΔT in seconds.
    pub fn from_position(position: &SunMoonPosition, delta_t: Seconds) -> Self {
        let asin_deg = |v: f64| v.clamp(-1.0, 1.0).asin() / RADEG;

        let parallax_moon = asin_deg(1.0 / position.moon_distance);
        let parallax_sun = asin_deg(1.0 / position.sun_distance);
        let radius_sun = asin_deg(SUN_RADIUS / position.sun_distance);
        let radius_moon = asin_deg(MOON_RADIUS_PENUMBRA / position.moon_distance);

        let shadow_alpha = to360(position.sun.alpha + 180.0);
        let shadow_delta = -position.sun.delta;

        let moon = position.moon;
        InstantLunarEclipseElements {
            jd: position.jd,
            delta_t,
            x: to180(moon.alpha - shadow_alpha) * (moon.delta * RADEG).cos(),
            y: moon.delta - shadow_delta,
            f1: SHADOW_ENLARGEMENT * (parallax_moon + parallax_sun + radius_sun),
            f2: SHADOW_ENLARGEMENT * (parallax_moon + parallax_sun - radius_sun),
            f3: radius_moon,
            alpha: moon.alpha,
            delta: moon.delta,
            parallax: parallax_moon,
        }
    }

    /// Angular distance of the Moon's center from the shadow axis.
    pub fn axis_distance(&self) -> Degree {
        self.x.hypot(self.y)
    }

    /// Umbral magnitude: fraction of the lunar diameter immersed in the umbra.
    pub fn umbral_magnitude(&self) -> f64 {
        (self.f2 + self.f3 - self.axis_distance()) / (2.0 * self.f3)
    }

    /// Penumbral magnitude: fraction of the lunar diameter immersed in the penumbra.
    pub fn penumbral_magnitude(&self) -> f64 {
        (self.f1 + self.f3 - self.axis_distance()) / (2.0 * self.f3)
    }
}
