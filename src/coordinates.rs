//! # Celestial and geographic coordinates
//!
//! Value types for the frames the eclipse engine moves through, with the conversions between them:
//!
//! | Type | Components |
//! |------|------------|
//! | [`EquatorialCoordinate`] | right ascension `α` ∈ [0, 360), declination `δ` |
//! | [`EclipticalCoordinate`] | longitude `λ` ∈ [0, 360), latitude `β` |
//! | [`HorizontalCoordinate`] | azimuth (from south, westward) ∈ [0, 360), altitude |
//! | [`GalacticCoordinate`] | longitude `l` ∈ [0, 360), latitude `b` (J2000 pole) |
//! | [`GeographicCoordinate`] | latitude, east-positive longitude, elevation, UTC offset, name |
//!
//! Angles are in degrees. Rectangular vectors use [`nalgebra::Vector3`] with the distance in the
//! unit chosen by the caller (Earth equatorial radii in this crate).
use std::fmt;
use std::ops::Add;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, EarthRadii, JulianDay, EARTH_EQUATORIAL_RADIUS_KM, EARTH_POLAR_RADIUS_KM, RADEG,
};
use crate::geometry::angle::{to180, to360, to_sexagesimal};
use crate::geometry::spherical::angular_separation;
use crate::ref_system::{ecliptic_to_equatorial, precession_matrix};

/// Right ascension of the north galactic pole (J2000), degrees.
const GALACTIC_POLE_ALPHA: Degree = 192.859_48;
/// Declination of the north galactic pole (J2000), degrees.
const GALACTIC_POLE_DELTA: Degree = 27.128_25;
/// Galactic longitude of the ascending node of the galactic plane on the equator, degrees.
const GALACTIC_NODE: Degree = 32.931_92;

/// Geocentric (or topocentric) equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    /// Right ascension, degrees in `[0, 360)`.
    pub alpha: Degree,
    /// Declination, degrees.
    pub delta: Degree,
}

impl EquatorialCoordinate {
    pub fn new(alpha: Degree, delta: Degree) -> Self {
        EquatorialCoordinate {
            alpha: to360(alpha),
            delta,
        }
    }

    /// Rectangular vector of length `distance` pointing to these coordinates.
    pub fn to_rectangular(&self, distance: f64) -> Vector3<f64> {
        let (sa, ca) = (self.alpha * RADEG).sin_cos();
        let (sd, cd) = (self.delta * RADEG).sin_cos();
        Vector3::new(distance * cd * ca, distance * cd * sa, distance * sd)
    }

    /// Direction and length of a rectangular vector.
    pub fn from_rectangular(v: &Vector3<f64>) -> (Self, f64) {
        let r = v.norm();
        let alpha = v.y.atan2(v.x) / RADEG;
        let delta = v.z.atan2((v.x * v.x + v.y * v.y).sqrt()) / RADEG;
        (EquatorialCoordinate::new(alpha, delta), r)
    }

    /// Convert to ecliptical coordinates for the obliquity `epsilon`.
    pub fn to_ecliptical(&self, epsilon: Degree) -> EclipticalCoordinate {
        let v = ecliptic_to_equatorial(epsilon).transpose() * self.to_rectangular(1.0);
        let lambda = v.y.atan2(v.x) / RADEG;
        let beta = v.z.clamp(-1.0, 1.0).asin() / RADEG;
        EclipticalCoordinate::new(lambda, beta)
    }

    /// Local hour angle `H = θ₀ + λ − α`, in `[0, 360)`.
    ///
    /// Arguments
    /// ---------
    /// * `longitude`: east-positive geographic longitude, degrees.
    /// * `theta0`: Greenwich sidereal time, degrees.
    pub fn hour_angle(&self, longitude: Degree, theta0: Degree) -> Degree {
        to360(theta0 + longitude - self.alpha)
    }

    /// Local horizontal coordinates as seen from `geo` at Greenwich sidereal time `theta0`.
    pub fn to_horizontal(&self, geo: &GeographicCoordinate, theta0: Degree) -> HorizontalCoordinate {
        let h = self.hour_angle(geo.longitude, theta0) * RADEG;
        let phi = geo.latitude * RADEG;
        let delta = self.delta * RADEG;

        let azimuth = h
            .sin()
            .atan2(h.cos() * phi.sin() - delta.tan() * phi.cos())
            / RADEG;
        let altitude = (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos())
            .clamp(-1.0, 1.0)
            .asin()
            / RADEG;

        HorizontalCoordinate {
            azimuth: to360(azimuth),
            altitude,
        }
    }

    /// Galactic coordinates (J2000 galactic pole).
    pub fn to_galactic(&self) -> GalacticCoordinate {
        let a = (self.alpha - GALACTIC_POLE_ALPHA) * RADEG;
        let d = self.delta * RADEG;
        let dg = GALACTIC_POLE_DELTA * RADEG;

        let sin_b = d.sin() * dg.sin() + d.cos() * dg.cos() * a.cos();
        let x = d.cos() * a.sin();
        let y = d.sin() * dg.cos() - d.cos() * dg.sin() * a.cos();

        GalacticCoordinate {
            l: to360(GALACTIC_NODE + 90.0 - x.atan2(y) / RADEG),
            b: sin_b.clamp(-1.0, 1.0).asin() / RADEG,
        }
    }

    /// Coordinates referred to the mean equator of `jd_to`, from the mean equator of `jd_from`.
    pub fn precess(&self, jd_from: JulianDay, jd_to: JulianDay) -> Self {
        let v = precession_matrix(jd_from, jd_to) * self.to_rectangular(1.0);
        EquatorialCoordinate::from_rectangular(&v).0
    }

    /// Topocentric coordinates of a body at `distance` (Earth equatorial radii) from the geocenter.
    ///
    /// The observer's geocentric vector `(ρcosφ′ cos θ, ρcosφ′ sin θ, ρsinφ′)`, with `θ` the local
    /// sidereal time, is subtracted from the body's vector.
    ///
    /// Arguments
    /// ---------
    /// * `geo`: observer location.
    /// * `theta0`: Greenwich sidereal time, degrees.
    /// * `distance`: geocentric distance of the body, Earth equatorial radii.
    ///
    /// Return
    /// ------
    /// * The topocentric coordinates and the topocentric distance.
    pub fn to_topocentric(
        &self,
        geo: &GeographicCoordinate,
        theta0: Degree,
        distance: EarthRadii,
    ) -> (Self, EarthRadii) {
        let body = self.to_rectangular(distance);
        let observer = geo.geocentric_vector(theta0);
        EquatorialCoordinate::from_rectangular(&(body - observer))
    }

    /// Angular separation from another equatorial position, degrees.
    pub fn separation(&self, other: &EquatorialCoordinate) -> Degree {
        angular_separation(self.alpha, self.delta, other.alpha, other.delta)
    }
}

impl Add for EquatorialCoordinate {
    type Output = EquatorialCoordinate;

    /// Apply a correction `(Δα, Δδ)`; right ascension is re-normalized.
    fn add(self, other: Self) -> Self::Output {
        EquatorialCoordinate::new(self.alpha + other.alpha, self.delta + other.delta)
    }
}

/// Sexagesimal split of `value` rounded to `decimals` digits on the seconds.
fn rounded_sexagesimal(value: f64, decimals: i32) -> (i8, u32, u32, f64) {
    let scale = 10f64.powi(decimals);
    let half = 0.5 / (3600.0 * scale);
    let (sign, units, minutes, seconds) = to_sexagesimal(value + half.copysign(value));
    (sign, units, minutes, (seconds * scale).trunc() / scale)
}

/// `12h30m45.0s -12°30'45"`
impl fmt::Display for EquatorialCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, h, m, s) = rounded_sexagesimal(self.alpha / 15.0, 1);
        let (sign, d, am, asec) = rounded_sexagesimal(self.delta, 0);
        let sign = if sign < 0 { '-' } else { '+' };
        write!(f, "{h:02}h{m:02}m{s:04.1}s {sign}{d:02}°{am:02}'{asec:02.0}\"")
    }
}

/// Ecliptical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticalCoordinate {
    pub lambda: Degree,
    pub beta: Degree,
}

impl EclipticalCoordinate {
    pub fn new(lambda: Degree, beta: Degree) -> Self {
        EclipticalCoordinate {
            lambda: to360(lambda),
            beta,
        }
    }

    pub fn to_equatorial(&self, epsilon: Degree) -> EquatorialCoordinate {
        let (sl, cl) = (self.lambda * RADEG).sin_cos();
        let (sb, cb) = (self.beta * RADEG).sin_cos();
        let v = ecliptic_to_equatorial(epsilon) * Vector3::new(cb * cl, cb * sl, sb);
        EquatorialCoordinate::from_rectangular(&v).0
    }
}

/// Local horizontal coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    /// Azimuth measured westward from the south, degrees in `[0, 360)`.
    pub azimuth: Degree,
    pub altitude: Degree,
}

impl HorizontalCoordinate {
    /// Azimuth measured eastward from the north.
    pub fn azimuth_from_north(&self) -> Degree {
        to360(self.azimuth + 180.0)
    }
}

/// Galactic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalacticCoordinate {
    pub l: Degree,
    pub b: Degree,
}

impl GalacticCoordinate {
    pub fn to_equatorial(&self) -> EquatorialCoordinate {
        let dl = (GALACTIC_NODE + 90.0 - self.l) * RADEG;
        let b = self.b * RADEG;
        let dg = GALACTIC_POLE_DELTA * RADEG;

        let sin_d = b.sin() * dg.sin() + b.cos() * dg.cos() * dl.cos();
        let x = b.cos() * dl.sin();
        let y = b.sin() * dg.cos() - b.cos() * dg.sin() * dl.cos();

        EquatorialCoordinate::new(
            GALACTIC_POLE_ALPHA + x.atan2(y) / RADEG,
            sin_d.clamp(-1.0, 1.0).asin() / RADEG,
        )
    }
}

/// A place on the Earth ellipsoid.
///
/// Equality is structural, name included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeographicCoordinate {
    /// Geodetic latitude, degrees, north positive.
    pub latitude: Degree,
    /// Longitude, degrees in `[-180, 180)`, east positive.
    pub longitude: Degree,
    /// Height above the ellipsoid, meters.
    pub elevation: f64,
    /// Offset of local civil time from UTC, hours.
    pub utc_offset: f64,
    pub name: String,
}

impl GeographicCoordinate {
    pub fn new(latitude: Degree, longitude: Degree) -> Self {
        GeographicCoordinate {
            latitude,
            longitude: to180(longitude),
            ..Default::default()
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_utc_offset(mut self, utc_offset: f64) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// `ρ·cos φ′`, distance to the rotation axis in Earth equatorial radii.
    pub fn rho_cos_phi(&self) -> f64 {
        lat_alt_to_parallax(self.latitude * RADEG, self.elevation).0
    }

    /// `ρ·sin φ′`, distance to the equatorial plane in Earth equatorial radii.
    pub fn rho_sin_phi(&self) -> f64 {
        lat_alt_to_parallax(self.latitude * RADEG, self.elevation).1
    }

    /// Geocentric position vector in the equatorial frame of date, Earth equatorial radii.
    ///
    /// Arguments
    /// ---------
    /// * `theta0`: Greenwich sidereal time, degrees.
    pub fn geocentric_vector(&self, theta0: Degree) -> Vector3<f64> {
        let (rho_cos_phi, rho_sin_phi) = lat_alt_to_parallax(self.latitude * RADEG, self.elevation);
        let (st, ct) = ((theta0 + self.longitude) * RADEG).sin_cos();
        Vector3::new(rho_cos_phi * ct, rho_cos_phi * st, rho_sin_phi)
    }

    /// Great-circle distance to another place, degrees of arc.
    pub fn angular_distance(&self, other: &GeographicCoordinate) -> Degree {
        angular_separation(self.longitude, self.latitude, other.longitude, other.latitude)
    }
}

/// `40°42'46"N 74°00'22"W`, followed by the name in parentheses when there is one.
impl fmt::Display for GeographicCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lat_sign, lat_d, lat_m, lat_s) = rounded_sexagesimal(self.latitude, 0);
        let (lon_sign, lon_d, lon_m, lon_s) = rounded_sexagesimal(self.longitude, 0);
        let ns = if lat_sign < 0 { 'S' } else { 'N' };
        let ew = if lon_sign < 0 { 'W' } else { 'E' };
        write!(
            f,
            "{lat_d}°{lat_m:02}'{lat_s:02.0}\"{ns} {lon_d}°{lon_m:02}'{lon_s:02.0}\"{ew}"
        )?;
        if !self.name.is_empty() {
            write!(f, " ({})", self.name)?;
        }
        Ok(())
    }
}

/// Convert a geodetic latitude (radians) and a height (meters) into the parallax factors
/// `(ρ·cos φ′, ρ·sin φ′)`.
///
/// The parametric latitude `u`, with `tan u = (b/a)·tan φ`, places the foot of the normal on the
/// ellipsoid; the height is then added along the normal.
fn lat_alt_to_parallax(lat: f64, height: f64) -> (f64, f64) {
    let axis_ratio = EARTH_POLAR_RADIUS_KM / EARTH_EQUATORIAL_RADIUS_KM;
    let h = height / (EARTH_EQUATORIAL_RADIUS_KM * 1000.0);

    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + h * lat.sin();
    let rho_cos_phi = u.cos() + h * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}

/// Parallactic angle of a body, degrees.
///
/// ```text
/// tan q = sin H / (tan φ · cos δ − sin δ · cos H)
/// ```
/// Positive west of the meridian, negative east of it; the quadrant comes from `atan2`.
///
/// Arguments
/// ---------
/// * `hour_angle`: local hour angle `H`, degrees.
/// * `delta`: declination, degrees.
/// * `latitude`: observer latitude, degrees.
pub fn parallactic_angle(hour_angle: Degree, delta: Degree, latitude: Degree) -> Degree {
    let h = hour_angle * RADEG;
    let d = delta * RADEG;
    let phi = latitude * RADEG;
    h.sin().atan2(phi.tan() * d.cos() - d.sin() * h.cos()) / RADEG
}

#[cfg(test)]
mod coordinates_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn palomar() -> GeographicCoordinate {
        GeographicCoordinate::new(33.356111, -116.8625)
            .with_elevation(1706.0)
            .with_name("Palomar")
    }

    #[test]
    fn test_parallax_factors() {
        // Meeus, example 11.a
        let geo = palomar();
        assert_abs_diff_eq!(geo.rho_sin_phi(), 0.546861, epsilon = 1e-6);
        assert_abs_diff_eq!(geo.rho_cos_phi(), 0.836339, epsilon = 1e-6);
    }

    #[test]
    fn test_topocentric_mars() {
        // Meeus, example 40.a (Mars from Palomar, 2003 Aug 28)
        let mars = EquatorialCoordinate::new(339.530208, -15.771083);
        let distance = 0.37276 * crate::constants::AU_EARTH_RADII;
        let (topo, _) = mars.to_topocentric(&palomar(), 25.188508, distance);
        assert_abs_diff_eq!(topo.alpha, 339.535583, epsilon = 5e-5);
        assert_abs_diff_eq!(topo.delta, -15.775, epsilon = 5e-5);
    }

    #[test]
    fn test_horizontal_venus() {
        // Meeus, example 13.b (Venus from the US Naval Observatory)
        let venus = EquatorialCoordinate::new(347.3193375, -6.719892);
        let usno = GeographicCoordinate::new(38.921389, -77.065556);
        let hor = venus.to_horizontal(&usno, 128.7378734);
        assert_abs_diff_eq!(hor.azimuth, 68.0337, epsilon = 1e-3);
        assert_abs_diff_eq!(hor.altitude, 15.1249, epsilon = 1e-3);
        assert_abs_diff_eq!(hor.azimuth_from_north(), 248.0337, epsilon = 1e-3);
    }

    #[test]
    fn test_ecliptical_round_trip() {
        // Meeus, example 13.a (Pollux)
        let pollux = EquatorialCoordinate::new(116.328942, 28.026183);
        let ecl = pollux.to_ecliptical(23.4392911);
        assert_abs_diff_eq!(ecl.lambda, 113.215630, epsilon = 1e-5);
        assert_abs_diff_eq!(ecl.beta, 6.684170, epsilon = 1e-5);

        let back = ecl.to_equatorial(23.4392911);
        assert_abs_diff_eq!(back.alpha, pollux.alpha, epsilon = 1e-10);
        assert_abs_diff_eq!(back.delta, pollux.delta, epsilon = 1e-10);
    }

    #[test]
    fn test_galactic() {
        let center = EquatorialCoordinate::new(266.40499, -28.93617).to_galactic();
        assert_abs_diff_eq!(to180(center.l), 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(center.b, 0.0, epsilon = 1e-4);

        let pole = GalacticCoordinate { l: 0.0, b: 90.0 }.to_equatorial();
        assert_abs_diff_eq!(pole.delta, GALACTIC_POLE_DELTA, epsilon = 1e-9);

        let any = EquatorialCoordinate::new(10.0, 41.0);
        let back = any.to_galactic().to_equatorial();
        assert_abs_diff_eq!(back.alpha, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(back.delta, 41.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rectangular_and_add() {
        let eq = EquatorialCoordinate::new(350.0, 10.0);
        let (back, r) = EquatorialCoordinate::from_rectangular(&eq.to_rectangular(60.0));
        assert_abs_diff_eq!(r, 60.0, epsilon = 1e-12);
        assert_abs_diff_eq!(back.alpha, 350.0, epsilon = 1e-10);

        let corrected = eq + EquatorialCoordinate { alpha: 15.0, delta: -0.5 };
        assert_abs_diff_eq!(corrected.alpha, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(corrected.delta, 9.5, epsilon = 1e-12);
    }

    #[test]
    fn test_geographic_equality() {
        let a = GeographicCoordinate::new(45.0, 190.0).with_name("x");
        assert_abs_diff_eq!(a.longitude, -170.0, epsilon = 1e-12);
        assert_eq!(a.clone(), a);
        assert_ne!(a.clone().with_name("y"), a);
    }

    #[test]
    fn test_display_sexagesimal() {
        let eq = EquatorialCoordinate::new(187.6875, -12.5125);
        assert_eq!(eq.to_string(), "12h30m45.0s -12°30'45\"");

        let near_zero = EquatorialCoordinate::new(0.0, -0.3);
        assert_eq!(near_zero.to_string(), "00h00m00.0s -00°18'00\"");

        let new_york = GeographicCoordinate::new(40.7128, -74.006);
        assert_eq!(new_york.to_string(), "40°42'46\"N 74°00'22\"W");

        // Rounding carries into the minutes and degrees
        let carried = GeographicCoordinate::new(10.0 - 1e-7, 20.0).with_name("Somewhere");
        assert_eq!(carried.to_string(), "10°00'00\"N 20°00'00\"E (Somewhere)");

        assert_eq!(
            palomar().to_string(),
            "33°21'22\"N 116°51'45\"W (Palomar)"
        );
    }

    #[test]
    fn test_parallactic_angle() {
        assert_abs_diff_eq!(parallactic_angle(0.0, 10.0, 45.0), 0.0, epsilon = 1e-12);
        assert!(parallactic_angle(30.0, 10.0, 45.0) > 0.0);
        assert!(parallactic_angle(-30.0, 10.0, 45.0) < 0.0);
    }
}
