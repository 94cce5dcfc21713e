//! # Reference systems
//!
//! Rotation matrices and Earth-orientation quantities used to move between the equatorial and
//! ecliptical frames and between the mean equators of two epochs:
//!
//! - [`rotmt`]: elementary rotation about one principal axis,
//! - [`mean_obliquity`] / [`true_obliquity`]: obliquity of the ecliptic (IAU 1976),
//! - [`nutation`]: abbreviated nutation in longitude and obliquity (four main terms),
//! - [`precession_matrix`]: IAU 1976 precession between two epochs, through J2000.
//!
//! All epochs are Julian Days on the TT scale.
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{ArcSec, Degree, JulianDay, Radian, DAYS_PER_CENTURY, J2000, RADEG, RADSEC};
use crate::geometry::angle::to360;

/// Principal axis of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Julian centuries since J2000.
pub fn centuries_since_j2000(jd: JulianDay) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// Right-handed rotation matrix of angle `alpha` about a principal axis.
///
/// The rotation is **active**: `x' = R · x` is the vector `x` turned counter-clockwise by
/// `alpha` when looking down the axis toward the origin. The inverse (frame change the other way)
/// is the transpose.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `axis`: rotation axis.
///
/// Return
/// ------
/// * An orthonormal 3×3 matrix.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Mean obliquity of the ecliptic (IAU 1976), in degrees.
///
/// ```text
/// ε₀ = 23°26′21.448″ − 46.8150″·T − 0.00059″·T² + 0.001813″·T³
/// ```
/// with `T` in Julian centuries from J2000, evaluated with Horner's scheme.
pub fn mean_obliquity(jd: JulianDay) -> Degree {
    let ob0 = (23.0 * 3600.0 + 26.0 * 60.0) + 21.448;
    let ob1 = -46.8150;
    let ob2 = -0.00059;
    let ob3 = 0.001813;

    let t = centuries_since_j2000(jd);

    (((ob3 * t + ob2) * t + ob1) * t + ob0) / 3600.0
}

/// Nutation angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutation {
    /// Nutation in longitude Δψ, arcseconds.
    pub delta_psi: ArcSec,
    /// Nutation in obliquity Δε, arcseconds.
    pub delta_epsilon: ArcSec,
}

/// Abbreviated nutation (accuracy 0.5″ in Δψ, 0.1″ in Δε).
///
/// Only the four largest periodic terms are kept, driven by the longitude of the lunar ascending
/// node `Ω` and the mean longitudes of the Sun `L` and of the Moon `L′`:
///
/// ```text
/// Δψ = −17.20″ sin Ω − 1.32″ sin 2L − 0.23″ sin 2L′ + 0.21″ sin 2Ω
/// Δε =   9.20″ cos Ω + 0.57″ cos 2L + 0.10″ cos 2L′ − 0.09″ cos 2Ω
/// ```
pub fn nutation(jd: JulianDay) -> Nutation {
    let t = centuries_since_j2000(jd);

    let omega = to360(125.04452 - 1934.136261 * t) * RADEG;
    let l_sun = to360(280.4665 + 36000.7698 * t) * RADEG;
    let l_moon = to360(218.3165 + 481267.8813 * t) * RADEG;

    let delta_psi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin() - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let delta_epsilon = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos()
        + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    Nutation {
        delta_psi,
        delta_epsilon,
    }
}

/// True obliquity `ε = ε₀ + Δε`, in degrees.
pub fn true_obliquity(jd: JulianDay) -> Degree {
    mean_obliquity(jd) + arcsec_to_deg(nutation(jd).delta_epsilon)
}

/// Precession matrix from the mean equator of J2000 to the mean equator of `jd` (IAU 1976).
///
/// ```text
/// ζ = (0.6406161° + 0.0000839°·T + 0.0000050°·T²)·T
/// z = (0.6406161° + 0.0003041°·T + 0.0000051°·T²)·T
/// θ = (0.5567530° − 0.0001185°·T − 0.0000116°·T²)·T
///
/// x_date = Rz(z) · Ry(−θ) · Rz(ζ) · x_J2000
/// ```
fn precession_from_j2000(jd: JulianDay) -> Matrix3<f64> {
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = centuries_since_j2000(jd);

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    rotmt(z, Axis::Z) * rotmt(-theta, Axis::Y) * rotmt(zeta, Axis::Z)
}

/// Precession matrix between the mean equators of two epochs.
///
/// Arguments
/// ---------
/// * `jd_from`: epoch of the input mean equator (TT).
/// * `jd_to`: epoch of the output mean equator (TT).
///
/// Return
/// ------
/// * `R` such that `x_to = R · x_from`. The path goes through J2000.
pub fn precession_matrix(jd_from: JulianDay, jd_to: JulianDay) -> Matrix3<f64> {
    precession_from_j2000(jd_to) * precession_from_j2000(jd_from).transpose()
}

/// Rotation taking ecliptical rectangular coordinates to equatorial ones, for obliquity `epsilon`.
pub fn ecliptic_to_equatorial(epsilon: Degree) -> Matrix3<f64> {
    rotmt(epsilon * RADEG, Axis::X)
}

/// Convert arcseconds to degrees.
pub fn arcsec_to_deg(value: ArcSec) -> Degree {
    value * RADSEC / RADEG
}
