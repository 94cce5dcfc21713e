//! # Fundamental plane ⇄ Earth
//!
//! Points of the fundamental plane are projected along the shadow axis onto the Earth ellipsoid,
//! and geographic places are brought back onto the plane for local circumstances.
//!
//! The flattening is handled with the auxiliary quantities of the *Explanatory Supplement*:
//!
//! ```text
//! ρ1 = √(1 − e²·cos² d)
//! sin d1 = sin d / ρ1            cos d1 = √(1 − e²)·cos d / ρ1
//! η1 = η / ρ1                    ζ1 = √(1 − ξ² − η1²)
//! ```
//!
//! so that the Earth limb is the unit circle of the `(ξ, η1)` plane.
use serde::{Deserialize, Serialize};

use crate::besselian::InstantBesselianElements;
use crate::constants::{Degree, CIRCLE_EPS, EARTH_E2, RADEG, SECONDS_PER_DAY, SIDEREAL_RATE};
use crate::coordinates::GeographicCoordinate;
use crate::geometry::angle::to180;

/// Rotation of the Earth during ΔT, degrees per second of ΔT.
pub(crate) const ROTATION_PER_SECOND: f64 = SIDEREAL_RATE * 360.0 / SECONDS_PER_DAY;

/// Coordinates of a point with respect to the fundamental plane, Earth equatorial radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalPoint {
    pub xi: f64,
    pub eta: f64,
    /// Height above the plane, toward the Moon.
    pub zeta: f64,
}

/// A point of the Earth surface reached by projecting a point of the fundamental plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub location: GeographicCoordinate,
    /// Height of the surface point above the fundamental plane, Earth radii.
    pub zeta: f64,
}

struct Flattening {
    rho1: f64,
    sin_d1: f64,
    cos_d1: f64,
    /// `d1 − d`, radians.
    d1_minus_d: f64,
}

impl Flattening {
    fn new(d: Degree) -> Self {
        let d = d * RADEG;
        let rho1 = (1.0 - EARTH_E2 * d.cos().powi(2)).sqrt();
        let sin_d1 = d.sin() / rho1;
        let cos_d1 = (1.0 - EARTH_E2).sqrt() * d.cos() / rho1;
        Flattening {
            rho1,
            sin_d1,
            cos_d1,
            d1_minus_d: sin_d1.atan2(cos_d1) - d,
        }
    }
}

/// `ρ1` for a shadow axis of declination `d`: the Earth limb seen along the axis is the ellipse
/// `ξ² + (η / ρ1)² = 1`.
pub fn limb_flattening(d: Degree) -> f64 {
    Flattening::new(d).rho1
}

/// Project the point `(ξ, η)` of the fundamental plane onto the Earth along the shadow axis.
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements at the instant of interest.
/// * `xi`, `eta`: coordinates of the point on the fundamental plane, Earth radii.
///
/// Return
/// ------
/// * The geographic point (east longitude in `[-180, 180)`) with its height `ζ` above the
///   plane, or `None` when the point lies outside the Earth limb.
///
/// Remarks
/// -------
/// ```text
/// cos φ1·sin θ = ξ
/// cos φ1·cos θ = −η1·sin d1 + ζ1·cos d1
/// sin φ1       =  η1·cos d1 + ζ1·sin d1
/// tan φ = tan φ1 / √(1 − e²)
/// λ_W = μ − θ − 1.002738·15″·ΔT
/// ```
/// Points closer than 1e-7 outside the limb are put on the limb.
pub fn project_to_earth(
    elements: &InstantBesselianElements,
    xi: f64,
    eta: f64,
) -> Option<SurfacePoint> {
    let flat = Flattening::new(elements.d);
    let eta1 = eta / flat.rho1;

    let zeta1_sq = 1.0 - xi * xi - eta1 * eta1;
    if zeta1_sq < -CIRCLE_EPS {
        return None;
    }
    let zeta1 = zeta1_sq.max(0.0).sqrt();

    let cos_phi_cos_theta = -eta1 * flat.sin_d1 + zeta1 * flat.cos_d1;
    let sin_phi1 = (eta1 * flat.cos_d1 + zeta1 * flat.sin_d1).clamp(-1.0, 1.0);

    let theta = xi.atan2(cos_phi_cos_theta) / RADEG;
    let phi1 = sin_phi1.asin();
    let latitude = (phi1.tan() / (1.0 - EARTH_E2).sqrt()).atan() / RADEG;

    let west_longitude = elements.mu - theta - ROTATION_PER_SECOND * elements.delta_t;

    let zeta =
        flat.rho1 * (zeta1 * flat.d1_minus_d.cos() - eta1 * flat.d1_minus_d.sin());

    Some(SurfacePoint {
        location: GeographicCoordinate::new(latitude, to180(-west_longitude)),
        zeta,
    })
}

/// Project the shadow axis, the point `(X, Y)`.
pub fn project_shadow_axis(elements: &InstantBesselianElements) -> Option<SurfacePoint> {
    project_to_earth(elements, elements.x, elements.y)
}

/// Project the point of the Earth limb in the direction of `(ξ, η)` seen from the origin.
///
/// This is where a circle centered on `(ξ, η)` first touches the Earth disk: the sunrise or sunset
/// point of the P1, P4, C1 and C2 contacts. `None` for the origin itself.
pub fn project_limb_point(
    elements: &InstantBesselianElements,
    xi: f64,
    eta: f64,
) -> Option<SurfacePoint> {
    let rho1 = limb_flattening(elements.d);
    let eta1 = eta / rho1;
    let norm = xi.hypot(eta1);
    if norm < CIRCLE_EPS {
        return None;
    }
    project_to_earth(elements, xi / norm, eta1 / norm * rho1)
}

/// Fundamental plane coordinates of a place on the Earth.
///
/// ```text
/// H = μ + λ − 1.002738·15″·ΔT
/// ξ = ρ cos φ′ · sin H
/// η = ρ sin φ′ · cos d − ρ cos φ′ · sin d · cos H
/// ζ = ρ sin φ′ · sin d + ρ cos φ′ · cos d · cos H
/// ```
///
/// Arguments
/// ---------
/// * `elements`: Besselian elements at the instant of interest.
/// * `place`: observer, east longitude, elevation above the ellipsoid.
pub fn fundamental_coordinates(
    elements: &InstantBesselianElements,
    place: &GeographicCoordinate,
) -> FundamentalPoint {
    let h = (elements.mu + place.longitude - ROTATION_PER_SECOND * elements.delta_t) * RADEG;
    let d = elements.d * RADEG;
    let rho_cos = place.rho_cos_phi();
    let rho_sin = place.rho_sin_phi();

    FundamentalPoint {
        xi: rho_cos * h.sin(),
        eta: rho_sin * d.cos() - rho_cos * d.sin() * h.cos(),
        zeta: rho_sin * d.sin() + rho_cos * d.cos() * h.cos(),
    }
}
