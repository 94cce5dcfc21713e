//! # Solar eclipse seen from a place
//!
//! The observer is moved onto the fundamental plane, `(ξ, η, ζ)`, and the instants of maximum
//! and contacts are iterated on the polynomial elements following the *Explanatory Supplement to
//! the Astronomical Almanac*:
//!
//! ```text
//! u = X − ξ          v = Y − η
//! a = X′ − ξ′        b = Y′ − η′        n² = a² + b²
//! ξ′ = μ′·ρ cos φ′·cos H
//! η′ = μ′·ξ·sin d − ζ·d′
//! ```
//!
//! * maximum: `τ = −(u·a + v·b) / n²`;
//! * contacts with a shadow of radius `L` in the observer's plane (`L1 − ζ·tan f1` for the
//!   partial phase, `|L2 − ζ·tan f2|` for the total or annular phase):
//!   `S = (a·v − u·b) / (n·L)`, `τ = −(u·a + v·b) / n² ∓ (L / n)·√(1 − S²)`.
//!
//! Each correction `τ` (hours) is applied until it drops below the contact tolerance. `|S| > 1`
//! means the phase does not happen at this place.
//!
//! Magnitude is `(L1′ − m) / (L1′ + L2′)` with `m = √(u² + v²)` at maximum; obscuration is the
//! fraction of the solar disk covered, from the overlap of the two disks.
use serde::{Deserialize, Serialize};

use crate::besselian::InstantBesselianElements;
use crate::constants::{Degree, JulianDay, MINUTES_PER_DAY, RADEG};
use crate::coordinates::{parallactic_angle, GeographicCoordinate};
use crate::geometry::circles::{overlap_area, Circle};
use crate::local_circumstances::{
    compute_local_circumstances, ContactElements, ContactKind, EclipsedBody, LocalCircumstances,
};
use crate::map::projection::{fundamental_coordinates, ROTATION_PER_SECOND};
use crate::polynomial_elements::PolynomialBesselianElements;
use crate::search::SearchParams;
use crate::umbra_errors::UmbraError;

impl EclipsedBody for InstantBesselianElements {
    fn jd(&self) -> JulianDay {
        self.jd
    }

    /// Altitude and parallactic angle of the Sun, taken along the shadow axis.
    fn horizon(&self, place: &GeographicCoordinate) -> (Degree, Degree) {
        let hour_angle = self.mu + place.longitude - ROTATION_PER_SECOND * self.delta_t;
        let (h, d, phi) = (hour_angle * RADEG, self.d * RADEG, place.latitude * RADEG);

        let altitude = (d.sin() * phi.sin() + d.cos() * phi.cos() * h.cos())
            .clamp(-1.0, 1.0)
            .asin()
            / RADEG;
        (altitude, parallactic_angle(hour_angle, self.d, place.latitude))
    }
}

/// Kind of a solar eclipse at one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalEclipseType {
    Partial,
    Annular,
    Total,
}

/// A solar eclipse seen from one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarLocalCircumstances {
    pub eclipse_type: LocalEclipseType,
    /// Fraction of the solar diameter covered at maximum.
    pub magnitude: f64,
    /// Fraction of the solar disk area covered at maximum.
    pub obscuration: f64,
    /// Duration of the total or annular phase, minutes.
    pub central_duration: Option<f64>,
    /// Maximum and first to fourth contacts, with the Sun's altitude and parallactic angle.
    pub circumstances: LocalCircumstances<InstantBesselianElements>,
}

impl SolarLocalCircumstances {
    pub fn maximum(&self) -> Option<JulianDay> {
        self.circumstances
            .contact(ContactKind::Maximum)
            .map(|c| c.jd)
    }
}

/// Geometry of the observer against the shadow at one instant.
struct ObserverState {
    elements: InstantBesselianElements,
    u: f64,
    v: f64,
    a: f64,
    b: f64,
    /// Penumbral radius in the observer's plane.
    l1: f64,
    /// Umbral radius in the observer's plane, negative for a total eclipse.
    l2: f64,
}

impl ObserverState {
    fn at(
        elements: &PolynomialBesselianElements,
        place: &GeographicCoordinate,
        jd: JulianDay,
    ) -> Result<Self, UmbraError> {
        let el = elements.evaluate(jd)?;
        let rates = elements.rates(jd)?;
        let p = fundamental_coordinates(&el, place);

        let h = (el.mu + place.longitude - ROTATION_PER_SECOND * el.delta_t) * RADEG;
        let d = el.d * RADEG;
        let mu_rate = rates.dmu * RADEG;
        let d_rate = rates.dd * RADEG;

        let xi_rate = mu_rate * place.rho_cos_phi() * h.cos();
        let eta_rate = mu_rate * p.xi * d.sin() - p.zeta * d_rate;

        Ok(ObserverState {
            u: el.x - p.xi,
            v: el.y - p.eta,
            a: rates.dx - xi_rate,
            b: rates.dy - eta_rate,
            l1: el.l1 - p.zeta * el.tan_f1,
            l2: el.l2 - p.zeta * el.tan_f2,
            elements: el,
        })
    }

    fn n2(&self) -> f64 {
        self.a * self.a + self.b * self.b
    }

    /// Hours to the instant of least distance to the shadow axis.
    fn to_maximum(&self) -> f64 {
        -(self.u * self.a + self.v * self.b) / self.n2()
    }

    fn axis_distance(&self) -> f64 {
        self.u.hypot(self.v)
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Partial,
    Central,
}

/// Iterate `step` from `jd` until the correction (hours) is below `tolerance` days.
fn converge<F>(
    mut jd: JulianDay,
    params: &SearchParams,
    what: &str,
    mut step: F,
) -> Result<Option<JulianDay>, UmbraError>
where
    F: FnMut(JulianDay) -> Result<Option<f64>, UmbraError>,
{
    for _ in 0..params.max_refinement_iterations {
        let Some(tau) = step(jd)? else {
            return Ok(None);
        };
        jd += tau / 24.0;
        if (tau / 24.0).abs() < params.contact_tolerance_days {
            return Ok(Some(jd));
        }
    }
    Err(UmbraError::non_convergence(
        what,
        params.max_refinement_iterations,
    ))
}

/// Contact of `phase` before (`sign = −1`) or after (`sign = +1`) the maximum.
fn contact(
    elements: &PolynomialBesselianElements,
    place: &GeographicCoordinate,
    maximum: JulianDay,
    phase: Phase,
    sign: f64,
    params: &SearchParams,
) -> Result<Option<JulianDay>, UmbraError> {
    converge(maximum, params, "local contact", |jd| {
        let s = ObserverState::at(elements, place, jd)?;
        let radius = match phase {
            Phase::Partial => s.l1,
            Phase::Central => s.l2.abs(),
        };
        let n = s.n2().sqrt();
        let sin_s = (s.a * s.v - s.u * s.b) / (n * radius);
        if sin_s.abs() > 1.0 {
            return Ok(None);
        }
        Ok(Some(
            s.to_maximum() + sign * radius / n * (1.0 - sin_s * sin_s).sqrt(),
        ))
    })
}

/// Circumstances of a solar eclipse at `place`.
///
/// Arguments
/// ---------
/// * `elements`: polynomial Besselian elements covering the eclipse.
/// * `place`: the observer.
/// * `params`: iteration bound and tolerance of the contact iterations.
///
/// Return
/// ------
/// * `None` when the eclipse is not seen from `place` (the penumbra misses it), whether or not
///   the Sun is above the horizon. Otherwise the maximum, the first and fourth contacts and,
///   for a total or annular eclipse at the place, the second and third contacts.
///
/// Errors
/// ------
/// * [`UmbraError::OutOfValidityWindow`] if the iteration leaves the window of `elements`.
/// * [`UmbraError::NonConvergence`] if an instant does not settle within
///   `params.max_refinement_iterations` corrections.
pub fn solar_local_circumstances(
    elements: &PolynomialBesselianElements,
    place: &GeographicCoordinate,
    params: &SearchParams,
) -> Result<Option<SolarLocalCircumstances>, UmbraError> {
    let Some(maximum) = converge(elements.jd0, params, "local maximum", |jd| {
        Ok(Some(ObserverState::at(elements, place, jd)?.to_maximum()))
    })?
    else {
        return Ok(None);
    };

    let at_max = ObserverState::at(elements, place, maximum)?;
    let m = at_max.axis_distance();
    if m >= at_max.l1 {
        log::debug!("penumbra misses {:?} at JD {maximum}", place.name);
        return Ok(None);
    }

    let magnitude = (at_max.l1 - m) / (at_max.l1 + at_max.l2);
    let eclipse_type = if m >= at_max.l2.abs() {
        LocalEclipseType::Partial
    } else if at_max.l2 < 0.0 {
        LocalEclipseType::Total
    } else {
        LocalEclipseType::Annular
    };

    // Sun of radius 1 and Moon of radius k, centers m apart, in units of the solar radius
    let sun_radius = 0.5 * (at_max.l1 + at_max.l2);
    let moon_radius = 0.5 * (at_max.l1 - at_max.l2) / sun_radius;
    let obscuration = overlap_area(
        &Circle::unit(),
        &Circle::new(m / sun_radius, 0.0, moon_radius),
    ) / std::f64::consts::PI;

    let evaluate = |jd: Option<JulianDay>| jd.map(|jd| elements.evaluate(jd)).transpose();
    let c1 = contact(elements, place, maximum, Phase::Partial, -1.0, params)?;
    let c4 = contact(elements, place, maximum, Phase::Partial, 1.0, params)?;
    let (c2, c3) = match eclipse_type {
        LocalEclipseType::Partial => (None, None),
        _ => (
            contact(elements, place, maximum, Phase::Central, -1.0, params)?,
            contact(elements, place, maximum, Phase::Central, 1.0, params)?,
        ),
    };
    let central_duration = c2
        .zip(c3)
        .map(|(begin, end)| (end - begin) * MINUTES_PER_DAY);

    let snapshots = ContactElements {
        partial_begin: evaluate(c1)?,
        total_begin: evaluate(c2)?,
        maximum: Some(at_max.elements),
        total_end: evaluate(c3)?,
        partial_end: evaluate(c4)?,
        ..Default::default()
    };

    Ok(Some(SolarLocalCircumstances {
        eclipse_type,
        magnitude,
        obscuration,
        central_duration,
        circumstances: compute_local_circumstances(&snapshots, place),
    }))
}

#[cfg(test)]
mod solar_local_test {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;
    use approx::assert_abs_diff_eq;

    const TOLERANCE: f64 = 2e-4;

    fn elements_2017() -> PolynomialBesselianElements {
        PolynomialBesselianElements::from_ephemeris(
            &LowPrecisionEphemeris,
            2457987.25,
            2.0 / 24.0,
            68.4,
        )
        .unwrap()
    }

    fn jd_of(local: &SolarLocalCircumstances, kind: ContactKind) -> JulianDay {
        local.circumstances.contact(kind).unwrap().jd
    }

    #[test]
    fn test_carbondale_total() {
        let place = GeographicCoordinate::new(37.7267, -89.2167)
            .with_elevation(120.0)
            .with_name("Carbondale");
        let local = solar_local_circumstances(&elements_2017(), &place, &SearchParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(local.eclipse_type, LocalEclipseType::Total);
        assert_abs_diff_eq!(local.magnitude, 1.0125, epsilon = 2e-3);
        assert_abs_diff_eq!(local.obscuration, 1.0, epsilon = 1e-12);

        assert_abs_diff_eq!(local.maximum().unwrap(), 2457987.26605, epsilon = TOLERANCE);
        assert_abs_diff_eq!(
            jd_of(&local, ContactKind::PartialBegin),
            2457987.20426,
            epsilon = TOLERANCE
        );
        assert_abs_diff_eq!(
            jd_of(&local, ContactKind::TotalBegin),
            2457987.26514,
            epsilon = TOLERANCE
        );
        assert_abs_diff_eq!(
            jd_of(&local, ContactKind::PartialEnd),
            2457987.32579,
            epsilon = TOLERANCE
        );

        // Published totality lasts 2m41s
        assert_abs_diff_eq!(local.central_duration.unwrap(), 2.62, epsilon = 0.1);

        let max = local.circumstances.contact(ContactKind::Maximum).unwrap();
        assert_abs_diff_eq!(max.altitude, 63.67, epsilon = 0.05);
        assert_abs_diff_eq!(max.parallactic_angle, 9.87, epsilon = 0.1);
    }

    #[test]
    fn test_chicago_partial() {
        let place = GeographicCoordinate::new(41.8781, -87.6298).with_elevation(180.0);
        let local = solar_local_circumstances(&elements_2017(), &place, &SearchParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(local.eclipse_type, LocalEclipseType::Partial);
        assert_abs_diff_eq!(local.magnitude, 0.8887, epsilon = 2e-3);
        assert_abs_diff_eq!(local.obscuration, 0.8665, epsilon = 3e-3);
        assert!(local.central_duration.is_none());
        assert_eq!(local.circumstances.contacts.len(), 3);
        assert!(local
            .circumstances
            .contact(ContactKind::TotalBegin)
            .is_none());
    }

    #[test]
    fn test_outside_penumbra() {
        let place = GeographicCoordinate::new(-33.8688, 151.2093);
        let local =
            solar_local_circumstances(&elements_2017(), &place, &SearchParams::default()).unwrap();
        assert!(local.is_none());
    }
}
