//! # Contacts on polynomial elements
//!
//! Once an eclipse has been found and its elements fitted, the contact instants are located on the
//! element polynomials:
//!
//! * the instant of greatest eclipse is the minimum of the squared axis distance, refined by
//!   [`parabolic_extremum`];
//! * each contact is a zero of `distance − limit` on one side of that minimum, located by
//!   [`bisect`].
//!
//! For solar eclipses the Earth is taken as the unit circle of the fundamental plane:
//!
//! | contacts | condition |
//! |---|---|
//! | P1, P4 | `m = 1 + L1` |
//! | U1, U4 | `m = 1 + |L2|` |
//! | C1, C2 | `m = 1` |
//!
//! For lunar eclipses, with `r` the distance of the Moon from the shadow axis: P1/P4 at
//! `r = f1 + f3`, U1/U4 at `r = f2 + f3`, U2/U3 at `r = f2 − f3`.
//!
//! A phase that does not happen gives `None`. A phase that does happen but whose contacts fall
//! outside the validity window of the polynomials is an [`UmbraError::OutOfValidityWindow`]: the
//! elements must be refitted over a longer window.
use serde::{Deserialize, Serialize};

use crate::constants::JulianDay;
use crate::numerics::{bisect, parabolic_extremum};
use crate::polynomial_elements::{PolynomialBesselianElements, PolynomialLunarEclipseElements};
use crate::search::lunar::LunarEclipseContacts;
use crate::search::SearchParams;
use crate::umbra_errors::UmbraError;

const MAX_BISECTIONS: usize = 100;

/// Geocentric contacts of a solar eclipse, JD (TT).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarContactTimes {
    /// Instant of least distance between the shadow axis and the center of the Earth.
    pub greatest: JulianDay,
    /// That least distance, Earth radii, with the sign of `Y`.
    pub gamma: f64,
    pub p1: Option<JulianDay>,
    pub u1: Option<JulianDay>,
    pub c1: Option<JulianDay>,
    pub c2: Option<JulianDay>,
    pub u4: Option<JulianDay>,
    pub p4: Option<JulianDay>,
}

/// Minimum of a squared distance inside `window`, by parabolic refinement from `t0`.
fn closest_approach<F>(
    mut squared_distance: F,
    t0: JulianDay,
    window: (JulianDay, JulianDay),
    params: &SearchParams,
) -> Result<JulianDay, UmbraError>
where
    F: FnMut(f64) -> Result<f64, UmbraError>,
{
    let (start, end) = window;
    let half_width = (end - start) / 32.0;
    let t0 = t0.clamp(start + half_width, end - half_width);

    let extremum = parabolic_extremum(
        &mut squared_distance,
        t0,
        half_width,
        params.contact_tolerance_days,
        params.max_refinement_iterations,
    )?;
    Ok(extremum.t)
}

/// Zeros of `g` before and after `middle`, or `None` when `g(middle) ≥ 0`.
fn contact_pair<G>(
    mut g: G,
    middle: JulianDay,
    window: (JulianDay, JulianDay),
    params: &SearchParams,
) -> Result<Option<(JulianDay, JulianDay)>, UmbraError>
where
    G: FnMut(f64) -> Result<f64, UmbraError>,
{
    if g(middle)? >= 0.0 {
        return Ok(None);
    }

    let (start, end) = window;
    for edge in [start, end] {
        if g(edge)? < 0.0 {
            return Err(UmbraError::OutOfValidityWindow {
                jd: edge,
                start,
                end,
            });
        }
    }

    let tolerance = params.contact_tolerance_days;
    let first = bisect(&mut g, start, middle, tolerance, MAX_BISECTIONS)?;
    let last = bisect(&mut g, middle, end, tolerance, MAX_BISECTIONS)?;
    Ok(Some((first, last)))
}

/// Locate the greatest eclipse and the geocentric contacts of a solar eclipse.
///
/// Arguments
/// ---------
/// * `elements`: polynomial Besselian elements covering the whole eclipse.
/// * `params`: refinement bounds and bisection tolerance.
///
/// Return
/// ------
/// * The contact instants; contacts of phases that do not occur are `None`.
///
/// Errors
/// ------
/// * [`UmbraError::OutOfValidityWindow`] if a phase extends past the polynomial window.
/// * [`UmbraError::NonConvergence`] if the refinement of the greatest eclipse fails.
pub fn find_solar_contacts(
    elements: &PolynomialBesselianElements,
    params: &SearchParams,
) -> Result<SolarContactTimes, UmbraError> {
    let window = elements.window();

    // Linear guess of the closest approach from the motion at the epoch
    let at_epoch = elements.evaluate(elements.jd0)?;
    let rates = elements.rates(elements.jd0)?;
    let speed2 = rates.dx * rates.dx + rates.dy * rates.dy;
    let guess = if speed2 > 0.0 {
        elements.jd0 - (at_epoch.x * rates.dx + at_epoch.y * rates.dy) / speed2 / 24.0
    } else {
        elements.jd0
    };

    let greatest = closest_approach(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.x * e.x + e.y * e.y)
        },
        guess,
        window,
        params,
    )?;
    let at_greatest = elements.evaluate(greatest)?;
    let gamma = at_greatest.axis_distance().copysign(at_greatest.y);
    log::debug!("greatest solar eclipse at JD {greatest}, gamma {gamma:.5}");

    let penumbra = contact_pair(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.axis_distance() - 1.0 - e.l1)
        },
        greatest,
        window,
        params,
    )?;
    let umbra = contact_pair(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.axis_distance() - 1.0 - e.l2.abs())
        },
        greatest,
        window,
        params,
    )?;
    let central = contact_pair(
        |t| Ok(elements.evaluate(t)?.axis_distance() - 1.0),
        greatest,
        window,
        params,
    )?;

    Ok(SolarContactTimes {
        greatest,
        gamma,
        p1: penumbra.map(|p| p.0),
        u1: umbra.map(|u| u.0),
        c1: central.map(|c| c.0),
        c2: central.map(|c| c.1),
        u4: umbra.map(|u| u.1),
        p4: penumbra.map(|p| p.1),
    })
}

/// Locate the maximum and the contacts of a lunar eclipse.
///
/// Arguments
/// ---------
/// * `elements`: polynomial lunar eclipse elements covering the whole eclipse.
/// * `params`: refinement bounds and bisection tolerance.
///
/// Return
/// ------
/// * `None` if the Moon does not enter the penumbra within the window, the seven contacts
///   otherwise (umbral and total contacts `None` when those phases do not occur).
///
/// Errors
/// ------
/// * [`UmbraError::OutOfValidityWindow`] if a phase extends past the polynomial window.
pub fn find_lunar_contacts(
    elements: &PolynomialLunarEclipseElements,
    params: &SearchParams,
) -> Result<Option<LunarEclipseContacts>, UmbraError> {
    let window = elements.window();

    let maximum = closest_approach(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.x * e.x + e.y * e.y)
        },
        elements.jd0,
        window,
        params,
    )?;

    let Some((p1, p4)) = contact_pair(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.axis_distance() - (e.f1 + e.f3))
        },
        maximum,
        window,
        params,
    )?
    else {
        log::debug!("no penumbral contact around JD {maximum}");
        return Ok(None);
    };

    let partial = contact_pair(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.axis_distance() - (e.f2 + e.f3))
        },
        maximum,
        window,
        params,
    )?;
    let total = contact_pair(
        |t| {
            let e = elements.evaluate(t)?;
            Ok(e.axis_distance() - (e.f2 - e.f3))
        },
        maximum,
        window,
        params,
    )?;

    Ok(Some(LunarEclipseContacts {
        p1,
        u1: partial.map(|u| u.0),
        u2: total.map(|u| u.0),
        maximum,
        u3: total.map(|u| u.1),
        u4: partial.map(|u| u.1),
        p4,
    }))
}
