//! # Eclipse maps
//!
//! Turns polynomial Besselian elements into the curves drawn on a solar eclipse map.
//!
//! The window of the elements is sampled every `time_step_minutes`. The work is done in two
//! passes:
//!
//! 1. **Per sample** (independent, parallel under the `parallel` feature): evaluate the elements,
//!    project the shadow axis (central line) and intersect the penumbra with the Earth limb
//!    (rise/set points).
//! 2. **Per pair of adjacent samples** (also parallel): the direction of motion of the shadow,
//!    from the finite difference of `X` and `Y`, gives the northern and southern limits of the
//!    umbra and the penumbra. Each limit point is refined with the radius of the shadow in the
//!    observer's plane, `L − ζ·tan f`.
//!
//! Rise/set points are then assembled sequentially into [`Curve`]s. A new curve is started each
//! time the penumbra comes back onto the limb after having been wholly inside the Earth disk, so
//! an eclipse whose penumbra at some point falls entirely on the Earth has separate sunrise and
//! sunset curves.
//!
//! Key points (greatest eclipse, P1, P4, C1, C2) come from
//! [`find_solar_contacts`](crate::search::contacts::find_solar_contacts).
//!
//! Submodules
//! -----------------
//! * [`projection`] – fundamental plane ⇄ Earth.
//! * [`curve`] – continuous open curves from an unordered stream of points.
use std::cmp::Ordering::Greater;

use itertools::Itertools;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::besselian::InstantBesselianElements;
use crate::constants::{JulianDay, MINUTES_PER_DAY};
use crate::coordinates::GeographicCoordinate;
use crate::geometry::circles::{intersect, Circle};
use crate::polynomial_elements::PolynomialBesselianElements;
use crate::search::contacts::{find_solar_contacts, SolarContactTimes};
use crate::search::SearchParams;
use crate::umbra_errors::UmbraError;

pub mod curve;
pub mod projection;

use curve::Curve;
use projection::{limb_flattening, project_limb_point, project_shadow_axis, project_to_earth};

/// Tunable parameters of the map builder.
///
/// Defaults
/// -----------------
/// * `time_step_minutes`: 2.0
/// * `bisection_tolerance_days`: 1e-7
/// * `limit_refinement_iterations`: 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapParams {
    /// Spacing of the samples, minutes of time.
    pub time_step_minutes: f64,
    /// Bracket width at which the contact instants are accepted, days.
    pub bisection_tolerance_days: f64,
    /// Number of `L − ζ·tan f` corrections applied to each limit point.
    pub limit_refinement_iterations: usize,
}

impl MapParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`MapParamsBuilder`] starting from the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use umbra::map::MapParams;
    ///
    /// let params = MapParams::builder().time_step_minutes(1.0).build().unwrap();
    /// assert_eq!(params.limit_refinement_iterations, 3);
    /// ```
    pub fn builder() -> MapParamsBuilder {
        MapParamsBuilder::new()
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Check the parameters, whether they come from the builder or were set field by field.
    ///
    /// Errors
    /// ------
    /// * [`UmbraError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), UmbraError> {
        if !Self::gt0(self.time_step_minutes) || !self.time_step_minutes.is_finite() {
            return Err(UmbraError::InvalidParameter(format!(
                "time_step_minutes must be finite and > 0, got {}",
                self.time_step_minutes
            )));
        }
        if !Self::gt0(self.bisection_tolerance_days) {
            return Err(UmbraError::InvalidParameter(format!(
                "bisection_tolerance_days must be > 0, got {}",
                self.bisection_tolerance_days
            )));
        }
        if self.limit_refinement_iterations == 0 {
            return Err(UmbraError::InvalidParameter(
                "limit_refinement_iterations must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MapParams {
    fn default() -> Self {
        MapParams {
            time_step_minutes: 2.0,
            bisection_tolerance_days: 1e-7,
            limit_refinement_iterations: 3,
        }
    }
}

/// Fluent builder for [`MapParams`].
#[derive(Debug, Clone, Default)]
pub struct MapParamsBuilder {
    params: MapParams,
}

impl MapParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_step_minutes(mut self, v: f64) -> Self {
        self.params.time_step_minutes = v;
        self
    }
    pub fn bisection_tolerance_days(mut self, v: f64) -> Self {
        self.params.bisection_tolerance_days = v;
        self
    }
    pub fn limit_refinement_iterations(mut self, v: usize) -> Self {
        self.params.limit_refinement_iterations = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Returns
    /// -----------------
    /// * `Err(UmbraError::InvalidParameter)` for a non-positive or non-finite step, a
    ///   non-positive tolerance, or a zero iteration count.
    pub fn build(self) -> Result<MapParams, UmbraError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// Curves and key points of a solar eclipse map.
///
/// Limits and the central line are in chronological order. Points that fall off the Earth are
/// simply missing, so a limit that leaves the Earth and comes back shows a jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseCurves {
    pub contacts: SolarContactTimes,
    /// Point of greatest eclipse; on the limb for a non-central eclipse.
    pub greatest: Option<GeographicCoordinate>,
    /// Where the eclipse begins at sunrise.
    pub p1: Option<GeographicCoordinate>,
    /// Where the eclipse ends at sunset.
    pub p4: Option<GeographicCoordinate>,
    /// Start of the central line.
    pub c1: Option<GeographicCoordinate>,
    /// End of the central line.
    pub c2: Option<GeographicCoordinate>,
    pub central_line: Vec<GeographicCoordinate>,
    pub umbra_north: Vec<GeographicCoordinate>,
    pub umbra_south: Vec<GeographicCoordinate>,
    pub penumbra_north: Vec<GeographicCoordinate>,
    pub penumbra_south: Vec<GeographicCoordinate>,
    /// Places where the eclipse begins or ends at sunrise or sunset.
    pub rise_set: Vec<Curve>,
}

/// Output of the first pass.
struct Sample {
    elements: InstantBesselianElements,
    center: Option<GeographicCoordinate>,
    limb: Vec<GeographicCoordinate>,
}

#[derive(Default)]
struct LimitPoints {
    umbra_north: Option<GeographicCoordinate>,
    umbra_south: Option<GeographicCoordinate>,
    penumbra_north: Option<GeographicCoordinate>,
    penumbra_south: Option<GeographicCoordinate>,
}

#[derive(Clone, Copy)]
enum Shadow {
    Penumbra,
    Umbra,
}

impl Shadow {
    /// Radius of the shadow in the plane of an observer at height `zeta`.
    fn radius(self, el: &InstantBesselianElements, zeta: f64) -> f64 {
        match self {
            Shadow::Penumbra => el.l1 - zeta * el.tan_f1,
            Shadow::Umbra => (el.l2 - zeta * el.tan_f2).abs(),
        }
    }
}

fn sample_at(
    elements: &PolynomialBesselianElements,
    jd: JulianDay,
) -> Result<Sample, UmbraError> {
    let el = elements.evaluate(jd)?;
    let center = project_shadow_axis(&el).map(|p| p.location);

    // The limb is the unit circle once η is divided by ρ1
    let rho1 = limb_flattening(el.d);
    let penumbra = Circle::new(el.x, el.y / rho1, el.l1);
    let limb: Vec<GeographicCoordinate> = intersect(&Circle::unit(), &penumbra)
        .points()
        .into_iter()
        .filter_map(|p| project_to_earth(&el, p.x, p.y * rho1))
        .map(|p| p.location)
        .collect();

    log::trace!(
        "map sample JD {jd}: axis {}, {} limb points",
        if center.is_some() { "on Earth" } else { "off Earth" },
        limb.len()
    );

    Ok(Sample {
        elements: el,
        center,
        limb,
    })
}

/// Limit of `shadow` on the side given by the unit `normal`, refined for the observer height.
fn limit_point(
    el: &InstantBesselianElements,
    normal: (f64, f64),
    shadow: Shadow,
    iterations: usize,
) -> Option<GeographicCoordinate> {
    let mut zeta = 0.0;
    let mut location = None;
    for _ in 0..iterations {
        let radius = shadow.radius(el, zeta);
        let point = project_to_earth(el, el.x + radius * normal.0, el.y + radius * normal.1)?;
        zeta = point.zeta;
        location = Some(point.location);
    }
    location
}

fn limits_between(current: &Sample, next: &Sample, params: &MapParams) -> LimitPoints {
    let el = &current.elements;
    let vx = next.elements.x - el.x;
    let vy = next.elements.y - el.y;
    let speed = vx.hypot(vy);
    if speed == 0.0 {
        return LimitPoints::default();
    }

    // Left of the motion, which runs toward +X, is north
    let north = (-vy / speed, vx / speed);
    let south = (-north.0, -north.1);
    let n = params.limit_refinement_iterations;

    LimitPoints {
        umbra_north: limit_point(el, north, Shadow::Umbra, n),
        umbra_south: limit_point(el, south, Shadow::Umbra, n),
        penumbra_north: limit_point(el, north, Shadow::Penumbra, n),
        penumbra_south: limit_point(el, south, Shadow::Penumbra, n),
    }
}

/// Place on the limb facing the shadow axis at `jd`.
fn limb_point_at(
    elements: &PolynomialBesselianElements,
    jd: Option<JulianDay>,
) -> Result<Option<GeographicCoordinate>, UmbraError> {
    let Some(jd) = jd else {
        return Ok(None);
    };
    let el = elements.evaluate(jd)?;
    Ok(project_limb_point(&el, el.x, el.y).map(|p| p.location))
}

/// Assemble rise/set points into curves, closing the current curve whenever a sample has no
/// point on the limb.
fn assemble_rise_set(samples: &[Sample]) -> Vec<Curve> {
    let mut curves = Vec::new();
    let mut current = Curve::new();

    for sample in samples {
        if sample.limb.is_empty() {
            if !current.is_empty() {
                log::debug!(
                    "rise/set curve closed at JD {} with {} points",
                    sample.elements.jd,
                    current.len()
                );
                curves.push(std::mem::take(&mut current));
            }
            continue;
        }
        for point in &sample.limb {
            current.push(point.clone());
        }
    }
    if !current.is_empty() {
        curves.push(current);
    }
    curves
}

/// Build the eclipse map with the default [`MapParams`].
pub fn build_eclipse_map(
    elements: &PolynomialBesselianElements,
) -> Result<EclipseCurves, UmbraError> {
    build_eclipse_map_with(elements, &MapParams::default())
}

/// Build the curves of a solar eclipse map from polynomial elements.
///
/// Arguments
/// ---------
/// * `elements`: polynomial Besselian elements whose window covers the whole eclipse, P1 to P4.
/// * `params`: sampling step, contact tolerance and limit refinement.
///
/// Return
/// ------
/// * The [`EclipseCurves`]. Curves of phases that do not occur (the central line of a partial
///   eclipse, for instance) are empty.
///
/// Errors
/// ------
/// * [`UmbraError::InvalidParameter`] if `params` fails [`MapParams::validate`].
/// * [`UmbraError::OutOfValidityWindow`] if a phase of the eclipse extends past the window of
///   the elements.
/// * [`UmbraError::NonConvergence`] if greatest eclipse cannot be located.
pub fn build_eclipse_map_with(
    elements: &PolynomialBesselianElements,
    params: &MapParams,
) -> Result<EclipseCurves, UmbraError> {
    params.validate()?;
    let search = SearchParams::builder()
        .contact_tolerance_days(params.bisection_tolerance_days)
        .build()?;
    let contacts = find_solar_contacts(elements, &search)?;

    let (start, end) = elements.window();
    let step = params.time_step_minutes / MINUTES_PER_DAY;
    let count = ((end - start) / step).floor() as usize + 1;
    let times: Vec<JulianDay> = (0..count)
        .map(|i| (start + i as f64 * step).min(end))
        .collect();
    log::debug!(
        "building eclipse map from {count} samples over JD [{start}, {end}]"
    );

    #[cfg(feature = "parallel")]
    let samples: Vec<Sample> = times
        .par_iter()
        .map(|&jd| sample_at(elements, jd))
        .collect::<Result<_, _>>()?;
    #[cfg(not(feature = "parallel"))]
    let samples: Vec<Sample> = times
        .iter()
        .map(|&jd| sample_at(elements, jd))
        .collect::<Result<_, _>>()?;

    let pairs: Vec<(&Sample, &Sample)> = samples.iter().tuple_windows().collect();

    #[cfg(feature = "parallel")]
    let limits: Vec<LimitPoints> = pairs
        .par_iter()
        .map(|&(current, next)| limits_between(current, next, params))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let limits: Vec<LimitPoints> = pairs
        .iter()
        .map(|&(current, next)| limits_between(current, next, params))
        .collect();

    let at_greatest = elements.evaluate(contacts.greatest)?;
    let greatest = project_shadow_axis(&at_greatest)
        .or_else(|| project_limb_point(&at_greatest, at_greatest.x, at_greatest.y))
        .map(|p| p.location);

    let central_line = samples.iter().filter_map(|s| s.center.clone()).collect();
    let rise_set = assemble_rise_set(&samples);

    let mut curves = EclipseCurves {
        contacts,
        greatest,
        p1: limb_point_at(elements, contacts.p1)?,
        p4: limb_point_at(elements, contacts.p4)?,
        c1: limb_point_at(elements, contacts.c1)?,
        c2: limb_point_at(elements, contacts.c2)?,
        central_line,
        umbra_north: Vec::new(),
        umbra_south: Vec::new(),
        penumbra_north: Vec::new(),
        penumbra_south: Vec::new(),
        rise_set,
    };

    for limit in limits {
        curves.umbra_north.extend(limit.umbra_north);
        curves.umbra_south.extend(limit.umbra_south);
        curves.penumbra_north.extend(limit.penumbra_north);
        curves.penumbra_south.extend(limit.penumbra_south);
    }

    Ok(curves)
}
