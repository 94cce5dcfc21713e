//! # Eclipse search engine
//!
//! Finds the eclipse nearest to a given instant by walking lunations in one direction.
//!
//! For each candidate lunation `k` the mean elements of the Moon give the argument of latitude
//! `F`; when `|sin F| > 0.36` the Moon is too far from a node and the lunation is skipped outright.
//! Otherwise the periodic terms give the instant of maximum, `γ` and `u`, from which the
//! eclipse is classified in closed form (Meeus, *Astronomical Algorithms*, ch. 54). A lunation
//! whose magnitude test fails is skipped in the same way: the walk only stops on a real eclipse.
//!
//! Submodules
//! -----------------
//! * [`solar`] – [`find_nearest_solar_eclipse`](solar::find_nearest_solar_eclipse) and the
//!   [`SolarEclipse`](solar::SolarEclipse) record.
//! * [`lunar`] – [`find_nearest_lunar_eclipse`](lunar::find_nearest_lunar_eclipse) and the
//!   [`LunarEclipse`](lunar::LunarEclipse) record.
//! * [`saros`] – saros series and lunation numbering conventions.
//! * [`extremum`] – lunar apsides, declination and libration extremes by parabolic refinement.
//! * [`contacts`] – contact instants refined on polynomial elements.
//!
//! Cancellation
//! -----------------
//! The `_with` variants take an optional [`AtomicBool`]; it is polled between lunation
//! candidates and a raised flag ends the search with [`UmbraError::SearchCancelled`].
use std::cmp::Ordering::Greater;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::constants::JulianDay;
use crate::umbra_errors::UmbraError;

pub mod contacts;
pub mod extremum;
pub mod lunar;
pub(crate) mod lunation;
pub mod saros;
pub mod solar;

/// Direction of a search in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchDirection {
    /// First event at or after the starting instant.
    Forward,
    /// Last event at or before the starting instant.
    Backward,
}

impl SearchDirection {
    fn step(self) -> f64 {
        match self {
            SearchDirection::Forward => 1.0,
            SearchDirection::Backward => -1.0,
        }
    }

    fn accepts(self, event: JulianDay, start: JulianDay) -> bool {
        match self {
            SearchDirection::Forward => event >= start,
            SearchDirection::Backward => event <= start,
        }
    }
}

/// Tunable parameters of the eclipse and extremum searches.
///
/// Defaults
/// -----------------
/// * `max_lunations`: 300
/// * `convergence_minutes`: 1.0
/// * `max_refinement_iterations`: 50
/// * `sample_half_width_days`: 0.5
/// * `contact_tolerance_days`: 1e-7
///
/// Validation
/// -----------------
/// * `max_lunations ≥ 1`, `max_refinement_iterations ≥ 1`.
/// * `convergence_minutes > 0`, `sample_half_width_days > 0`, `contact_tolerance_days > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Upper bound on the number of lunations examined before giving up.
    pub max_lunations: usize,
    /// Parabolic refinement stops once the vertex moves by less than this, minutes of time.
    pub convergence_minutes: f64,
    /// Upper bound on parabolic refinement steps.
    pub max_refinement_iterations: usize,
    /// Half spacing of the three samples of a parabolic refinement, days.
    pub sample_half_width_days: f64,
    /// Width of the final bracket when contacts are located on polynomial elements, days.
    pub contact_tolerance_days: f64,
}

impl SearchParams {
    /// Construct a new [`SearchParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SearchParamsBuilder`] starting from the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use umbra::search::SearchParams;
    ///
    /// let params = SearchParams::builder()
    ///     .max_lunations(120)
    ///     .convergence_minutes(0.1)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.max_lunations, 120);
    /// ```
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }

    /// Convergence threshold in days.
    pub(crate) fn convergence_days(&self) -> f64 {
        self.convergence_minutes / crate::constants::MINUTES_PER_DAY
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            max_lunations: 300,
            convergence_minutes: 1.0,
            max_refinement_iterations: 50,
            sample_half_width_days: 0.5,
            contact_tolerance_days: 1e-7,
        }
    }
}

/// Fluent builder for [`SearchParams`].
#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl Default for SearchParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: SearchParams::default(),
        }
    }

    pub fn max_lunations(mut self, v: usize) -> Self {
        self.params.max_lunations = v;
        self
    }
    pub fn convergence_minutes(mut self, v: f64) -> Self {
        self.params.convergence_minutes = v;
        self
    }
    pub fn max_refinement_iterations(mut self, v: usize) -> Self {
        self.params.max_refinement_iterations = v;
        self
    }
    pub fn sample_half_width_days(mut self, v: f64) -> Self {
        self.params.sample_half_width_days = v;
        self
    }
    pub fn contact_tolerance_days(mut self, v: f64) -> Self {
        self.params.contact_tolerance_days = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SearchParams)` if every value is valid.
    /// * `Err(UmbraError::InvalidParameter)` naming the first invalid field otherwise.
    pub fn build(self) -> Result<SearchParams, UmbraError> {
        let p = &self.params;

        if p.max_lunations == 0 {
            return Err(UmbraError::InvalidParameter(
                "max_lunations must be >= 1".into(),
            ));
        }
        if p.max_refinement_iterations == 0 {
            return Err(UmbraError::InvalidParameter(
                "max_refinement_iterations must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.convergence_minutes) {
            return Err(UmbraError::InvalidParameter(
                "convergence_minutes must be > 0".into(),
            ));
        }
        if !Self::gt0(p.sample_half_width_days) {
            return Err(UmbraError::InvalidParameter(
                "sample_half_width_days must be > 0".into(),
            ));
        }
        if !Self::gt0(p.contact_tolerance_days) {
            return Err(UmbraError::InvalidParameter(
                "contact_tolerance_days must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

/// Fail with [`UmbraError::SearchCancelled`] once the flag has been raised.
pub(crate) fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<(), UmbraError> {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        Err(UmbraError::SearchCancelled)
    } else {
        Ok(())
    }
}

/// Walk lunations from `first_k` in `direction` until `candidate` yields an eclipse whose
/// maximum lies on the requested side of `start`.
///
/// Arguments
/// ---------
/// * `start`: instant the search is anchored on.
/// * `first_k`: first lunation index examined.
/// * `candidate`: eclipse test for one lunation, returning the instant of maximum and the
///   record, or `None` when the lunation has no eclipse.
///
/// Errors
/// ------
/// * [`UmbraError::SearchCancelled`] when the cancellation flag is raised.
/// * [`UmbraError::NonConvergence`] after `params.max_lunations` candidates.
pub(crate) fn scan_lunations<T, F>(
    start: JulianDay,
    first_k: f64,
    direction: SearchDirection,
    params: &SearchParams,
    cancel: Option<&AtomicBool>,
    mut candidate: F,
) -> Result<T, UmbraError>
where
    F: FnMut(f64) -> Option<(JulianDay, T)>,
{
    let step = direction.step();
    let warn_at = params.max_lunations - params.max_lunations / 4;
    let mut k = first_k;

    for iteration in 0..params.max_lunations {
        check_cancelled(cancel)?;
        if iteration > 0 && iteration == warn_at {
            log::warn!(
                "eclipse search from JD {start} has examined {iteration} of {} lunations",
                params.max_lunations
            );
        }

        match candidate(k) {
            Some((maximum, eclipse)) if direction.accepts(maximum, start) => return Ok(eclipse),
            Some((maximum, _)) => {
                log::debug!("lunation {k}: eclipse at JD {maximum} is behind JD {start}")
            }
            None => log::debug!("lunation {k}: no eclipse"),
        }
        k += step;
    }

    Err(UmbraError::non_convergence(
        "eclipse search",
        params.max_lunations,
    ))
}

/// First lunation examined: one before the nearest in the search direction, so that an
/// eclipse whose corrected maximum lies just past `start` is not missed.
pub(crate) fn first_lunation(nearest: f64, direction: SearchDirection) -> f64 {
    nearest - direction.step()
}
