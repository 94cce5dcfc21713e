//! Search for lunar eclipses.
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};

use crate::constants::{JulianDay, MINUTES_PER_DAY};
use crate::search::lunation::{lunation_geometry, nearest_lunation, LunationGeometry, Syzygy};
use crate::search::saros::lunar_saros;
use crate::search::{first_lunation, scan_lunations, SearchDirection, SearchParams};
use crate::umbra_errors::UmbraError;

/// Kind of a lunar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarEclipseType {
    /// The Moon only enters the penumbra.
    Penumbral,
    Partial,
    Total,
}

/// Semi-durations of the phases, minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemiDurations {
    pub penumbral: f64,
    pub partial: Option<f64>,
    pub total: Option<f64>,
}

/// Contacts of a lunar eclipse, JDE. Phases that do not occur are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarEclipseContacts {
    /// Moon enters the penumbra.
    pub p1: JulianDay,
    /// Moon enters the umbra.
    pub u1: Option<JulianDay>,
    /// Totality begins.
    pub u2: Option<JulianDay>,
    pub maximum: JulianDay,
    /// Totality ends.
    pub u3: Option<JulianDay>,
    /// Moon leaves the umbra.
    pub u4: Option<JulianDay>,
    /// Moon leaves the penumbra.
    pub p4: JulianDay,
}

/// A lunar eclipse found by [`find_nearest_lunar_eclipse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarEclipse {
    /// Instant of greatest eclipse, JDE.
    pub jd_maximum: JulianDay,
    /// Meeus lunation number of the new moon preceding the eclipse.
    pub lunation: i64,
    pub saros: u32,
    /// Least distance of the Moon's center from the shadow axis, Earth radii, north positive.
    pub gamma: f64,
    /// Radius of the umbral cone at the Moon's distance, less `0.7403`, Earth radii.
    pub u: f64,
    pub penumbral_magnitude: f64,
    /// Umbral magnitude, negative for a penumbral eclipse.
    pub umbral_magnitude: f64,
    pub eclipse_type: LunarEclipseType,
    pub semi_durations: SemiDurations,
    pub contacts: LunarEclipseContacts,
}

impl LunarEclipse {
    /// Classify the full moon described by `geo`, or `None` when the Moon misses the penumbra.
    ///
    /// Remarks
    /// -------
    /// * Penumbral magnitude `(1.5573 + u − |γ|) / 0.5450`, umbral `(1.0128 − u − |γ|) / 0.5450`.
    /// * A non-positive umbral magnitude still leaves a penumbral eclipse as long as the
    ///   penumbral magnitude is positive.
    /// * Semi-durations are `60/n·√(h² − γ²)` minutes with `h = 1.5573 + u`, `1.0128 − u` and
    ///   `0.4678 − u` for the penumbral, partial and total phases.
    pub(crate) fn from_geometry(geo: &LunationGeometry) -> Option<Self> {
        let gamma = geo.gamma;
        let u = geo.u;
        let abs_gamma = gamma.abs();

        let penumbral_magnitude = (1.5573 + u - abs_gamma) / 0.5450;
        let umbral_magnitude = (1.0128 - u - abs_gamma) / 0.5450;

        let eclipse_type = if umbral_magnitude >= 1.0 {
            LunarEclipseType::Total
        } else if umbral_magnitude > 0.0 {
            LunarEclipseType::Partial
        } else if penumbral_magnitude > 0.0 {
            LunarEclipseType::Penumbral
        } else {
            return None;
        };

        let n = geo.shadow_speed();
        let semi_duration = |h: f64| {
            let s = h * h - gamma * gamma;
            (s > 0.0).then(|| 60.0 / n * s.sqrt())
        };

        let penumbral = semi_duration(1.5573 + u)?;
        let partial = match eclipse_type {
            LunarEclipseType::Penumbral => None,
            _ => semi_duration(1.0128 - u),
        };
        let total = match eclipse_type {
            LunarEclipseType::Total => semi_duration(0.4678 - u),
            _ => None,
        };

        let jde = geo.jde;
        let before = |minutes: f64| jde - minutes / MINUTES_PER_DAY;
        let after = |minutes: f64| jde + minutes / MINUTES_PER_DAY;

        let lunation = geo.k.floor() as i64;
        Some(LunarEclipse {
            jd_maximum: jde,
            lunation,
            saros: lunar_saros(lunation),
            gamma,
            u,
            penumbral_magnitude,
            umbral_magnitude,
            eclipse_type,
            semi_durations: SemiDurations {
                penumbral,
                partial,
                total,
            },
            contacts: LunarEclipseContacts {
                p1: before(penumbral),
                u1: partial.map(before),
                u2: total.map(before),
                maximum: jde,
                u3: total.map(after),
                u4: partial.map(after),
                p4: after(penumbral),
            },
        })
    }
}

/// Find the lunar eclipse nearest to `jd` in the given direction, with default parameters.
///
/// See [`find_nearest_lunar_eclipse_with`].
pub fn find_nearest_lunar_eclipse(
    jd: JulianDay,
    direction: SearchDirection,
) -> Result<LunarEclipse, UmbraError> {
    find_nearest_lunar_eclipse_with(jd, direction, &SearchParams::default(), None)
}

/// Find the lunar eclipse nearest to `jd` in the given direction.
///
/// Arguments
/// ---------
/// * `jd`: starting instant, JDE.
/// * `direction`: [`SearchDirection::Forward`] returns the first eclipse whose maximum is at or
///   after `jd`, [`SearchDirection::Backward`] the last one at or before `jd`.
/// * `params`: search bounds.
/// * `cancel`: optional cancellation flag, polled between lunations.
///
/// Errors
/// ------
/// * [`UmbraError::SearchCancelled`] if `cancel` is raised.
/// * [`UmbraError::NonConvergence`] if no eclipse is found within `params.max_lunations`.
pub fn find_nearest_lunar_eclipse_with(
    jd: JulianDay,
    direction: SearchDirection,
    params: &SearchParams,
    cancel: Option<&AtomicBool>,
) -> Result<LunarEclipse, UmbraError> {
    let first_k = first_lunation(nearest_lunation(jd, Syzygy::FullMoon), direction);

    scan_lunations(jd, first_k, direction, params, cancel, |k| {
        let geo = lunation_geometry(k, Syzygy::FullMoon)?;
        let eclipse = LunarEclipse::from_geometry(&geo)?;
        Some((eclipse.jd_maximum, eclipse))
    })
}
