//! Search for solar eclipses.
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};

use crate::constants::JulianDay;
use crate::search::lunation::{lunation_geometry, nearest_lunation, LunationGeometry, Syzygy};
use crate::search::saros::solar_saros;
use crate::search::{first_lunation, scan_lunations, SearchDirection, SearchParams};
use crate::umbra_errors::UmbraError;

/// Kind of a solar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarEclipseType {
    Partial,
    Annular,
    Total,
    /// Annular along part of the track, total along the rest.
    Hybrid,
}

/// Whether and how the shadow axis meets the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Centrality {
    /// The shadow axis crosses the Earth.
    Central,
    /// The axis misses the Earth but part of the umbra or antumbra touches it.
    NonCentral,
    /// Only the penumbra reaches the Earth.
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

/// Approximate geocentric contacts of a solar eclipse, JDE.
///
/// They are derived from the mean hourly motion of the shadow across the fundamental plane and
/// carry an error of a few minutes; [`crate::search::contacts`] refines them on polynomial
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEclipseContacts {
    /// First external contact of the penumbra with the Earth.
    pub p1: JulianDay,
    /// First external contact of the umbra, central and non-central eclipses only.
    pub u1: Option<JulianDay>,
    /// Last external contact of the umbra.
    pub u4: Option<JulianDay>,
    /// Last external contact of the penumbra.
    pub p4: JulianDay,
}

/// A solar eclipse found by [`find_nearest_solar_eclipse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEclipse {
    /// Instant of greatest eclipse, JDE.
    pub jd_maximum: JulianDay,
    /// Meeus lunation number of the new moon.
    pub lunation: i64,
    pub saros: u32,
    /// Least distance of the shadow axis from the center of the Earth, Earth radii, north
    /// positive.
    pub gamma: f64,
    /// Umbral radius on the fundamental plane, Earth radii (negative for a total eclipse).
    pub u: f64,
    /// Greatest magnitude. For a partial eclipse, the fraction of the solar diameter covered at
    /// greatest eclipse; otherwise the geocentric ratio of the apparent lunar and solar diameters.
    pub magnitude: f64,
    pub eclipse_type: SolarEclipseType,
    pub centrality: Centrality,
    /// Hemisphere of the shadow for non-central and partial eclipses.
    pub hemisphere: Option<Hemisphere>,
    pub contacts: SolarEclipseContacts,
}

impl SolarEclipse {
    /// Classify the new moon described by `geo`, or `None` when the penumbra misses the Earth.
    ///
    /// Remarks
    /// -------
    /// * `|γ| < 0.9972`: central; total when `u < 0`, annular when `u > 0.0047`, and in between
    ///   annular or hybrid depending on `w = 0.00464·√(1 − γ²)`.
    /// * `0.9972 ≤ |γ| < 0.9972 + |u|`: non-central total or annular.
    /// * `|γ| ≤ 1.5433 + u`: partial, with magnitude `(1.5433 + u − |γ|) / (0.5461 + 2u)`.
    pub(crate) fn from_geometry(geo: &LunationGeometry) -> Option<Self> {
        let gamma = geo.gamma;
        let u = geo.u;
        let abs_gamma = gamma.abs();

        if abs_gamma > 1.5433 + u {
            return None;
        }

        let umbral_type = if u < 0.0 {
            SolarEclipseType::Total
        } else {
            SolarEclipseType::Annular
        };

        let (eclipse_type, centrality, magnitude) = if abs_gamma < 0.9972 {
            let eclipse_type = if u < 0.0 {
                SolarEclipseType::Total
            } else if u > 0.0047 {
                SolarEclipseType::Annular
            } else if u < 0.00464 * (1.0 - gamma * gamma).sqrt() {
                SolarEclipseType::Hybrid
            } else {
                SolarEclipseType::Annular
            };
            (eclipse_type, Centrality::Central, diameter_ratio(u))
        } else if abs_gamma < 0.9972 + u.abs() {
            (umbral_type, Centrality::NonCentral, diameter_ratio(u))
        } else {
            let magnitude = (1.5433 + u - abs_gamma) / (0.5461 + 2.0 * u);
            (SolarEclipseType::Partial, Centrality::Partial, magnitude)
        };

        let hemisphere = match centrality {
            Centrality::Central => None,
            _ if gamma > 0.0 => Some(Hemisphere::North),
            _ => Some(Hemisphere::South),
        };

        let n = geo.shadow_speed();
        let penumbra = ((1.5461 + u).powi(2) - gamma * gamma).sqrt() / n / 24.0;
        let umbra = match centrality {
            Centrality::Partial => None,
            _ => Some(((1.0 + u.abs()).powi(2) - gamma * gamma).sqrt() / n / 24.0),
        };

        let k = geo.k.round() as i64;
        Some(SolarEclipse {
            jd_maximum: geo.jde,
            lunation: k,
            saros: solar_saros(k),
            gamma,
            u,
            magnitude,
            eclipse_type,
            centrality,
            hemisphere,
            contacts: SolarEclipseContacts {
                p1: geo.jde - penumbra,
                u1: umbra.map(|h| geo.jde - h),
                u4: umbra.map(|h| geo.jde + h),
                p4: geo.jde + penumbra,
            },
        })
    }
}

/// Ratio of the apparent diameters of the Moon and the Sun seen from the center of the Earth.
fn diameter_ratio(u: f64) -> f64 {
    0.5461 / (0.5461 + 2.0 * u)
}

/// Find the solar eclipse nearest to `jd` in the given direction, with default parameters.
///
/// See [`find_nearest_solar_eclipse_with`].
pub fn find_nearest_solar_eclipse(
    jd: JulianDay,
    direction: SearchDirection,
) -> Result<SolarEclipse, UmbraError> {
    find_nearest_solar_eclipse_with(jd, direction, &SearchParams::default(), None)
}

/// Find the solar eclipse nearest to `jd` in the given direction.
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
pub fn find_nearest_solar_eclipse_with(
    jd: JulianDay,
    direction: SearchDirection,
    params: &SearchParams,
    cancel: Option<&AtomicBool>,
) -> Result<SolarEclipse, UmbraError> {
    let first_k = first_lunation(nearest_lunation(jd, Syzygy::NewMoon), direction);

    scan_lunations(jd, first_k, direction, params, cancel, |k| {
        let geo = lunation_geometry(k, Syzygy::NewMoon)?;
        let eclipse = SolarEclipse::from_geometry(&geo)?;
        Some((eclipse.jd_maximum, eclipse))
    })
}
