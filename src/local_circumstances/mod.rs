//! # Local circumstances
//!
//! What an eclipse looks like from one place: for each contact that happens, the instant, the
//! altitude of the eclipsed body and its parallactic angle.
//!
//! Contacts are described by the element snapshot valid at their instant, solar
//! ([`InstantBesselianElements`](crate::besselian::InstantBesselianElements)) or lunar
//! ([`InstantLunarEclipseElements`](crate::lunar_elements::InstantLunarEclipseElements)). Both
//! implement [`EclipsedBody`], which is all [`compute_local_circumstances`] needs.
//!
//! Submodules
//! -----------------
//! * [`solar`] – contacts and magnitude of a solar eclipse at a place, iterated on polynomial
//!   Besselian elements.
//! * [`lunar`] – contacts of a lunar eclipse seen from a place.
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, JulianDay};
use crate::coordinates::GeographicCoordinate;

pub mod lunar;
pub mod solar;

/// The canonical contacts of an eclipse, in chronological order.
///
/// For a solar eclipse seen from one place there is no penumbral phase: the partial contacts
/// are the first and fourth contacts, the total ones the second and third (total or annular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactKind {
    PenumbralBegin,
    PartialBegin,
    TotalBegin,
    Maximum,
    TotalEnd,
    PartialEnd,
    PenumbralEnd,
}

/// Position of the eclipsed body in the sky of a place.
pub trait EclipsedBody {
    /// Instant of the snapshot, JD (TT).
    fn jd(&self) -> JulianDay;

    /// Altitude above the horizon and parallactic angle of the body seen from `place`, degrees.
    fn horizon(&self, place: &GeographicCoordinate) -> (Degree, Degree);
}

/// Element snapshots at the contacts of an eclipse. Contacts that do not happen are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactElements<E> {
    pub penumbral_begin: Option<E>,
    pub partial_begin: Option<E>,
    pub total_begin: Option<E>,
    pub maximum: Option<E>,
    pub total_end: Option<E>,
    pub partial_end: Option<E>,
    pub penumbral_end: Option<E>,
}

impl<E> Default for ContactElements<E> {
    fn default() -> Self {
        ContactElements {
            penumbral_begin: None,
            partial_begin: None,
            total_begin: None,
            maximum: None,
            total_end: None,
            partial_end: None,
            penumbral_end: None,
        }
    }
}

impl<E> ContactElements<E> {
    /// Existing contacts in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactKind, &E)> {
        [
            (ContactKind::PenumbralBegin, &self.penumbral_begin),
            (ContactKind::PartialBegin, &self.partial_begin),
            (ContactKind::TotalBegin, &self.total_begin),
            (ContactKind::Maximum, &self.maximum),
            (ContactKind::TotalEnd, &self.total_end),
            (ContactKind::PartialEnd, &self.partial_end),
            (ContactKind::PenumbralEnd, &self.penumbral_end),
        ]
        .into_iter()
        .filter_map(|(kind, snapshot)| snapshot.as_ref().map(|s| (kind, s)))
    }
}

/// One contact seen from a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint<E> {
    pub kind: ContactKind,
    /// JD (TT).
    pub jd: JulianDay,
    /// Altitude of the eclipsed body, degrees.
    pub altitude: Degree,
    /// Parallactic angle of the eclipsed body, degrees, positive west of the meridian.
    pub parallactic_angle: Degree,
    pub elements: E,
}

/// Contacts of an eclipse seen from one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCircumstances<E> {
    pub location: GeographicCoordinate,
    /// Contacts that happen, in chronological order.
    pub contacts: Vec<ContactPoint<E>>,
}

impl<E> LocalCircumstances<E> {
    pub fn contact(&self, kind: ContactKind) -> Option<&ContactPoint<E>> {
        self.contacts.iter().find(|c| c.kind == kind)
    }

    /// Whether the body is above the horizon at one contact at least.
    pub fn is_visible(&self) -> bool {
        self.contacts.iter().any(|c| c.altitude > 0.0)
    }
}

/// Local circumstances of the given contacts at `place`.
///
/// Every existing contact is computed independently; missing contacts are left out.
pub fn compute_local_circumstances<E>(
    contacts: &ContactElements<E>,
    place: &GeographicCoordinate,
) -> LocalCircumstances<E>
where
    E: EclipsedBody + Clone,
{
    let contacts = contacts
        .iter()
        .map(|(kind, elements)| {
            let (altitude, parallactic_angle) = elements.horizon(place);
            ContactPoint {
                kind,
                jd: elements.jd(),
                altitude,
                parallactic_angle,
                elements: elements.clone(),
            }
        })
        .collect();

    LocalCircumstances {
        location: place.clone(),
        contacts,
    }
}
