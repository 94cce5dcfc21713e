//! Lunar eclipse seen from a place.
//!
//! A lunar eclipse happens at the same instants for every observer; only the position of the
//! Moon in the sky changes. At each contact the geocentric Moon of the lunar eclipse elements is
//! corrected for parallax and turned into an altitude and a parallactic angle.
use crate::constants::{Degree, JulianDay, RADEG, SECONDS_PER_DAY};
use crate::coordinates::{parallactic_angle, EquatorialCoordinate, GeographicCoordinate};
use crate::local_circumstances::{
    compute_local_circumstances, ContactElements, EclipsedBody, LocalCircumstances,
};
use crate::lunar_elements::InstantLunarEclipseElements;
use crate::polynomial_elements::PolynomialLunarEclipseElements;
use crate::search::contacts::find_lunar_contacts;
use crate::search::lunar::LunarEclipseContacts;
use crate::search::SearchParams;
use crate::time::apparent_sidereal_time;
use crate::umbra_errors::UmbraError;

impl EclipsedBody for InstantLunarEclipseElements {
    fn jd(&self) -> JulianDay {
        self.jd
    }

    /// Topocentric altitude and parallactic angle of the Moon.
    ///
    /// The sidereal time is taken at the UT instant `jd − ΔT`.
    fn horizon(&self, place: &GeographicCoordinate) -> (Degree, Degree) {
        let theta0 = apparent_sidereal_time(self.jd - self.delta_t / SECONDS_PER_DAY);
        let distance = 1.0 / (self.parallax * RADEG).sin();

        let geocentric = EquatorialCoordinate::new(self.alpha, self.delta);
        let (moon, _) = geocentric.to_topocentric(place, theta0, distance);

        let altitude = moon.to_horizontal(place, theta0).altitude;
        let hour_angle = moon.hour_angle(place.longitude, theta0);
        let q = parallactic_angle(hour_angle, moon.delta, place.latitude);
        (altitude, q)
    }
}

/// Evaluate the lunar eclipse elements at each existing contact.
///
/// Errors
/// ------
/// * [`UmbraError::OutOfValidityWindow`] if a contact lies outside the window of `elements`.
pub fn lunar_contact_elements(
    elements: &PolynomialLunarEclipseElements,
    contacts: &LunarEclipseContacts,
) -> Result<ContactElements<InstantLunarEclipseElements>, UmbraError> {
    let at = |jd: Option<JulianDay>| jd.map(|jd| elements.evaluate(jd)).transpose();

    Ok(ContactElements {
        penumbral_begin: at(Some(contacts.p1))?,
        partial_begin: at(contacts.u1)?,
        total_begin: at(contacts.u2)?,
        maximum: at(Some(contacts.maximum))?,
        total_end: at(contacts.u3)?,
        partial_end: at(contacts.u4)?,
        penumbral_end: at(Some(contacts.p4))?,
    })
}

/// Contacts of a lunar eclipse seen from `place`.
///
/// Arguments
/// ---------
/// * `elements`: polynomial lunar eclipse elements covering the eclipse.
/// * `place`: the observer.
/// * `params`: refinement bounds for the contact search.
///
/// Return
/// ------
/// * `None` when the Moon misses the penumbra. Otherwise one record per existing contact,
///   including those that happen while the Moon is below the horizon.
pub fn lunar_local_circumstances(
    elements: &PolynomialLunarEclipseElements,
    place: &GeographicCoordinate,
    params: &SearchParams,
) -> Result<Option<LocalCircumstances<InstantLunarEclipseElements>>, UmbraError> {
    let Some(contacts) = find_lunar_contacts(elements, params)? else {
        return Ok(None);
    };
    let snapshots = lunar_contact_elements(elements, &contacts)?;
    Ok(Some(compute_local_circumstances(&snapshots, place)))
}
