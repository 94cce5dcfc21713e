//! # umbra
//!
//! Solar and lunar eclipse prediction: Besselian and lunar eclipse elements, their polynomial
//! fits, eclipse searches, eclipse maps and local circumstances.
//!
//! ```rust
//! use umbra::ephemeris::LowPrecisionEphemeris;
//! use umbra::map::build_eclipse_map;
//! use umbra::polynomial_elements::PolynomialBesselianElements;
//! use umbra::search::solar::find_nearest_solar_eclipse;
//! use umbra::search::SearchDirection;
//! use umbra::time::{delta_t, julian_day};
//!
//! let jd = julian_day(2017, 8, 1.0).unwrap();
//! let eclipse = find_nearest_solar_eclipse(jd, SearchDirection::Forward).unwrap();
//!
//! // Elements sampled every two hours around the maximum
//! let elements = PolynomialBesselianElements::from_ephemeris(
//!     &LowPrecisionEphemeris,
//!     (eclipse.jd_maximum * 24.0).round() / 24.0,
//!     2.0 / 24.0,
//!     delta_t(eclipse.jd_maximum),
//! )
//! .unwrap();
//! let map = build_eclipse_map(&elements).unwrap();
//! assert!(!map.central_line.is_empty());
//! ```
//!
//! All angles are in degrees, distances in Earth equatorial radii and instants in Julian Days.
//! Nothing is computed on a background thread unless the `parallel` feature is enabled, in which
//! case the map builder spreads its samples over the `rayon` thread pool.
pub mod besselian;
pub mod constants;
pub mod coordinates;
pub mod ephemeris;
pub mod geometry;
pub mod local_circumstances;
pub mod lunar_elements;
pub mod map;
pub mod numerics;
pub mod polynomial_elements;
pub mod ref_system;
pub mod search;
pub mod time;
pub mod umbra_errors;
