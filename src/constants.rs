//! # Constants and type definitions for Umbra
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `umbra` library.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants (Earth ellipsoid, solar and lunar radii)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ Earth radii)
//! - Reference epochs (J2000, mean new moon of lunation 0)
//! - Core type aliases used across the crate
//!
//! Radii and distances that enter the shadow geometry are expressed in **Earth equatorial radii**,
//! the natural unit of the fundamental plane.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a Julian day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Julian Day of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_POLAR_RADIUS_KM: f64 = 6_356.752_3;

/// Square of the eccentricity of the Earth ellipsoid, as used by eclipse almanacs
pub const EARTH_E2: f64 = 0.006_694_54;

/// Astronomical Unit expressed in Earth equatorial radii
pub const AU_EARTH_RADII: f64 = AU / EARTH_EQUATORIAL_RADIUS_KM;

/// Solar radius in Earth equatorial radii (696 000 km)
pub const SUN_RADIUS: f64 = 696_000.0 / EARTH_EQUATORIAL_RADIUS_KM;

/// Lunar radius in Earth equatorial radii used for penumbral contacts
pub const MOON_RADIUS_PENUMBRA: f64 = 0.272_488;

/// Lunar radius in Earth equatorial radii used for umbral contacts (mean limb valleys)
pub const MOON_RADIUS_UMBRA: f64 = 0.272_281;

/// Enlargement applied to the geometric shadow of the Earth by its atmosphere
pub const SHADOW_ENLARGEMENT: f64 = 1.02;

/// Ratio between sidereal and solar rotation rates; converts ΔT into the
/// longitude offset between the ephemeris and Greenwich meridians
pub const SIDEREAL_RATE: f64 = 1.002_737_909_35;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_588_861;

/// JDE of the mean new moon of lunation 0 (2000-01-06)
pub const LUNATION_EPOCH: f64 = 2_451_550.097_66;

/// Numerical epsilon used to classify circle intersections (tangency)
pub const CIRCLE_EPS: f64 = 1e-7;

/// Tolerance on the spacing of element samples, in days
pub const SPACING_EPS: f64 = 1e-6;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in Earth equatorial radii
pub type EarthRadii = f64;
/// Julian Day (days); the TT/UT convention is fixed by the caller
pub type JulianDay = f64;
/// Duration in seconds
pub type Seconds = f64;
