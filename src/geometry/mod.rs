//! # Geometry primitives
//!
//! Stateless helpers shared by every layer of the eclipse engine:
//!
//! - [`angle`] – normalization of angles to `[0, 360)` / `[-180, 180)`, unwrapping of circular
//!   series before polynomial fitting, signed angular differences.
//! - [`spherical`] – angular separation and great-circle interpolation between two points given
//!   as (longitude, latitude) pairs.
//! - [`circles`] – intersection of two circles on the fundamental plane, used to find where the
//!   penumbra meets the Earth limb.
//!
//! All functions work in **degrees** at their boundaries; radians are only used internally.
pub mod angle;
pub mod circles;
pub mod spherical;
