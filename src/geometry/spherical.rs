use nalgebra::Vector3;

use crate::constants::{Degree, RADEG};
use crate::geometry::angle::to180;
use crate::umbra_errors::UmbraError;

/// Unit vector pointing to a (longitude, latitude) direction, both in degrees.
pub fn unit_vector(lon: Degree, lat: Degree) -> Vector3<f64> {
    let (sl, cl) = (lon * RADEG).sin_cos();
    let (sb, cb) = (lat * RADEG).sin_cos();
    Vector3::new(cb * cl, cb * sl, sb)
}

/// Longitude and latitude in degrees of a (not necessarily unit) direction vector.
///
/// Longitude is returned in `[-180, 180)`.
pub fn from_vector(v: &Vector3<f64>) -> (Degree, Degree) {
    let lon = v.y.atan2(v.x) / RADEG;
    let lat = v.z.atan2((v.x * v.x + v.y * v.y).sqrt()) / RADEG;
    (to180(lon), lat)
}

/// Angular separation between two points of the sphere.
///
/// Arguments
/// ---------
/// * `lon1`, `lat1`: first point, degrees.
/// * `lon2`, `lat2`: second point, degrees.
///
/// Return
/// ------
/// * The great-circle angle between both points, in degrees, in `[0, 180]`.
///
/// Remarks
/// -------
/// * Uses the `atan2(|a × b|, a · b)` form which stays accurate for both tiny and nearly antipodal
///   separations, unlike the plain `acos` of the dot product.
pub fn angular_separation(lon1: Degree, lat1: Degree, lon2: Degree, lat2: Degree) -> Degree {
    let a = unit_vector(lon1, lat1);
    let b = unit_vector(lon2, lat2);
    a.cross(&b).norm().atan2(a.dot(&b)) / RADEG
}

/// Point located at `fraction` of the great-circle arc going from point 1 to point 2.
///
/// Arguments
/// ---------
/// * `lon1`, `lat1`: start of the arc, degrees.
/// * `lon2`, `lat2`: end of the arc, degrees.
/// * `fraction`: position along the arc, `0` at the start and `1` at the end.
///
/// Return
/// ------
/// * `(lon, lat)` of the intermediate point in degrees, longitude in `[-180, 180)`.
///
/// Errors
/// ------
/// * [`UmbraError::FractionOutOfRange`] if `fraction` is not in `[0, 1]`.
/// * [`UmbraError::InvalidParameter`] if both points are antipodal (the arc is undefined).
pub fn intermediate_point(
    lon1: Degree,
    lat1: Degree,
    lon2: Degree,
    lat2: Degree,
    fraction: f64,
) -> Result<(Degree, Degree), UmbraError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(UmbraError::FractionOutOfRange(fraction));
    }

    let a = unit_vector(lon1, lat1);
    let b = unit_vector(lon2, lat2);
    let d = a.cross(&b).norm().atan2(a.dot(&b));

    if d.sin().abs() < 1e-12 {
        if d < 1.0 {
            return Ok((to180(lon1), lat1));
        }
        return Err(UmbraError::InvalidParameter(
            "great circle through antipodal points is undefined".into(),
        ));
    }

    let wa = ((1.0 - fraction) * d).sin() / d.sin();
    let wb = (fraction * d).sin() / d.sin();
    Ok(from_vector(&(a * wa + b * wb)))
}

#[cfg(test)]
mod spherical_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angular_separation() {
        assert_abs_diff_eq!(angular_separation(0.0, 0.0, 90.0, 0.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(angular_separation(10.0, 90.0, 200.0, 90.0), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(angular_separation(0.0, 0.0, 180.0, 0.0), 180.0, epsilon = 1e-12);

        // Arcturus / Spica (Meeus, example 17.a): 32.7930°
        let sep = angular_separation(213.9154, 19.1825, 201.2983, -11.1614);
        assert_abs_diff_eq!(sep, 32.7930, epsilon = 1e-4);
    }

    #[test]
    fn test_intermediate_point() {
        let (lon, lat) = intermediate_point(0.0, 0.0, 90.0, 0.0, 0.5).unwrap();
        assert_abs_diff_eq!(lon, 45.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, 0.0, epsilon = 1e-12);

        let (lon, lat) = intermediate_point(170.0, 10.0, -170.0, 10.0, 0.0).unwrap();
        assert_abs_diff_eq!(lon, 170.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 10.0, epsilon = 1e-9);

        // Crossing the antimeridian stays on the short arc
        let (lon, _) = intermediate_point(170.0, 0.0, -170.0, 0.0, 0.5).unwrap();
        assert_abs_diff_eq!(lon.abs(), 180.0, epsilon = 1e-9);

        let (lon, lat) = intermediate_point(0.0, 0.0, 0.0, 60.0, 1.0).unwrap();
        assert_abs_diff_eq!(lon, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intermediate_point_fraction_out_of_range() {
        assert_eq!(
            intermediate_point(0.0, 0.0, 10.0, 0.0, 1.5),
            Err(UmbraError::FractionOutOfRange(1.5))
        );
        assert_eq!(
            intermediate_point(0.0, 0.0, 10.0, 0.0, -0.1),
            Err(UmbraError::FractionOutOfRange(-0.1))
        );
    }

    #[test]
    fn test_intermediate_point_antipodal() {
        assert!(matches!(
            intermediate_point(0.0, 0.0, 180.0, 0.0, 0.5),
            Err(UmbraError::InvalidParameter(_))
        ));
    }
}
