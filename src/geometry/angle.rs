use crate::constants::Degree;

/// Return the principal value of an angle in degrees, in `[0, 360)`.
///
/// `rem_euclid` can round tiny negative inputs up to exactly `360.0`; that case is
/// folded back to `0.0` so the half-open interval always holds.
pub fn to360(angle: Degree) -> Degree {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 {
        a - 360.0
    } else {
        a
    }
}

/// Return an angle in degrees reduced to `[-180, 180)`.
///
/// Defined as `to360(angle + 180) - 180`, so that
/// `to360(to180(x) + 180) - 180 == to180(x)` holds for every finite `x`.
pub fn to180(angle: Degree) -> Degree {
    to360(angle + 180.0) - 180.0
}

/// Signed difference `a - b` reduced to `[-180, 180)`.
pub fn angle_diff(a: Degree, b: Degree) -> Degree {
    to180(a - b)
}

/// Unwrap a series of circular values so that consecutive entries never jump by more than 180°.
///
/// Arguments
/// ---------
/// * `angles`: successive samples of a circular quantity (e.g. the hour angle `μ` or a right
///   ascension) in degrees.
///
/// Returns
/// --------
/// * A new vector where each value differs from its predecessor by less than 180°, obtained by
///   adding or subtracting whole turns. The first value is kept as is.
///
/// Remarks
/// -------
/// * Fitting a polynomial across a 360° → 0° wrap produces garbage; aligned values are smooth and
///   can be fitted directly. Results evaluated from such a fit must be passed through [`to360`].
pub fn align_angles(angles: &[Degree]) -> Vec<Degree> {
    let mut aligned = Vec::with_capacity(angles.len());
    let mut previous: Option<Degree> = None;

    for &a in angles {
        let value = match previous {
            None => a,
            Some(p) => {
                let mut v = a;
                while v - p > 180.0 {
                    v -= 360.0;
                }
                while v - p < -180.0 {
                    v += 360.0;
                }
                v
            }
        };
        aligned.push(value);
        previous = Some(value);
    }

    aligned
}

/// Split a decimal angle (or hour value) into sign, whole units, minutes and seconds.
pub fn to_sexagesimal(value: f64) -> (i8, u32, u32, f64) {
    let sign = if value < 0.0 { -1 } else { 1 };
    let v = value.abs();
    let units = v.trunc();
    let minutes = ((v - units) * 60.0).trunc();
    let seconds = ((v - units) * 60.0 - minutes) * 60.0;
    (sign, units as u32, minutes as u32, seconds)
}
