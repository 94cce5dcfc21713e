use crate::constants::{JulianDay, Radian, LUNATION_EPOCH, RADEG, SYNODIC_MONTH};

/// Phase of the lunation at which an eclipse is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Syzygy {
    NewMoon,
    FullMoon,
}

/// Eclipse geometry of one lunation, from the mean elements plus their periodic terms
/// (Meeus, *Astronomical Algorithms*, ch. 54).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LunationGeometry {
    /// Lunation index, integer for a new moon, half-integer for a full moon.
    pub k: f64,
    /// Instant of maximum eclipse, JDE.
    pub jde: JulianDay,
    /// Least distance of the Moon (lunar case) or of the shadow axis (solar case) from the center
    /// of the Earth, Earth equatorial radii; positive north.
    pub gamma: f64,
    /// Radius of the umbral cone on the fundamental plane, Earth equatorial radii.
    pub u: f64,
    /// Mean anomaly of the Moon.
    pub moon_anomaly: Radian,
}

impl LunationGeometry {
    /// Hourly motion of the Moon relative to the shadow, Earth radii per hour.
    pub fn shadow_speed(&self) -> f64 {
        0.5458 + 0.0400 * self.moon_anomaly.cos()
    }
}

/// Index of the lunation of the given phase closest to `jd`.
pub(crate) fn nearest_lunation(jd: JulianDay, syzygy: Syzygy) -> f64 {
    let phase = match syzygy {
        Syzygy::NewMoon => 0.0,
        Syzygy::FullMoon => 0.5,
    };
    ((jd - LUNATION_EPOCH) / SYNODIC_MONTH - phase).round() + phase
}

/// Geometry of the syzygy `k`, or `None` when the Moon is too far from a node for any eclipse.
///
/// Arguments
/// ---------
/// * `k`: lunation index; its fractional part must match `syzygy`.
/// * `syzygy`: new moon for a solar eclipse, full moon for a lunar one.
pub(crate) fn lunation_geometry(k: f64, syzygy: Syzygy) -> Option<LunationGeometry> {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        * RADEG;
    if f.sin().abs() > 0.36 {
        return None;
    }

    let jde_mean = LUNATION_EPOCH + SYNODIC_MONTH * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;
    let m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3) * RADEG;
    let mp = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        * RADEG;
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3) * RADEG;
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let f1 = f - 0.02665 * RADEG * omega.sin();
    let a1 = (299.77 + 0.107_408 * k - 0.009_173 * t2) * RADEG;

    let (c_mp, c_m) = match syzygy {
        Syzygy::NewMoon => (-0.4075, 0.1721),
        Syzygy::FullMoon => (-0.4065, 0.1727),
    };

    let correction = c_mp * mp.sin() + c_m * e * m.sin() + 0.0161 * (2.0 * mp).sin()
        - 0.0097 * (2.0 * f1).sin()
        + 0.0073 * e * (mp - m).sin()
        - 0.0050 * e * (mp + m).sin()
        - 0.0023 * (mp - 2.0 * f1).sin()
        + 0.0021 * e * (2.0 * m).sin()
        + 0.0012 * (mp + 2.0 * f1).sin()
        + 0.0006 * e * (2.0 * mp + m).sin()
        - 0.0004 * (3.0 * mp).sin()
        - 0.0003 * e * (m + 2.0 * f1).sin()
        + 0.0003 * a1.sin()
        - 0.0002 * e * (m - 2.0 * f1).sin()
        - 0.0002 * e * (2.0 * mp - m).sin()
        - 0.0002 * omega.sin();

    let p = 0.2070 * e * m.sin() + 0.0024 * e * (2.0 * m).sin() - 0.0392 * mp.sin()
        + 0.0116 * (2.0 * mp).sin()
        - 0.0073 * e * (mp + m).sin()
        + 0.0067 * e * (mp - m).sin()
        + 0.0118 * (2.0 * f1).sin();
    let q = 5.2207 - 0.0048 * e * m.cos() + 0.0020 * e * (2.0 * m).cos() - 0.3299 * mp.cos()
        - 0.0060 * e * (mp + m).cos()
        + 0.0041 * e * (mp - m).cos();
    let w = f1.cos().abs();

    let gamma = (p * f1.cos() + q * f1.sin()) * (1.0 - 0.0048 * w);
    let u = 0.0059 + 0.0046 * e * m.cos() - 0.0182 * mp.cos() + 0.0004 * (2.0 * mp).cos()
        - 0.0005 * (m + mp).cos();

    Some(LunationGeometry {
        k,
        jde: jde_mean + correction,
        gamma,
        u,
        moon_anomaly: mp,
    })
}

#[cfg(test)]
mod lunation_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nearest_lunation() {
        assert_eq!(nearest_lunation(2457987.27, Syzygy::NewMoon), 218.0);
        assert_eq!(nearest_lunation(2451564.7, Syzygy::FullMoon), 0.5);
        assert_eq!(nearest_lunation(LUNATION_EPOCH - 100.0, Syzygy::NewMoon), -3.0);
    }

    #[test]
    fn test_solar_geometry_2017() {
        let geo = lunation_geometry(218.0, Syzygy::NewMoon).unwrap();
        assert_abs_diff_eq!(geo.jde, 2457987.26889, epsilon = 1e-5);
        assert_abs_diff_eq!(geo.gamma, 0.43639, epsilon = 1e-5);
        assert_abs_diff_eq!(geo.u, -0.00406, epsilon = 1e-5);
    }

    #[test]
    fn test_lunar_geometry_2000() {
        let geo = lunation_geometry(0.5, Syzygy::FullMoon).unwrap();
        assert_abs_diff_eq!(geo.jde, 2451564.69796, epsilon = 1e-5);
        assert_abs_diff_eq!(geo.gamma, -0.29611, epsilon = 1e-5);
        assert_abs_diff_eq!(geo.u, -0.00487, epsilon = 1e-5);
        assert_abs_diff_eq!(geo.shadow_speed(), 0.57878, epsilon = 1e-5);
    }

    #[test]
    fn test_far_from_node() {
        assert!(lunation_geometry(-6.0, Syzygy::NewMoon).is_none());
        assert!(lunation_geometry(242.5, Syzygy::FullMoon).is_none());
    }
}
