//! # Extremum searches
//!
//! Instants at which a lunar quantity reaches an extreme value: Earth–Moon distance (apsides),
//! declination, and optical libration in longitude or latitude.
//!
//! Each search follows the same two steps:
//!
//! 1. a **mean instant** from the cycle count `k`, closed form (Meeus, *Astronomical Algorithms*,
//!    ch. 50 for the apsides, ch. 52 for the declination; the libration extremes follow the
//!    anomalistic and draconic months);
//! 2. **parabolic refinement** of that guess on the ephemeris, see
//!    [`parabolic_extremum`](crate::numerics::parabolic_extremum).
//!
//! The constants of each cycle are selected by a `match` on the requested extreme.
use serde::{Deserialize, Serialize};

use crate::constants::{JulianDay, RADEG};
use crate::ephemeris::LunarSolarEphemeris;
use crate::geometry::angle::to180;
use crate::numerics::{parabolic_extremum, Extremum};
use crate::ref_system::{arcsec_to_deg, centuries_since_j2000, nutation};
use crate::search::SearchParams;
use crate::umbra_errors::UmbraError;

/// Inclination of the mean lunar equator on the ecliptic, degrees.
const LUNAR_EQUATOR_INCLINATION: f64 = 1.54242;

/// Mean perigee of 1999 December 22 and the anomalistic month.
const PERIGEE_EPOCH: JulianDay = 2_451_534.669_8;
const ANOMALISTIC_MONTH: f64 = 27.554_549_89;

/// Mean ascending node passage of 1999 December 30 and the draconic month.
const NODE_EPOCH: JulianDay = 2_451_537.949_61;
const DRACONIC_MONTH: f64 = 27.212_220_817;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Apsis {
    Perigee,
    Apogee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclinationExtreme {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LibrationExtreme {
    /// Largest positive libration in longitude.
    East,
    /// Largest negative libration in longitude.
    West,
    /// Largest positive libration in latitude.
    North,
    /// Largest negative libration in latitude.
    South,
}

/// A periodic cycle: `JDE = epoch + period·(k + phase) + Σ cᵢ·Tⁱ⁺²`, `T = (k + phase) / per_century`.
struct MeanCycle {
    epoch: JulianDay,
    period: f64,
    phase: f64,
    per_century: f64,
    secular: [f64; 3],
}

impl MeanCycle {
    fn apsis(apsis: Apsis) -> Self {
        MeanCycle {
            epoch: PERIGEE_EPOCH,
            period: ANOMALISTIC_MONTH,
            phase: match apsis {
                Apsis::Perigee => 0.0,
                Apsis::Apogee => 0.5,
            },
            per_century: 1325.55,
            secular: [-0.000_669_1, -0.000_001_098, 0.000_000_005_2],
        }
    }

    fn declination(extreme: DeclinationExtreme) -> Self {
        MeanCycle {
            epoch: match extreme {
                DeclinationExtreme::North => 2_451_562.589_7,
                DeclinationExtreme::South => 2_451_548.928_9,
            },
            period: 27.321_582_247,
            phase: 0.0,
            per_century: 1336.86,
            secular: [0.000_119_804, -0.000_000_141, 0.0],
        }
    }

    fn libration(extreme: LibrationExtreme) -> Self {
        let (epoch, period, phase) = match extreme {
            LibrationExtreme::East => (PERIGEE_EPOCH, ANOMALISTIC_MONTH, 0.25),
            LibrationExtreme::West => (PERIGEE_EPOCH, ANOMALISTIC_MONTH, 0.75),
            LibrationExtreme::North => (NODE_EPOCH, DRACONIC_MONTH, 0.75),
            LibrationExtreme::South => (NODE_EPOCH, DRACONIC_MONTH, 0.25),
        };
        MeanCycle {
            epoch,
            period,
            phase,
            per_century: 36_525.0 / period,
            secular: [0.0; 3],
        }
    }

    /// Mean instant of the cycle nearest to `jd`.
    fn nearest(&self, jd: JulianDay) -> JulianDay {
        let k = ((jd - self.epoch) / self.period - self.phase).round() + self.phase;
        let t = k / self.per_century;
        let [c2, c3, c4] = self.secular;
        self.epoch + self.period * k + t * t * (c2 + t * (c3 + t * c4))
    }
}

fn refine<F>(f: F, t0: JulianDay, params: &SearchParams) -> Result<Extremum, UmbraError>
where
    F: FnMut(f64) -> Result<f64, UmbraError>,
{
    let extremum = parabolic_extremum(
        f,
        t0,
        params.sample_half_width_days,
        params.convergence_days(),
        params.max_refinement_iterations,
    )?;
    log::debug!(
        "extremum refined from mean JD {t0} to JD {} ({:+.3} d)",
        extremum.t,
        extremum.t - t0
    );
    Ok(extremum)
}

/// Optical libration of the Moon `(l, b)` in degrees (Meeus ch. 53).
///
/// ```text
/// W = λ − Δψ − Ω
/// tan A = (sin W cos β cos I − sin β sin I) / (cos W cos β)
/// l = A − F
/// sin b = −sin W cos β sin I − sin β cos I
/// ```
pub fn optical_libration<E>(ephemeris: &E, jd: JulianDay) -> (f64, f64)
where
    E: LunarSolarEphemeris + ?Sized,
{
    let t = centuries_since_j2000(jd);
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let (moon, _) = ephemeris.moon_ecliptical(jd);
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;
    let omega = 125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t2 + t3 / 467_441.0
        - t4 / 60_616_000.0;

    let w = (moon.lambda - arcsec_to_deg(nutation(jd).delta_psi) - omega) * RADEG;
    let beta = moon.beta * RADEG;
    let i = LUNAR_EQUATOR_INCLINATION * RADEG;

    let a = (w.sin() * beta.cos() * i.cos() - beta.sin() * i.sin()).atan2(w.cos() * beta.cos());
    let l = to180(a / RADEG - f);
    let b = (-w.sin() * beta.cos() * i.sin() - beta.sin() * i.cos())
        .clamp(-1.0, 1.0)
        .asin()
        / RADEG;

    (l, b)
}

/// Perigee or apogee nearest to `jd`.
///
/// Return
/// ------
/// * The instant (JDE) and the Earth–Moon distance at that instant, Earth equatorial radii.
pub fn nearest_apsis<E>(
    ephemeris: &E,
    jd: JulianDay,
    apsis: Apsis,
    params: &SearchParams,
) -> Result<Extremum, UmbraError>
where
    E: LunarSolarEphemeris + ?Sized,
{
    let t0 = MeanCycle::apsis(apsis).nearest(jd);
    refine(|t| Ok(ephemeris.moon(t).distance), t0, params)
}

/// Greatest northern or southern declination of the Moon nearest to `jd`.
///
/// Return
/// ------
/// * The instant (JDE) and the apparent declination, degrees.
pub fn nearest_max_declination<E>(
    ephemeris: &E,
    jd: JulianDay,
    extreme: DeclinationExtreme,
    params: &SearchParams,
) -> Result<Extremum, UmbraError>
where
    E: LunarSolarEphemeris + ?Sized,
{
    let t0 = MeanCycle::declination(extreme).nearest(jd);
    refine(|t| Ok(ephemeris.moon(t).equatorial.delta), t0, params)
}

/// Libration extreme nearest to `jd`.
///
/// Return
/// ------
/// * The instant (JDE) and the libration in longitude (`East`, `West`) or latitude (`North`,
///   `South`), degrees.
pub fn nearest_max_libration<E>(
    ephemeris: &E,
    jd: JulianDay,
    extreme: LibrationExtreme,
    params: &SearchParams,
) -> Result<Extremum, UmbraError>
where
    E: LunarSolarEphemeris + ?Sized,
{
    let t0 = MeanCycle::libration(extreme).nearest(jd);
    match extreme {
        LibrationExtreme::East | LibrationExtreme::West => {
            refine(|t| Ok(optical_libration(ephemeris, t).0), t0, params)
        }
        LibrationExtreme::North | LibrationExtreme::South => {
            refine(|t| Ok(optical_libration(ephemeris, t).1), t0, params)
        }
    }
}
