//! # Polynomial elements
//!
//! Five instant element sets, equally spaced in time, are condensed into cubic polynomials in the
//! normalized time `t = (jd − jd0) / step`, with the samples at `t = −2, −1, 0, 1, 2`. The result
//! is a continuous-time element provider valid over `[jd0 − 2·step, jd0 + 2·step]`; evaluating
//! outside that window is an error.
//!
//! Circular quantities (`μ` for solar eclipses, the Moon's right ascension for lunar eclipses)
//! are unwrapped with [`align_angles`] before fitting and wrapped back to `[0, 360)` after
//! evaluation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use umbra::ephemeris::LowPrecisionEphemeris;
//! use umbra::polynomial_elements::PolynomialBesselianElements;
//!
//! // 2017 August 21, samples every hour around 18h TT
//! let poly = PolynomialBesselianElements::from_ephemeris(
//!     &LowPrecisionEphemeris, 2457987.25, 1.0 / 24.0, 68.4,
//! ).unwrap();
//! let at_max = poly.evaluate(2457987.27).unwrap();
//! println!("X = {}, Y = {}", at_max.x, at_max.y);
//! ```
use serde::{Deserialize, Serialize};

use crate::besselian::InstantBesselianElements;
use crate::constants::{JulianDay, Seconds, SPACING_EPS};
use crate::ephemeris::LunarSolarEphemeris;
use crate::geometry::angle::{align_angles, to360};
use crate::lunar_elements::InstantLunarEclipseElements;
use crate::numerics::{least_squares_fit, polynomial_derivative, polynomial_value};
use crate::umbra_errors::UmbraError;

/// Number of instant samples a fit is built from.
pub const SAMPLE_COUNT: usize = 5;

/// Degree of the fitted polynomials.
pub const POLYNOMIAL_DEGREE: usize = 3;

/// Power-series coefficients `c0 + c1·t + c2·t² + c3·t³`.
pub type Coefficients = [f64; POLYNOMIAL_DEGREE + 1];

/// Normalized abscissas of the samples.
const SAMPLE_T: [f64; SAMPLE_COUNT] = [-2.0, -1.0, 0.0, 1.0, 2.0];

/// Check the sample instants and return their spacing.
///
/// Errors
/// ------
/// * [`UmbraError::InvalidSampleCount`] unless exactly 5 instants are given.
/// * [`UmbraError::NonAscendingSamples`] at the first instant not after its predecessor.
/// * [`UmbraError::NonUniformSpacing`] if a gap differs from the first one by more than 1e-6 d.
fn sample_step(jds: &[JulianDay]) -> Result<f64, UmbraError> {
    if jds.len() != SAMPLE_COUNT {
        return Err(UmbraError::InvalidSampleCount {
            expected: SAMPLE_COUNT,
            found: jds.len(),
        });
    }

    let step = jds[1] - jds[0];
    for (index, pair) in jds.windows(2).enumerate() {
        let gap = pair[1] - pair[0];
        if gap <= 0.0 {
            return Err(UmbraError::NonAscendingSamples(index + 1));
        }
        if (gap - step).abs() > SPACING_EPS {
            return Err(UmbraError::NonUniformSpacing {
                index: index + 1,
                expected: step,
                found: gap,
            });
        }
    }

    Ok(step)
}

fn fit_field(values: &[f64]) -> Result<Coefficients, UmbraError> {
    let fit = least_squares_fit(&SAMPLE_T, values, POLYNOMIAL_DEGREE)?;
    let mut coeffs = [0.0; POLYNOMIAL_DEGREE + 1];
    coeffs.copy_from_slice(&fit);
    Ok(coeffs)
}

/// Epoch, spacing and validity window shared by both kinds of polynomial elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct FitWindow {
    jd0: JulianDay,
    step: f64,
}

impl FitWindow {
    fn bounds(&self) -> (JulianDay, JulianDay) {
        (self.jd0 - 2.0 * self.step, self.jd0 + 2.0 * self.step)
    }

    fn normalized_time(&self, jd: JulianDay) -> Result<f64, UmbraError> {
        let (start, end) = self.bounds();
        if !(start..=end).contains(&jd) {
            return Err(UmbraError::OutOfValidityWindow { jd, start, end });
        }
        Ok((jd - self.jd0) / self.step)
    }
}

/// Five sample instants `jd0 + i·step`, `i = −2..=2`.
fn sample_instants(jd0: JulianDay, step: f64) -> Result<[JulianDay; SAMPLE_COUNT], UmbraError> {
    if step.is_nan() || step <= 0.0 {
        return Err(UmbraError::InvalidParameter(format!(
            "sample step must be positive, got {step}"
        )));
    }
    Ok(SAMPLE_T.map(|t| jd0 + t * step))
}

/// Hourly rates of the Besselian elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BesselianRates {
    /// Earth radii per hour.
    pub dx: f64,
    pub dy: f64,
    /// Degrees per hour.
    pub dd: f64,
    /// Degrees per hour.
    pub dmu: f64,
    pub dl1: f64,
    pub dl2: f64,
}

/// Besselian elements as cubic polynomials of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialBesselianElements {
    /// Epoch of the expansion (instant of the middle sample), JD (TT).
    pub jd0: JulianDay,
    /// Spacing of the source samples, days.
    pub step: f64,
    /// ΔT, seconds.
    pub delta_t: Seconds,
    pub x: Coefficients,
    pub y: Coefficients,
    pub d: Coefficients,
    pub mu: Coefficients,
    pub l1: Coefficients,
    pub l2: Coefficients,
    pub tan_f1: Coefficients,
    pub tan_f2: Coefficients,
}

/// Usual name for the solar polynomial elements.
pub type PolynomialElements = PolynomialBesselianElements;

impl PolynomialBesselianElements {
    /// Fit cubic polynomials through five instant element sets.
    ///
    /// Arguments
    /// ---------
    /// * `samples`: exactly 5 element sets, ascending, equally spaced (within 1e-6 d).
    ///
    /// Return
    /// ------
    /// * The polynomial elements with `jd0` the instant of the middle sample; ΔT is taken from it.
    ///
    /// Errors
    /// ------
    /// * Any sample precondition error, see [`UmbraError`].
    pub fn fit(samples: &[InstantBesselianElements]) -> Result<Self, UmbraError> {
        let jds: Vec<JulianDay> = samples.iter().map(|s| s.jd).collect();
        let step = sample_step(&jds)?;
        let middle = &samples[SAMPLE_COUNT / 2];

        let field = |get: fn(&InstantBesselianElements) -> f64| -> Result<Coefficients, UmbraError> {
            let values: Vec<f64> = samples.iter().map(get).collect();
            fit_field(&values)
        };

        let mu_values: Vec<f64> = samples.iter().map(|s| s.mu).collect();

        Ok(PolynomialBesselianElements {
            jd0: middle.jd,
            step,
            delta_t: middle.delta_t,
            x: field(|s| s.x)?,
            y: field(|s| s.y)?,
            d: field(|s| s.d)?,
            mu: fit_field(&align_angles(&mu_values))?,
            l1: field(|s| s.l1)?,
            l2: field(|s| s.l2)?,
            tan_f1: field(|s| s.tan_f1)?,
            tan_f2: field(|s| s.tan_f2)?,
        })
    }

    /// Sample an ephemeris at `jd0 + i·step` (`i = −2..=2`) and fit.
    ///
    /// Arguments
    /// ---------
    /// * `ephemeris`: Sun and Moon positions provider.
    /// * `jd0`: epoch of the expansion, JD (TT).
    /// * `step`: spacing between samples, days (must be positive).
    /// * `delta_t`: ΔT in seconds.
    pub fn from_ephemeris<E: LunarSolarEphemeris + ?Sized>(
        ephemeris: &E,
        jd0: JulianDay,
        step: f64,
        delta_t: Seconds,
    ) -> Result<Self, UmbraError> {
        let samples: Vec<InstantBesselianElements> = sample_instants(jd0, step)?
            .iter()
            .map(|&jd| {
                InstantBesselianElements::from_position(&ephemeris.sun_moon_position(jd), delta_t)
            })
            .collect();
        Self::fit(&samples)
    }

    fn fit_window(&self) -> FitWindow {
        FitWindow {
            jd0: self.jd0,
            step: self.step,
        }
    }

    /// Validity window `[jd0 − 2·step, jd0 + 2·step]`.
    pub fn window(&self) -> (JulianDay, JulianDay) {
        self.fit_window().bounds()
    }

    /// Whether `jd` is inside the validity window.
    pub fn contains(&self, jd: JulianDay) -> bool {
        self.fit_window().normalized_time(jd).is_ok()
    }

    /// Evaluate the elements at `jd`.
    ///
    /// The cubic does not pass through the samples it was fitted on. For hourly to two-hourly
    /// ephemeris samples the residual at `jd0` stays below `1e-6` Earth radii on `x`, `y`, `l1`
    /// and `l2`, and below `1e-7` degree on `d` and `mu`.
    ///
    /// Errors
    /// ------
    /// * [`UmbraError::OutOfValidityWindow`] if `jd` is outside [`window`](Self::window).
    pub fn evaluate(&self, jd: JulianDay) -> Result<InstantBesselianElements, UmbraError> {
        let t = self.fit_window().normalized_time(jd)?;
        let per_hour = 1.0 / (self.step * 24.0);

        Ok(InstantBesselianElements {
            jd,
            delta_t: self.delta_t,
            x: polynomial_value(&self.x, t),
            y: polynomial_value(&self.y, t),
            l1: polynomial_value(&self.l1, t),
            l2: polynomial_value(&self.l2, t),
            d: polynomial_value(&self.d, t),
            mu: to360(polynomial_value(&self.mu, t)),
            tan_f1: polynomial_value(&self.tan_f1, t),
            tan_f2: polynomial_value(&self.tan_f2, t),
            dx: Some(polynomial_derivative(&self.x, t) * per_hour),
            dy: Some(polynomial_derivative(&self.y, t) * per_hour),
        })
    }

    /// Hourly rates of the elements at `jd`.
    pub fn rates(&self, jd: JulianDay) -> Result<BesselianRates, UmbraError> {
        let t = self.fit_window().normalized_time(jd)?;
        let per_hour = 1.0 / (self.step * 24.0);
        let rate = |c: &Coefficients| polynomial_derivative(c, t) * per_hour;

        Ok(BesselianRates {
            dx: rate(&self.x),
            dy: rate(&self.y),
            dd: rate(&self.d),
            dmu: rate(&self.mu),
            dl1: rate(&self.l1),
            dl2: rate(&self.l2),
        })
    }
}

/// Fit polynomial Besselian elements through five instants.
///
/// See [`PolynomialBesselianElements::fit`].
pub fn fit_polynomial_elements(
    samples: &[InstantBesselianElements],
) -> Result<PolynomialBesselianElements, UmbraError> {
    PolynomialBesselianElements::fit(samples)
}

/// Lunar eclipse elements as cubic polynomials of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialLunarEclipseElements {
    pub jd0: JulianDay,
    pub step: f64,
    pub delta_t: Seconds,
    pub x: Coefficients,
    pub y: Coefficients,
    pub f1: Coefficients,
    pub f2: Coefficients,
    pub f3: Coefficients,
    pub alpha: Coefficients,
    pub delta: Coefficients,
    pub parallax: Coefficients,
}

impl PolynomialLunarEclipseElements {
    /// Fit cubic polynomials through five instant lunar eclipse element sets.
    ///
    /// Same preconditions as [`PolynomialBesselianElements::fit`].
    pub fn fit(samples: &[InstantLunarEclipseElements]) -> Result<Self, UmbraError> {
        let jds: Vec<JulianDay> = samples.iter().map(|s| s.jd).collect();
        let step = sample_step(&jds)?;
        let middle = &samples[SAMPLE_COUNT / 2];

        let field =
            |get: fn(&InstantLunarEclipseElements) -> f64| -> Result<Coefficients, UmbraError> {
                let values: Vec<f64> = samples.iter().map(get).collect();
                fit_field(&values)
            };

        let alpha_values: Vec<f64> = samples.iter().map(|s| s.alpha).collect();

        Ok(PolynomialLunarEclipseElements {
            jd0: middle.jd,
            step,
            delta_t: middle.delta_t,
            x: field(|s| s.x)?,
            y: field(|s| s.y)?,
            f1: field(|s| s.f1)?,
            f2: field(|s| s.f2)?,
            f3: field(|s| s.f3)?,
            alpha: fit_field(&align_angles(&alpha_values))?,
            delta: field(|s| s.delta)?,
            parallax: field(|s| s.parallax)?,
        })
    }

    /// Sample an ephemeris at `jd0 + i·step` (`i = −2..=2`) and fit.
    pub fn from_ephemeris<E: LunarSolarEphemeris + ?Sized>(
        ephemeris: &E,
        jd0: JulianDay,
        step: f64,
        delta_t: Seconds,
    ) -> Result<Self, UmbraError> {
        let samples: Vec<InstantLunarEclipseElements> = sample_instants(jd0, step)?
            .iter()
            .map(|&jd| {
                InstantLunarEclipseElements::from_position(
                    &ephemeris.sun_moon_position(jd),
                    delta_t,
                )
            })
            .collect();
        Self::fit(&samples)
    }

    fn fit_window(&self) -> FitWindow {
        FitWindow {
            jd0: self.jd0,
            step: self.step,
        }
    }

    pub fn window(&self) -> (JulianDay, JulianDay) {
        self.fit_window().bounds()
    }

    /// Evaluate the elements at `jd`.
    ///
    /// Errors
    /// ------
    /// * [`UmbraError::OutOfValidityWindow`] if `jd` is outside [`window`](Self::window).
    pub fn evaluate(&self, jd: JulianDay) -> Result<InstantLunarEclipseElements, UmbraError> {
        let t = self.fit_window().normalized_time(jd)?;

        Ok(InstantLunarEclipseElements {
            jd,
            delta_t: self.delta_t,
            x: polynomial_value(&self.x, t),
            y: polynomial_value(&self.y, t),
            f1: polynomial_value(&self.f1, t),
            f2: polynomial_value(&self.f2, t),
            f3: polynomial_value(&self.f3, t),
            alpha: to360(polynomial_value(&self.alpha, t)),
            delta: polynomial_value(&self.delta, t),
            parallax: polynomial_value(&self.parallax, t),
        })
    }
}
