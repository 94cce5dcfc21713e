//! # Numerical helpers
//!
//! Small numerical kernels shared by the element fits, the eclipse search and the map builder:
//!
//! - [`least_squares_fit`] – polynomial least-squares fit through the normal equations
//!   (`nalgebra` LU solve),
//! - [`polynomial_value`] / [`polynomial_derivative`] – Horner evaluation of power series,
//! - [`lagrange_interpolate`] – classical Lagrange interpolation through arbitrary nodes,
//! - [`bisect`] – root bracketing by bisection,
//! - [`parabolic_extremum`] – three-point parabolic refinement of a maximum or minimum.
//!
//! Sampled functions are fallible (`Result<f64, UmbraError>`) because they typically evaluate a
//! polynomial with a bounded validity window; any sampling error aborts the kernel with `?`.
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::umbra_errors::UmbraError;

/// Least-squares polynomial fit `y ≈ Σ cₙ·xⁿ`.
///
/// Arguments
/// ---------
/// * `xs`: abscissas.
/// * `ys`: ordinates, same length as `xs`.
/// * `degree`: polynomial degree; at least `degree + 1` points are required.
///
/// Return
/// ------
/// * The `degree + 1` coefficients in increasing power order.
///
/// Remarks
/// -------
/// * With exactly `degree + 1` points the fit degenerates to interpolation, and data generated
///   from a polynomial of degree ≤ `degree` is reproduced to rounding error.
pub fn least_squares_fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>, UmbraError> {
    let n = degree + 1;
    if xs.len() != ys.len() {
        return Err(UmbraError::InvalidParameter(format!(
            "abscissas and ordinates differ in length ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < n {
        return Err(UmbraError::InvalidSampleCount {
            expected: n,
            found: xs.len(),
        });
    }

    let vandermonde = DMatrix::from_fn(xs.len(), n, |i, j| xs[i].powi(j as i32));
    let rhs = DVector::from_column_slice(ys);

    let normal = vandermonde.transpose() * &vandermonde;
    let projected = vandermonde.transpose() * rhs;

    let Some(coeffs) = normal.lu().solve(&projected) else {
        return Err(UmbraError::InvalidParameter(
            "singular normal matrix in least-squares fit".into(),
        ));
    };

    Ok(coeffs.iter().copied().collect())
}

/// Evaluate `Σ cₙ·tⁿ` with Horner's scheme.
pub fn polynomial_value(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Evaluate the first derivative `Σ n·cₙ·tⁿ⁻¹`.
pub fn polynomial_derivative(coeffs: &[f64], t: f64) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (n, c)| acc * t + n as f64 * c)
}

/// Lagrange interpolation of `(xs, ys)` at `x`.
///
/// Errors
/// ------
/// * [`UmbraError::InvalidSampleCount`] if no node is given or lengths differ.
/// * [`UmbraError::InvalidParameter`] on duplicated nodes.
pub fn lagrange_interpolate(xs: &[f64], ys: &[f64], x: f64) -> Result<f64, UmbraError> {
    if xs.is_empty() || xs.len() != ys.len() {
        return Err(UmbraError::InvalidSampleCount {
            expected: xs.len().max(1),
            found: ys.len(),
        });
    }

    let mut sum = 0.0;
    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let mut weight = 1.0;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            let den = xi - xj;
            if den == 0.0 {
                return Err(UmbraError::InvalidParameter(format!(
                    "duplicated interpolation node {xi}"
                )));
            }
            weight *= (x - xj) / den;
        }
        sum += weight * yi;
    }
    Ok(sum)
}

/// Find a root of `f` inside `[a, b]` by bisection.
///
/// Arguments
/// ---------
/// * `f`: the function, whose sign must differ at both ends.
/// * `a`, `b`: the bracket.
/// * `tolerance`: stop once the bracket is narrower than this.
/// * `max_iterations`: hard bound on halvings.
///
/// Return
/// ------
/// * The midpoint of the final bracket.
///
/// Errors
/// ------
/// * [`UmbraError::RootNotBracketed`] if `f(a)` and `f(b)` have the same strict sign.
/// * [`UmbraError::NonConvergence`] if the bracket is still wider than `tolerance` after
///   `max_iterations` halvings.
/// * Any error raised by `f`.
pub fn bisect<F>(
    mut f: F,
    a: f64,
    b: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<f64, UmbraError>
where
    F: FnMut(f64) -> Result<f64, UmbraError>,
{
    let (mut lo, mut hi) = (a.min(b), a.max(b));
    let mut f_lo = f(lo)?;
    let f_hi = f(hi)?;

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(UmbraError::RootNotBracketed { a: lo, b: hi });
    }

    for _ in 0..max_iterations {
        let mid = 0.5 * (lo + hi);
        if hi - lo < tolerance {
            return Ok(mid);
        }
        let f_mid = f(mid)?;
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    if hi - lo < tolerance {
        Ok(0.5 * (lo + hi))
    } else {
        Err(UmbraError::non_convergence("bisection", max_iterations))
    }
}

/// Result of a parabolic extremum refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    /// Abscissa of the extremum (usually a Julian Day).
    pub t: f64,
    /// Value of the sampled function at `t`.
    pub value: f64,
}

/// Locate the extremum of a smooth function near `t0` by iterated parabolic fits.
///
/// At each step the function is sampled at `t − h`, `t`, `t + h`; the vertex of the parabola
/// through the three samples gives an offset, and the center is shifted by it. The loop stops once
/// the offset is smaller than `convergence`.
///
/// Arguments
/// ---------
/// * `f`: sampled function (maximum or minimum, the vertex formula does not care).
/// * `t0`: initial guess, typically a mean instant predicted in closed form.
/// * `half_width`: sampling half-width `h`.
/// * `convergence`: stop threshold on the vertex offset, same unit as `t`.
/// * `max_iterations`: bound on parabola fits.
///
/// Errors
/// ------
/// * [`UmbraError::NonConvergence`] if the samples are collinear (no vertex) or the offset is
///   still above `convergence` after `max_iterations` steps.
pub fn parabolic_extremum<F>(
    mut f: F,
    t0: f64,
    half_width: f64,
    convergence: f64,
    max_iterations: usize,
) -> Result<Extremum, UmbraError>
where
    F: FnMut(f64) -> Result<f64, UmbraError>,
{
    let mut t = t0;

    for iteration in 0..max_iterations {
        let y_minus = f(t - half_width)?;
        let y_zero = f(t)?;
        let y_plus = f(t + half_width)?;

        let curvature = y_minus - 2.0 * y_zero + y_plus;
        if curvature == 0.0 {
            return Err(UmbraError::non_convergence(
                "parabolic refinement (flat samples)",
                iteration + 1,
            ));
        }

        let offset = half_width * (y_minus - y_plus) / (2.0 * curvature);
        t += offset;

        if offset.abs() < convergence {
            log::trace!("parabolic refinement converged after {} steps", iteration + 1);
            let value = f(t)?;
            return Ok(Extremum { t, value });
        }
    }

    Err(UmbraError::non_convergence(
        "parabolic refinement",
        max_iterations,
    ))
}

#[cfg(test)]
mod numerics_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_least_squares_exact_cubic() {
        let coeffs = [1.5, -0.25, 0.125, 0.01];
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let ys: Vec<f64> = xs.iter().map(|&x| polynomial_value(&coeffs, x)).collect();

        let fit = least_squares_fit(&xs, &ys, 3).unwrap();
        for (a, b) in fit.iter().zip(coeffs) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_least_squares_line() {
        // Slope and intercept from the closed-form regression
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 2.9, 5.1, 7.0];
        let fit = least_squares_fit(&xs, &ys, 1).unwrap();
        assert_abs_diff_eq!(fit[1], 2.02, epsilon = 1e-12);
        assert_abs_diff_eq!(fit[0], 0.97, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares_errors() {
        assert_eq!(
            least_squares_fit(&[0.0, 1.0], &[0.0, 1.0], 3),
            Err(UmbraError::InvalidSampleCount {
                expected: 4,
                found: 2
            })
        );
        assert!(least_squares_fit(&[0.0, 1.0], &[0.0], 1).is_err());
    }

    #[test]
    fn test_polynomial_derivative() {
        let coeffs = [3.0, 2.0, -1.0, 0.5];
        // 2 − 2t + 1.5t²
        assert_abs_diff_eq!(polynomial_derivative(&coeffs, 2.0), 4.0, epsilon = 1e-12);
        assert_eq!(polynomial_derivative(&[7.0], 3.0), 0.0);
    }

    #[test]
    fn test_lagrange() {
        let xs = [0.0, 1.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x - 2.0 * x + 1.0).collect();
        assert_abs_diff_eq!(lagrange_interpolate(&xs, &ys, 2.0).unwrap(), 1.0, epsilon = 1e-12);
        assert!(lagrange_interpolate(&[1.0, 1.0], &[0.0, 0.0], 0.5).is_err());
    }

    #[test]
    fn test_bisect() {
        let root = bisect(|x| Ok(x * x - 2.0), 0.0, 2.0, 1e-12, 200).unwrap();
        assert_abs_diff_eq!(root, 2f64.sqrt(), epsilon = 1e-11);

        assert_eq!(
            bisect(|x| Ok(x * x + 1.0), -1.0, 1.0, 1e-9, 100),
            Err(UmbraError::RootNotBracketed { a: -1.0, b: 1.0 })
        );
        assert!(matches!(
            bisect(|x| Ok(x - 0.3), 0.0, 1.0, 1e-15, 3),
            Err(UmbraError::NonConvergence { .. })
        ));
    }

    #[test]
    fn test_parabolic_extremum() {
        let ext = parabolic_extremum(|t| Ok((t - 0.3).cos()), 1.0, 0.5, 1e-9, 50).unwrap();
        assert_abs_diff_eq!(ext.t, 0.3, epsilon = 1e-8);
        assert_abs_diff_eq!(ext.value, 1.0, epsilon = 1e-12);

        // Exact on a true parabola: one step
        let ext = parabolic_extremum(|t| Ok(2.0 * (t - 5.0).powi(2) - 1.0), 3.0, 0.5, 1e-9, 2)
            .unwrap();
        assert_abs_diff_eq!(ext.t, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ext.value, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parabolic_extremum_flat() {
        assert!(matches!(
            parabolic_extremum(|_| Ok(4.0), 0.0, 0.5, 1e-6, 10),
            Err(UmbraError::NonConvergence { .. })
        ));
    }
}
