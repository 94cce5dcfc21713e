use thiserror::Error;

use crate::constants::JulianDay;

#[derive(Error, Debug, Clone)]
pub enum UmbraError {
    #[error("Expected {expected} element samples, found {found}")]
    InvalidSampleCount { expected: usize, found: usize },

    #[error("Element samples are not in ascending order at index {0}")]
    NonAscendingSamples(usize),

    #[error("Non-uniform sample spacing at index {index}: expected {expected} d, found {found} d")]
    NonUniformSpacing {
        index: usize,
        expected: f64,
        found: f64,
    },

    #[error("Interpolation fraction {0} is outside [0, 1]")]
    FractionOutOfRange(f64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Julian Day {jd} is outside the validity window [{start}, {end}]")]
    OutOfValidityWindow {
        jd: JulianDay,
        start: JulianDay,
        end: JulianDay,
    },

    #[error("{what} did not converge after {iterations} iterations")]
    NonConvergence { what: String, iterations: usize },

    #[error("Root is not bracketed on [{a}, {b}]")]
    RootNotBracketed { a: f64, b: f64 },

    #[error("Search was cancelled")]
    SearchCancelled,
}

impl UmbraError {
    pub(crate) fn non_convergence(what: &str, iterations: usize) -> Self {
        UmbraError::NonConvergence {
            what: what.to_string(),
            iterations,
        }
    }
}

impl PartialEq for UmbraError {
    fn eq(&self, other: &Self) -> bool {
        use UmbraError::*;
        match (self, other) {
            (
                InvalidSampleCount {
                    expected: a,
                    found: b,
                },
                InvalidSampleCount {
                    expected: c,
                    found: d,
                },
            ) => a == c && b == d,
            (NonAscendingSamples(a), NonAscendingSamples(b)) => a == b,
            (NonUniformSpacing { index: a, .. }, NonUniformSpacing { index: b, .. }) => a == b,
            (FractionOutOfRange(a), FractionOutOfRange(b)) => a == b,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // Window bounds are floats computed from the fit: same variant is enough
            (OutOfValidityWindow { .. }, OutOfValidityWindow { .. }) => true,
            (RootNotBracketed { .. }, RootNotBracketed { .. }) => true,

            (NonConvergence { what: a, .. }, NonConvergence { what: b, .. }) => a == b,
            (SearchCancelled, SearchCancelled) => true,

            _ => false,
        }
    }
}
