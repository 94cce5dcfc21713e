//! Open curves of geographic points assembled from an unordered stream.
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::Degree;
use crate::coordinates::GeographicCoordinate;

/// An open polyline on the Earth.
///
/// Each new point is attached to whichever end of the curve is closer to it on the great circle,
/// so the curve stays continuous when the points arrive from two branches at once, as the two
/// rise/set points of one instant do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    points: VecDeque<GeographicCoordinate>,
}

impl Curve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `point` at the nearest end.
    pub fn push(&mut self, point: GeographicCoordinate) {
        let (Some(front), Some(back)) = (self.points.front(), self.points.back()) else {
            self.points.push_back(point);
            return;
        };

        if point.angular_distance(front) < point.angular_distance(back) {
            self.points.push_front(point);
        } else {
            self.points.push_back(point);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points from one end of the curve to the other.
    pub fn points(&self) -> impl Iterator<Item = &GeographicCoordinate> {
        self.points.iter()
    }

    /// Largest angular distance between two consecutive points, degrees; 0 for fewer than two
    /// points.
    pub fn max_gap(&self) -> Degree {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| a.angular_distance(b))
            .fold(0.0, f64::max)
    }

    pub fn into_vec(self) -> Vec<GeographicCoordinate> {
        self.points.into()
    }
}

impl FromIterator<GeographicCoordinate> for Curve {
    fn from_iter<I: IntoIterator<Item = GeographicCoordinate>>(iter: I) -> Self {
        let mut curve = Curve::new();
        for point in iter {
            curve.push(point);
        }
        curve
    }
}

#[cfg(test)]
mod curve_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn along_parallel(longitudes: impl IntoIterator<Item = i32>) -> Curve {
        longitudes
            .into_iter()
            .map(|lon| GeographicCoordinate::new(30.0, lon as f64))
            .collect()
    }

    #[test]
    fn test_empty() {
        let curve = Curve::new();
        assert!(curve.is_empty());
        assert_eq!(curve.max_gap(), 0.0);
    }

    #[test]
    fn test_two_branches() {
        // Middle of the curve first, then both ends growing outward alternately
        let mut order = vec![0];
        for i in 1..=10 {
            order.push(i);
            order.push(-i);
        }
        let curve = along_parallel(order);
        assert_eq!(curve.len(), 21);

        let longitudes: Vec<f64> = curve.points().map(|p| p.longitude).collect();
        let ascending = longitudes.windows(2).all(|w| w[0] < w[1]);
        let descending = longitudes.windows(2).all(|w| w[0] > w[1]);
        assert!(ascending || descending);
    }

    #[test]
    fn test_wrapped_stream() {
        // A chronological stream that starts half way along the curve
        let curve = along_parallel((10..=20).chain((0..10).rev()));
        let one_degree = GeographicCoordinate::new(30.0, 0.0)
            .angular_distance(&GeographicCoordinate::new(30.0, 1.0));
        assert_abs_diff_eq!(curve.max_gap(), one_degree, epsilon = 1e-9);

        let points = curve.into_vec();
        assert_eq!(points.len(), 21);
        assert_abs_diff_eq!(points[0].longitude.abs(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_across_antimeridian() {
        let curve = along_parallel([178, 179, 180, -179, -178]);
        assert!(curve.max_gap() < 1.0);
    }
}
