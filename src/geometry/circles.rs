use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::constants::CIRCLE_EPS;

/// A circle of the fundamental plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Circle {
            center: Point2::new(x, y),
            radius,
        }
    }

    /// The unit circle centered on the origin (the Earth limb on the fundamental plane).
    pub fn unit() -> Self {
        Circle::new(0.0, 0.0, 1.0)
    }
}

/// Outcome of a circle–circle intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleIntersection {
    /// Disjoint, nested or concentric circles.
    None,
    /// Tangent circles (within [`CIRCLE_EPS`]).
    Tangent(Point2<f64>),
    /// Two crossing points.
    Secant(Point2<f64>, Point2<f64>),
}

impl CircleIntersection {
    pub fn count(&self) -> usize {
        match self {
            CircleIntersection::None => 0,
            CircleIntersection::Tangent(_) => 1,
            CircleIntersection::Secant(_, _) => 2,
        }
    }

    pub fn points(&self) -> Vec<Point2<f64>> {
        match *self {
            CircleIntersection::None => vec![],
            CircleIntersection::Tangent(p) => vec![p],
            CircleIntersection::Secant(p, q) => vec![p, q],
        }
    }
}

/// Intersect two circles.
///
/// With `d` the distance between centers, the radical line lies at `a = (r1² − r2² + d²) / 2d`
/// from the first center and the half-chord satisfies `h² = r1² − a²`. The sign of `h²` decides the
/// case; `|h²| ≤ 1e-7` is reported as a single tangent point.
///
/// Arguments
/// ---------
/// * `c1`, `c2`: the two circles.
///
/// Return
/// ------
/// * A [`CircleIntersection`] with 0, 1 or 2 points.
pub fn intersect(c1: &Circle, c2: &Circle) -> CircleIntersection {
    let delta: Vector2<f64> = c2.center - c1.center;
    let d = delta.norm();

    if d < CIRCLE_EPS {
        return CircleIntersection::None;
    }

    let a = (c1.radius * c1.radius - c2.radius * c2.radius + d * d) / (2.0 * d);
    let h2 = c1.radius * c1.radius - a * a;

    let unit = delta / d;
    let base = c1.center + unit * a;

    if h2.abs() <= CIRCLE_EPS {
        return CircleIntersection::Tangent(base);
    }
    if h2 < 0.0 {
        return CircleIntersection::None;
    }

    let h = h2.sqrt();
    let normal = Vector2::new(-unit.y, unit.x);
    CircleIntersection::Secant(base + normal * h, base - normal * h)
}

/// Area common to two disks.
///
/// ```text
/// A = r1²·acos((d² + r1² − r2²) / 2d·r1) + r2²·acos((d² + r2² − r1²) / 2d·r2)
///     − ½·√((−d + r1 + r2)(d + r1 − r2)(d − r1 + r2)(d + r1 + r2))
/// ```
/// Disjoint disks give 0 and nested disks the area of the smaller one.
pub fn overlap_area(c1: &Circle, c2: &Circle) -> f64 {
    let (r1, r2) = (c1.radius, c2.radius);
    let d = (c2.center - c1.center).norm();

    if d >= r1 + r2 {
        return 0.0;
    }
    if d <= (r1 - r2).abs() {
        return std::f64::consts::PI * r1.min(r2).powi(2);
    }

    let a1 = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1)).clamp(-1.0, 1.0).acos();
    let a2 = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2)).clamp(-1.0, 1.0).acos();
    let kite = (-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2);

    r1 * r1 * a1 + r2 * r2 * a2 - 0.5 * kite.max(0.0).sqrt()
}

#[cfg(test)]
mod circles_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_secant() {
        let res = intersect(&Circle::unit(), &Circle::new(1.0, 0.0, 1.0));
        let pts = res.points();
        assert_eq!(pts.len(), 2);
        for p in pts {
            assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y.abs(), 3f64.sqrt() / 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_external_tangent() {
        match intersect(&Circle::unit(), &Circle::new(0.0, 1.5, 0.5)) {
            CircleIntersection::Tangent(p) => {
                assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
            }
            other => panic!("expected tangent, got {other:?}"),
        }
    }

    #[test]
    fn test_disjoint_and_nested() {
        assert_eq!(
            intersect(&Circle::unit(), &Circle::new(3.0, 0.0, 0.5)).count(),
            0
        );
        assert_eq!(
            intersect(&Circle::unit(), &Circle::new(0.2, 0.1, 0.3)).count(),
            0
        );
        assert_eq!(
            intersect(&Circle::unit(), &Circle::new(0.0, 0.0, 0.5)).count(),
            0
        );
    }

    #[test]
    fn test_overlap_area() {
        use std::f64::consts::PI;

        let unit = Circle::unit();
        assert_eq!(overlap_area(&unit, &Circle::new(2.5, 0.0, 1.0)), 0.0);
        assert_abs_diff_eq!(
            overlap_area(&unit, &Circle::new(0.1, 0.0, 0.5)),
            PI * 0.25,
            epsilon = 1e-12
        );

        // Two unit disks one radius apart
        let lens = 2.0 * PI / 3.0 - 3f64.sqrt() / 2.0;
        assert_abs_diff_eq!(
            overlap_area(&unit, &Circle::new(1.0, 0.0, 1.0)),
            lens,
            epsilon = 1e-12
        );
    }
}
