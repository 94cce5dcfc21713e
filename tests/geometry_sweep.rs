use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use umbra::coordinates::GeographicCoordinate;
use umbra::geometry::circles::{intersect, overlap_area, Circle};
use umbra::map::curve::Curve;
use umbra::numerics::{least_squares_fit, polynomial_value};

#[test]
fn test_circle_intersection_sweep() {
    let mut rng = StdRng::seed_from_u64(42);
    let earth = Circle::unit();
    let margin = 1e-3;

    for _ in 0..2000 {
        let other = Circle::new(
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
            rng.random_range(0.05..2.0),
        );
        let d = other.center.coords.norm();
        let r = other.radius;
        let hits = intersect(&earth, &other);

        if d < r + 1.0 - margin && d > (1.0 - r).abs() + margin {
            assert_eq!(hits.count(), 2, "{other:?}");
            for p in hits.points() {
                assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-9);
                assert_abs_diff_eq!((p - other.center).norm(), r, epsilon = 1e-9);
            }
        } else if d > r + 1.0 + margin || d < (1.0 - r).abs() - margin {
            assert_eq!(hits.count(), 0, "{other:?}");
        }

        let area = overlap_area(&earth, &other);
        let reversed = overlap_area(&other, &earth);
        assert!(area >= 0.0);
        assert!(area <= std::f64::consts::PI * r.min(1.0).powi(2) + 1e-12);
        assert_abs_diff_eq!(area, reversed, epsilon = 1e-12);
    }
}

#[test]
fn test_tangent_circles() {
    let hits = intersect(&Circle::unit(), &Circle::new(1.5, 0.0, 0.5));
    assert_eq!(hits.count(), 1);
    let p = hits.points()[0];
    assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
}

#[test]
fn test_curve_from_two_branches() {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    for _ in 0..20 {
        let mid: i32 = rng.random_range(-40..40);
        let half_width: i32 = rng.random_range(5..60);
        let mut point = |lon: i32| {
            GeographicCoordinate::new(30.0 + rng.random_range(-0.1..0.1), lon as f64 * 0.5)
        };

        // Points arrive pairwise from both sides of the starting point
        let mut stream = vec![point(mid)];
        for i in 1..=half_width {
            stream.push(point(mid - i));
            stream.push(point(mid + i));
        }
        let curve: Curve = stream.into_iter().collect();

        assert_eq!(curve.len(), 2 * half_width as usize + 1);
        assert!(curve.max_gap() < 1.0);

        let lons: Vec<f64> = curve.points().map(|p| p.longitude).collect();
        let increasing = lons.windows(2).all(|w| w[0] < w[1]);
        let decreasing = lons.windows(2).all(|w| w[0] > w[1]);
        assert!(increasing || decreasing);
    }
}

#[test]
fn test_cubic_fit_is_exact() {
    let mut rng = StdRng::seed_from_u64(42);
    let ts = [-2.0, -1.0, 0.0, 1.0, 2.0];

    for _ in 0..100 {
        let coeffs: Vec<f64> = (0..4).map(|_| rng.random_range(-10.0..10.0)).collect();
        let values: Vec<f64> = ts.iter().map(|&t| polynomial_value(&coeffs, t)).collect();

        let fitted = least_squares_fit(&ts, &values, 3).unwrap();
        for (a, b) in fitted.iter().zip(&coeffs) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }
}
