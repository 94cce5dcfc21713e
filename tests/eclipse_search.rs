use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use umbra::search::lunar::{find_nearest_lunar_eclipse, LunarEclipseType};
use umbra::search::saros::{lunar_saros, solar_saros};
use umbra::search::solar::{find_nearest_solar_eclipse, Centrality, SolarEclipseType};
use umbra::search::SearchDirection;
use umbra::time::julian_day;

/// Expected step of the saros number between two eclipses `dk` lunations apart.
fn saros_step(dk: i64) -> i64 {
    (38 * dk).rem_euclid(223)
}

#[test]
fn test_solar_eclipse_sequence() {
    let mut jd = julian_day(2017, 8, 1.0).unwrap();
    let mut previous = None;

    for _ in 0..24 {
        let eclipse = find_nearest_solar_eclipse(jd, SearchDirection::Forward).unwrap();
        assert!(eclipse.jd_maximum >= jd);
        assert!(eclipse.gamma.abs() < 1.5433 + eclipse.u);
        assert_eq!(eclipse.saros, solar_saros(eclipse.lunation));

        if let Some((k, saros)) = previous {
            let dk = eclipse.lunation - k;
            assert!((1..=6).contains(&dk), "gap of {dk} lunations");
            assert_eq!(
                (eclipse.saros as i64 - saros as i64).rem_euclid(223),
                saros_step(dk)
            );
        }
        previous = Some((eclipse.lunation, eclipse.saros));
        jd = eclipse.jd_maximum + 1.0;
    }
}

#[test]
fn test_saros_recurrence() {
    let first = find_nearest_solar_eclipse(julian_day(2017, 8, 1.0).unwrap(), SearchDirection::Forward)
        .unwrap();
    let next = find_nearest_solar_eclipse(first.jd_maximum + 6580.0, SearchDirection::Forward).unwrap();

    // 2035 September 2, greatest eclipse near 01:56 TT
    assert_eq!(next.lunation, first.lunation + 223);
    assert_eq!(next.saros, 145);
    assert_eq!(next.eclipse_type, SolarEclipseType::Total);
    assert_eq!(next.centrality, Centrality::Central);
    assert_abs_diff_eq!(next.jd_maximum, 2464572.58, epsilon = 0.01);
    assert_abs_diff_eq!(next.gamma, 0.3727, epsilon = 5e-3);
}

#[test]
fn test_known_solar_eclipses() {
    let april_2024 =
        find_nearest_solar_eclipse(julian_day(2024, 3, 1.0).unwrap(), SearchDirection::Forward)
            .unwrap();
    assert_eq!(april_2024.saros, 139);
    assert_eq!(april_2024.eclipse_type, SolarEclipseType::Total);

    let july_2019 =
        find_nearest_solar_eclipse(julian_day(2019, 7, 10.0).unwrap(), SearchDirection::Backward)
            .unwrap();
    assert_eq!(july_2019.saros, 127);

    let june_2021 =
        find_nearest_solar_eclipse(julian_day(2021, 6, 1.0).unwrap(), SearchDirection::Forward)
            .unwrap();
    assert_eq!(june_2021.saros, 147);
    assert_eq!(june_2021.eclipse_type, SolarEclipseType::Annular);
}

#[test]
fn test_lunar_eclipse_sequence() {
    let mut jd = julian_day(2000, 1, 1.0).unwrap();
    let mut previous = None;

    for _ in 0..24 {
        let eclipse = find_nearest_lunar_eclipse(jd, SearchDirection::Forward).unwrap();
        assert!(eclipse.jd_maximum >= jd);
        assert!(eclipse.penumbral_magnitude > 0.0);
        assert_eq!(eclipse.saros, lunar_saros(eclipse.lunation));
        if eclipse.eclipse_type == LunarEclipseType::Total {
            assert!(eclipse.umbral_magnitude >= 1.0);
        }

        if let Some((k, saros)) = previous {
            let dk = eclipse.lunation - k;
            assert!((1..=6).contains(&dk), "gap of {dk} lunations");
            assert_eq!(
                (eclipse.saros as i64 - saros as i64).rem_euclid(223),
                saros_step(dk)
            );
        }
        previous = Some((eclipse.lunation, eclipse.saros));
        jd = eclipse.jd_maximum + 1.0;
    }
}

#[test]
fn test_random_starts_bracket_eclipses() {
    let mut rng = StdRng::seed_from_u64(42);
    let start = julian_day(1950, 1, 1.0).unwrap();
    let end = julian_day(2050, 1, 1.0).unwrap();

    for _ in 0..50 {
        let jd = rng.random_range(start..end);

        let forward = find_nearest_solar_eclipse(jd, SearchDirection::Forward).unwrap();
        let backward = find_nearest_solar_eclipse(jd, SearchDirection::Backward).unwrap();
        assert!(forward.jd_maximum >= jd);
        assert!(backward.jd_maximum <= jd);
        // At least two solar eclipses per year
        assert!(forward.jd_maximum - backward.jd_maximum < 200.0);

        // Searching again from the found maximum returns the same eclipse
        let again = find_nearest_solar_eclipse(forward.jd_maximum, SearchDirection::Backward).unwrap();
        assert_eq!(again.lunation, forward.lunation);

        let lunar = find_nearest_lunar_eclipse(jd, SearchDirection::Forward).unwrap();
        assert!(lunar.jd_maximum >= jd);
        assert!(lunar.jd_maximum - jd < 200.0);
    }
}
