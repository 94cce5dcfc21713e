use criterion::{black_box, criterion_group, criterion_main, Criterion};

use umbra::coordinates::GeographicCoordinate;
use umbra::ephemeris::LowPrecisionEphemeris;
use umbra::local_circumstances::solar::solar_local_circumstances;
use umbra::map::{build_eclipse_map, build_eclipse_map_with, MapParams};
use umbra::polynomial_elements::PolynomialBesselianElements;
use umbra::search::SearchParams;

/// Elements of the total solar eclipse of 2017 August 21.
fn elements_2017() -> PolynomialBesselianElements {
    PolynomialBesselianElements::from_ephemeris(&LowPrecisionEphemeris, 2457987.25, 2.0 / 24.0, 68.4)
        .unwrap()
}

fn bench_map(c: &mut Criterion) {
    let elements = elements_2017();
    let fine = MapParams::builder().time_step_minutes(0.5).build().unwrap();

    let mut group = c.benchmark_group("build_eclipse_map");
    group.sample_size(20);
    group.bench_function("2min_step", |b| {
        b.iter(|| black_box(build_eclipse_map(black_box(&elements)).unwrap()))
    });
    group.bench_function("30s_step", |b| {
        b.iter(|| black_box(build_eclipse_map_with(black_box(&elements), &fine).unwrap()))
    });
    group.finish();
}

fn bench_local_circumstances(c: &mut Criterion) {
    let elements = elements_2017();
    let params = SearchParams::default();
    let place = GeographicCoordinate::new(37.7267, -89.2167).with_elevation(120.0);

    c.bench_function("solar_local_circumstances/carbondale", |b| {
        b.iter(|| {
            black_box(solar_local_circumstances(&elements, black_box(&place), &params).unwrap())
        })
    });
}

criterion_group!(benches, bench_map, bench_local_circumstances);
criterion_main!(benches);
