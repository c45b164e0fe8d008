use criterion::{black_box, criterion_group, criterion_main, Criterion};
use route_map::import::{build_directions, parse_route_csv};
use route_map::models::{GraphBuild, RouteGraph, RouteMapSettings, RowTokens};
use route_map::{ClickModifiers, RouteMapState};
use std::fmt::Write;

/// Routes between a ring of airports spread around the globe, so a share
/// of them crosses the antimeridian
fn generate_routes(airports: usize, routes: usize) -> String {
    let mut csv = String::from("market,from,to,from_lat,from_lng,to_lat,to_lng,thickness\n");
    #[allow(clippy::cast_precision_loss)]
    let position = |i: usize| {
        let lat = -60.0 + (i * 37 % 120) as f64;
        let lng = -180.0 + (i * 360 / airports) as f64 + 0.5;
        (lat, lng)
    };

    for route in 0..routes {
        let from = route % airports;
        let to = (route * 7 + 3) % airports;
        if from == to {
            continue;
        }
        let (from_lat, from_lng) = position(from);
        let (to_lat, to_lng) = position(to);
        let _ = writeln!(
            csv,
            "R{route},AP{from},AP{to},{from_lat},{from_lng},{to_lat},{to_lng},{}",
            route % 50
        );
    }
    csv
}

fn benchmark_route_map(c: &mut Criterion) {
    let csv = generate_routes(200, 2000);
    let table = parse_route_csv(&csv).unwrap_or_default();
    let settings = RouteMapSettings::default();
    let directions = build_directions(&table);

    c.bench_function("build_directions", |b| {
        b.iter(|| build_directions(black_box(&table)));
    });

    c.bench_function("graph_from_directions", |b| {
        b.iter(|| RouteGraph::from_directions(black_box(&directions), black_box(&settings), &RowTokens));
    });

    // What happens on every data update from the host
    c.bench_function("full_update", |b| {
        b.iter(|| {
            let mut state = RouteMapState::new();
            state.update(black_box(&table), black_box(&settings));
            state.arc_descriptors()
        });
    });

    let mut state = RouteMapState::new();
    state.update(&table, &settings);
    c.bench_function("marker_select_commit", |b| {
        b.iter(|| {
            let mut state = state.clone();
            let request = state.marker_clicked(black_box("AP0"), ClickModifiers::empty());
            request.map(|request| state.commit(&request))
        });
    });
}

criterion_group!(benches, benchmark_route_map);
criterion_main!(benches);
