use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ttr_engine::city::City;
use ttr_engine::map::RouteGraph;
use ttr_engine::player_graph::PlayerGraph;
use ttr_engine::train_color::RouteColor;

/// Every route of the US map touching one of the given cities, which makes for a dense,
/// cycle-heavy graph.
fn player_graph(cities: &[&str]) -> PlayerGraph {
    let map = RouteGraph::us_map().unwrap();
    let cities: Vec<City> = cities.iter().map(City::new).collect();
    let mut player_graph = PlayerGraph::new();

    for info in map.routes() {
        let (start, end) = &info.route;
        if cities.contains(start) || cities.contains(end) {
            player_graph.add_route(start, end, info.length, RouteColor::Grey);
        }
    }

    player_graph
}

fn bench_longest_route(c: &mut Criterion) {
    let small = player_graph(&["Denver", "Kansas City"]);
    let large = player_graph(&["Denver", "Kansas City", "Chicago", "Nashville"]);

    c.bench_function("longest route (2 hubs)", |b| {
        b.iter(|| black_box(&small).longest_route())
    });

    c.bench_function("longest route (4 hubs)", |b| {
        b.iter(|| black_box(&large).longest_route())
    });

    let denver = City::new("Denver");
    c.bench_function("longest path from Denver (4 hubs)", |b| {
        b.iter(|| black_box(&large).longest_path(&denver))
    });
}

criterion_group!(benches, bench_longest_route);
criterion_main!(benches);
