//! Endpoint matching benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use netshape_bench::{chain_features, jitter, point_features, random_positions};
use netshape_core::{match_coordinate, CoordinateIndex, MatchPolicy, Network, NodeId, NodeMode, Reconciler};

fn index_of(positions: &[netshape_core::Position]) -> CoordinateIndex {
    let mut index = CoordinateIndex::new();
    for (i, [x, y]) in positions.iter().enumerate() {
        index.insert(NodeId::new(-(i as i64) - 1), *x, *y);
    }
    index
}

/// Benchmark exact and rounded lookups.
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinate_lookup");
    let policy = MatchPolicy::default();

    for count in [100, 1_000, 10_000].iter() {
        let positions = random_positions(*count, 10_000.0);
        let noisy: Vec<_> = positions.iter().map(|&p| jitter(p, 6)).collect();
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("exact", count), &positions, |b, positions| {
            let mut index = index_of(positions);
            b.iter(|| {
                for [x, y] in positions {
                    black_box(match_coordinate(&mut index, *x, *y, &policy));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("rounded", count), &noisy, |b, noisy| {
            let mut index = index_of(&positions);
            b.iter(|| {
                for [x, y] in noisy {
                    black_box(match_coordinate(&mut index, *x, *y, &policy));
                }
            });
        });
    }
    group.finish();
}

/// Benchmark reconciling a link chain in both node modes.
fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_links");

    for count in [100, 1_000].iter() {
        let positions = random_positions(*count + 1, 10_000.0);
        let nodes = point_features(&positions);
        let links = chain_features(&positions);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("create", count), &links, |b, links| {
            b.iter(|| {
                let mut network = Network::new("bench");
                let mut reconciler = Reconciler::new(&mut network, NodeMode::Create);
                for feature in links {
                    // random positions may repeat, which only shortens a chain
                    let _ = black_box(reconciler.add_link_feature(feature));
                }
                black_box(network.node_count());
            });
        });

        group.bench_with_input(BenchmarkId::new("match", count), &links, |b, links| {
            b.iter(|| {
                let mut network = Network::new("bench");
                let mut reconciler = Reconciler::new(&mut network, NodeMode::Match(MatchPolicy::default()));
                for feature in &nodes {
                    reconciler.add_node_feature(feature).unwrap();
                }
                for feature in links {
                    let _ = black_box(reconciler.add_link_feature(feature));
                }
                black_box(network.link_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_reconcile);
criterion_main!(benches);
