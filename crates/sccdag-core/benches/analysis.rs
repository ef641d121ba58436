use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sccdag_core::config::AnalysisConfig;
use sccdag_core::graph::{CondensationBuilder, DiGraph, Kosaraju};
use sccdag_core::paths::DagPathSolver;
use sccdag_core::pipeline::analyze;
use sccdag_core::topo::{DfsSort, KahnSort, TopologicalSorter};

struct Tier {
    name: &'static str,
    vertices: usize,
    edges_per_vertex: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        vertices: 100,
        edges_per_vertex: 3,
    },
    Tier {
        name: "medium",
        vertices: 2_000,
        edges_per_vertex: 4,
    },
    Tier {
        name: "large",
        vertices: 20_000,
        edges_per_vertex: 4,
    },
];

/// Random graph; roughly one edge in `back_ratio` points backwards.
fn random_graph(tier: &Tier, seed: u64, back_ratio: u32) -> DiGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = tier.vertices;
    let mut g = DiGraph::new(n).expect("positive vertex count");
    for _ in 0..n * tier.edges_per_vertex {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b {
            continue;
        }
        let weight = rng.gen_range(1..50);
        let backwards = back_ratio > 0 && rng.gen_ratio(1, back_ratio);
        let (from, to) = if backwards { (a.max(b), a.min(b)) } else { (a.min(b), a.max(b)) };
        g.add_edge(from, to, weight).expect("edge in range");
    }
    g
}

fn bench_scc(c: &mut Criterion) {
    let mut group = c.benchmark_group("scc");
    for tier in &TIERS {
        let g = random_graph(tier, 0x5CC0 + tier.vertices as u64, 10);
        group.throughput(Throughput::Elements((g.vertex_count() + g.edge_count()) as u64));

        group.bench_with_input(BenchmarkId::new("kosaraju", tier.name), &g, |b, g| {
            b.iter(|| {
                let mut scc = Kosaraju::new(g);
                black_box(scc.find_sccs().component_count())
            });
        });

        group.bench_with_input(BenchmarkId::new("condense", tier.name), &g, |b, g| {
            let mut scc = Kosaraju::new(g);
            let partition = scc.find_sccs().clone();
            b.iter(|| {
                let mut builder = CondensationBuilder::new(g, &partition).expect("partition");
                black_box(builder.build().expect("build").edge_count())
            });
        });
    }
    group.finish();
}

fn bench_dag(c: &mut Criterion) {
    let mut group = c.benchmark_group("dag");
    for tier in &TIERS {
        let g = random_graph(tier, 0xDA60 + tier.vertices as u64, 0);
        group.throughput(Throughput::Elements((g.vertex_count() + g.edge_count()) as u64));

        group.bench_with_input(BenchmarkId::new("kahn", tier.name), &g, |b, g| {
            b.iter(|| black_box(KahnSort::new(g).sort().len()));
        });
        group.bench_with_input(BenchmarkId::new("dfs", tier.name), &g, |b, g| {
            b.iter(|| black_box(DfsSort::new(g).sort().len()));
        });
        group.bench_with_input(BenchmarkId::new("shortest", tier.name), &g, |b, g| {
            b.iter(|| {
                let mut solver = DagPathSolver::new(g);
                black_box(solver.compute_shortest_paths(0).expect("source in range"))
            });
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let config = AnalysisConfig {
        paths: sccdag_core::config::PathsConfig {
            critical_path: false,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut group = c.benchmark_group("pipeline");
    for tier in &TIERS {
        let g = random_graph(tier, 0xA11 + tier.vertices as u64, 20);
        group.bench_with_input(BenchmarkId::new("analyze", tier.name), &g, |b, g| {
            b.iter(|| black_box(analyze(tier.name, g, &config).expect("analyze")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scc, bench_dag, bench_pipeline);
criterion_main!(benches);
