#![no_main]

use libfuzzer_sys::fuzz_target;
use sccdag_core::config::AnalysisConfig;
use sccdag_core::graph::DiGraph;
use sccdag_core::pipeline::analyze;

const MAX_VERTICES: usize = 64;

// Bytes are read as (from, to, weight) triples over a small vertex set.
fuzz_target!(|data: &[u8]| {
    let Some((&n, rest)) = data.split_first() else {
        return;
    };
    let n = usize::from(n) % MAX_VERTICES;
    let Ok(mut graph) = DiGraph::new(n) else {
        return;
    };
    for chunk in rest.chunks_exact(3) {
        let from = usize::from(chunk[0]) % n;
        let to = usize::from(chunk[1]) % n;
        let weight = i64::from(chunk[2] as i8);
        graph.add_edge(from, to, weight).expect("indices are in range");
    }

    let report = analyze("fuzz", &graph, &AnalysisConfig::default()).expect("analysis succeeds");
    let covered: usize = report.components.iter().map(|c| c.size).sum();
    assert_eq!(covered, n);
    assert!(report.condensation.stats.is_acyclic);
    for sort in &report.sorts {
        assert!(!sort.is_dag || sort.verified);
    }
});
