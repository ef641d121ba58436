#![no_main]

use libfuzzer_sys::fuzz_target;
use sccdag_core::load::{parse_graph, to_json_string};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = parse_graph(text) else {
        return;
    };

    // Anything that parses must serialize and parse back to the same shape.
    let json = to_json_string(&graph).expect("serialize parsed graph");
    let again = parse_graph(&json).expect("reparse serialized graph");
    assert_eq!(again.vertex_count(), graph.vertex_count());
    assert_eq!(again.edge_count(), graph.edge_count());
});
