//! Cycle detection by DFS back-edge search.
//!
//! A directed graph has a cycle iff a DFS meets an edge into a vertex that is
//! still on the current DFS path. [`find_cycle`] returns that cycle as a
//! concrete vertex sequence so reports can show *why* a graph is not a DAG.

use tracing::trace;

use crate::graph::store::DiGraph;

/// Return one cycle in `graph`, or `None` if the graph is acyclic.
///
/// The cycle is returned closed: `[v0, v1, ..., vk, v0]`. A self-loop on `v`
/// yields `[v, v]`. Roots are tried in increasing index order and edges in
/// insertion order, so the witness is deterministic.
#[must_use]
pub fn find_cycle(graph: &DiGraph) -> Option<Vec<usize>> {
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut on_path = vec![false; n];

    for root in graph.vertices() {
        if visited[root] {
            continue;
        }

        visited[root] = true;
        on_path[root] = true;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (vertex, next) = *frame;
            let Some(edge) = graph.out_edges(vertex).get(next) else {
                on_path[vertex] = false;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            if on_path[edge.to] {
                trace!(from = vertex, to = edge.to, "back edge");
                return Some(close_cycle(&stack, edge.to));
            }
            if !visited[edge.to] {
                visited[edge.to] = true;
                on_path[edge.to] = true;
                stack.push((edge.to, 0));
            }
        }
    }

    None
}

/// Return `true` if `graph` contains at least one directed cycle.
#[must_use]
pub fn has_cycle(graph: &DiGraph) -> bool {
    find_cycle(graph).is_some()
}

fn close_cycle(stack: &[(usize, usize)], target: usize) -> Vec<usize> {
    let start = stack
        .iter()
        .position(|&(vertex, _)| vertex == target)
        .unwrap_or(0);
    let mut cycle: Vec<usize> = stack[start..].iter().map(|&(vertex, _)| vertex).collect();
    cycle.push(target);
    cycle
}
