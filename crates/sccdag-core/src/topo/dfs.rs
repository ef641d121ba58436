//! Topological order as the reverse of DFS finishing order.
//!
//! Roots are tried in increasing index order and edges in insertion order.
//! A vertex is pushed onto the finish stack once all its successors are done;
//! popping that stack yields the order. An edge into a vertex that is still
//! on the current DFS path is a back edge, and the sort stops there with an
//! empty order.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::graph::DiGraph;
use crate::metrics::Metrics;
use crate::topo::{NOT_SORTED, SortOutcome, TopologicalSorter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// DFS-based topological sorter.
#[derive(Debug)]
pub struct DfsSort<'g> {
    graph: &'g DiGraph,
    metrics: Metrics,
    outcome: Option<SortOutcome>,
}

impl<'g> DfsSort<'g> {
    #[must_use]
    pub fn new(graph: &'g DiGraph) -> Self {
        Self {
            graph,
            metrics: Metrics::new(),
            outcome: None,
        }
    }

    fn run(&mut self) -> SortOutcome {
        let graph = self.graph;
        let n = graph.vertex_count();
        let mut marks = vec![Mark::Unvisited; n];
        let mut finished: Vec<usize> = Vec::with_capacity(n);

        for root in graph.vertices() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            if let Err((from, to)) = self.visit(root, &mut marks, &mut finished) {
                self.metrics.increment("back_edges_found");
                self.metrics.increment("cycle_detected");
                debug!(from, to, "dfs sort: back edge, graph is cyclic");
                return SortOutcome::cyclic();
            }
        }

        let mut order = Vec::with_capacity(n);
        while let Some(vertex) = finished.pop() {
            self.metrics.increment("stack_pops");
            order.push(vertex);
        }
        SortOutcome::acyclic(order)
    }

    /// Walk everything reachable from `root`. Returns the offending edge on
    /// the first back edge.
    fn visit(
        &mut self,
        root: usize,
        marks: &mut [Mark],
        finished: &mut Vec<usize>,
    ) -> std::result::Result<(), (usize, usize)> {
        let graph = self.graph;
        marks[root] = Mark::OnPath;
        self.metrics.increment("dfs_visits");
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (vertex, next) = *frame;
            let Some(edge) = graph.out_edges(vertex).get(next) else {
                marks[vertex] = Mark::Done;
                stack.pop();
                finished.push(vertex);
                self.metrics.increment("stack_pushes");
                continue;
            };
            frame.1 += 1;
            self.metrics.increment("edge_explorations");

            match marks[edge.to] {
                Mark::OnPath => return Err((vertex, edge.to)),
                Mark::Unvisited => {
                    marks[edge.to] = Mark::OnPath;
                    self.metrics.increment("dfs_visits");
                    stack.push((edge.to, 0));
                }
                Mark::Done => {}
            }
        }

        Ok(())
    }
}

impl TopologicalSorter for DfsSort<'_> {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn graph(&self) -> &DiGraph {
        self.graph
    }

    #[instrument(skip(self), fields(vertices = self.graph.vertex_count()))]
    fn sort(&mut self) -> &[usize] {
        self.metrics.reset();
        self.metrics.start_timer();
        let outcome = self.run();
        self.metrics.stop_timer();
        &self.outcome.insert(outcome).order
    }

    fn outcome(&self) -> Result<&SortOutcome> {
        self.outcome.as_ref().ok_or(NOT_SORTED)
    }

    fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
