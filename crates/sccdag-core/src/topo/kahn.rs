//! Kahn's algorithm: repeatedly remove a vertex with in-degree zero.
//!
//! Initial zero-in-degree vertices are queued in increasing index order;
//! vertices whose in-degree drops to zero are queued in the order their last
//! incoming edge is removed. If fewer than `V` vertices come out of the queue
//! the rest sit on, or behind, a cycle.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::error::Result;
use crate::graph::DiGraph;
use crate::metrics::Metrics;
use crate::topo::{NOT_SORTED, SortOutcome, TopologicalSorter};

/// Queue-based topological sorter.
#[derive(Debug)]
pub struct KahnSort<'g> {
    graph: &'g DiGraph,
    metrics: Metrics,
    outcome: Option<SortOutcome>,
}

impl<'g> KahnSort<'g> {
    #[must_use]
    pub fn new(graph: &'g DiGraph) -> Self {
        Self {
            graph,
            metrics: Metrics::new(),
            outcome: None,
        }
    }

    fn in_degrees(&mut self) -> Vec<usize> {
        let mut in_degree = vec![0usize; self.graph.vertex_count()];
        for (_, edge) in self.graph.edges() {
            in_degree[edge.to] += 1;
            self.metrics.increment("in_degree_calculations");
        }
        in_degree
    }

    fn run(&mut self) -> SortOutcome {
        let graph = self.graph;
        let n = graph.vertex_count();
        let mut in_degree = self.in_degrees();

        let mut queue: VecDeque<usize> = VecDeque::new();
        for vertex in graph.vertices().filter(|&v| in_degree[v] == 0) {
            queue.push_back(vertex);
            self.metrics.increment("queue_adds");
        }

        let mut order = Vec::with_capacity(n);
        while let Some(vertex) = queue.pop_front() {
            self.metrics.increment("queue_removals");
            order.push(vertex);
            self.metrics.increment("vertices_processed");

            for edge in graph.out_edges(vertex) {
                in_degree[edge.to] -= 1;
                self.metrics.increment("in_degree_updates");
                if in_degree[edge.to] == 0 {
                    queue.push_back(edge.to);
                    self.metrics.increment("queue_adds");
                }
            }
        }

        if order.len() == n {
            SortOutcome::acyclic(order)
        } else {
            self.metrics.increment("cycle_detected");
            debug!(
                processed = order.len(),
                vertices = n,
                "kahn: vertices left with positive in-degree"
            );
            SortOutcome::cyclic()
        }
    }
}

impl TopologicalSorter for KahnSort<'_> {
    fn name(&self) -> &'static str {
        "kahn"
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
