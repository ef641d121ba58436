//! Strongly connected components via Kosaraju's two-pass DFS.
//!
//! # Algorithm
//!
//! 1. DFS from every unvisited vertex in increasing index order, recording
//!    each vertex when its DFS call finishes (post-order).
//! 2. Build the transpose graph.
//! 3. Take vertices in reverse finishing order; each one not yet visited
//!    starts a DFS on the transpose, and everything it reaches is one SCC.
//!
//! Component ids follow the order in which pass 3 discovers components. The
//! numbering is stable for a given graph but carries no further meaning.
//!
//! Both passes walk an explicit stack of `(vertex, next_edge)` frames, so
//! traversal depth is bounded by heap memory instead of the call stack.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::store::DiGraph;
use crate::metrics::Metrics;

// ---------------------------------------------------------------------------
// ComponentPartition
// ---------------------------------------------------------------------------

/// A partition of all vertices into strongly connected components.
///
/// Every vertex belongs to exactly one component. Members are listed in the
/// order the second DFS pass reached them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPartition {
    components: Vec<Vec<usize>>,
    component_of: Vec<usize>,
    cyclic: Vec<bool>,
}

impl ComponentPartition {
    /// All components, indexed by component id.
    #[must_use]
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Number of vertices covered by the partition.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.component_of.len()
    }

    /// Component id of `vertex`, or `None` when out of range.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.component_of.get(vertex).copied()
    }

    /// Members of component `id`, or `None` when out of range.
    #[must_use]
    pub fn members(&self, id: usize) -> Option<&[usize]> {
        self.components.get(id).map(Vec::as_slice)
    }

    /// Size of every component, indexed by component id.
    #[must_use]
    pub fn component_sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }

    /// Return `true` if `a` and `b` are mutually reachable.
    ///
    /// `false` when either vertex is out of range.
    #[must_use]
    pub fn same_component(&self, a: usize, b: usize) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// Return `true` if component `id` contains a cycle: more than one
    /// member, or a single member with a self-loop.
    #[must_use]
    pub fn is_cyclic(&self, id: usize) -> bool {
        self.cyclic.get(id).copied().unwrap_or(false)
    }

    /// Ids of every cyclic component, ascending.
    pub fn cyclic_components(&self) -> impl Iterator<Item = usize> + '_ {
        self.cyclic
            .iter()
            .enumerate()
            .filter_map(|(id, &cyclic)| cyclic.then_some(id))
    }
}

// ---------------------------------------------------------------------------
// Kosaraju
// ---------------------------------------------------------------------------

/// Kosaraju SCC finder bound to one graph.
///
/// Call [`Kosaraju::find_sccs`] once; the partition is cached until the next
/// call. Query methods that need the partition fail with
/// [`GraphError::IllegalState`] before that.
#[derive(Debug)]
pub struct Kosaraju<'g> {
    graph: &'g DiGraph,
    metrics: Metrics,
    partition: Option<ComponentPartition>,
}

impl<'g> Kosaraju<'g> {
    /// Create a finder for `graph`. No work happens until
    /// [`Kosaraju::find_sccs`].
    #[must_use]
    pub fn new(graph: &'g DiGraph) -> Self {
        Self {
            graph,
            metrics: Metrics::new(),
            partition: None,
        }
    }

    /// Compute (or recompute) the SCC partition.
    #[instrument(skip(self), fields(vertices = self.graph.vertex_count()))]
    pub fn find_sccs(&mut self) -> &ComponentPartition {
        self.metrics.reset();
        self.metrics.start_timer();

        let n = self.graph.vertex_count();
        let mut visited = vec![false; n];
        let mut finish_order: Vec<usize> = Vec::with_capacity(n);

        // Pass 1: post-order finishing times on the original graph.
        for start in self.graph.vertices() {
            if !visited[start] {
                self.finish_order_from(start, &mut visited, &mut finish_order);
            }
        }

        // Pass 2: transpose, then harvest components in reverse finish order.
        let transpose = self.graph.reverse();
        self.metrics.increment("graph_reversals");

        visited.fill(false);
        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut component_of = vec![0usize; n];

        while let Some(root) = finish_order.pop() {
            if visited[root] {
                continue;
            }
            let id = components.len();
            let component = self.collect_component(&transpose, root, &mut visited);
            for &vertex in &component {
                component_of[vertex] = id;
            }
            components.push(component);
        }

        let cyclic = components
            .iter()
            .map(|members| match members.as_slice() {
                [only] => self.graph.out_edges(*only).iter().any(|e| e.to == *only),
                _ => true,
            })
            .collect();

        self.metrics.stop_timer();
        debug!(
            components = components.len(),
            dfs_visits = self.metrics.counter("dfs_visits"),
            "kosaraju finished"
        );

        self.partition.insert(ComponentPartition {
            components,
            component_of,
            cyclic,
        })
    }

    /// The cached partition.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`Kosaraju::find_sccs`] ran.
    pub fn partition(&self) -> Result<&ComponentPartition> {
        self.partition
            .as_ref()
            .ok_or(GraphError::IllegalState("SCCs have not been computed"))
    }

    /// All components, indexed by id.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`Kosaraju::find_sccs`] ran.
    pub fn components(&self) -> Result<&[Vec<usize>]> {
        self.partition().map(ComponentPartition::components)
    }

    /// Number of components.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`Kosaraju::find_sccs`] ran.
    pub fn component_count(&self) -> Result<usize> {
        self.partition().map(ComponentPartition::component_count)
    }

    /// Size of each component.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`Kosaraju::find_sccs`] ran.
    pub fn component_sizes(&self) -> Result<Vec<usize>> {
        self.partition().map(ComponentPartition::component_sizes)
    }

    /// Component id of `vertex`; `None` if not computed yet or out of range.
    #[must_use]
    pub fn component_of(&self, vertex: usize) -> Option<usize> {
        self.partition.as_ref()?.component_of(vertex)
    }

    /// Return `true` if `a` and `b` share a component. `false` when the
    /// partition is missing or either vertex is out of range.
    #[must_use]
    pub fn same_component(&self, a: usize, b: usize) -> bool {
        self.partition
            .as_ref()
            .is_some_and(|p| p.same_component(a, b))
    }

    /// Counters and timing of the last run.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// The graph this finder analyses.
    #[must_use]
    pub fn graph(&self) -> &'g DiGraph {
        self.graph
    }

    fn finish_order_from(&mut self, start: usize, visited: &mut [bool], order: &mut Vec<usize>) {
        let graph = self.graph;
        visited[start] = true;
        self.metrics.increment("dfs_visits");
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(frame) = stack.last_mut() {
            let (vertex, next) = *frame;
            if let Some(edge) = graph.out_edges(vertex).get(next) {
                frame.1 += 1;
                self.metrics.increment("edge_explorations");
                if !visited[edge.to] {
                    visited[edge.to] = true;
                    self.metrics.increment("dfs_visits");
                    stack.push((edge.to, 0));
                }
            } else {
                stack.pop();
                order.push(vertex);
                self.metrics.increment("stack_pushes");
            }
        }
    }

    fn collect_component(
        &mut self,
        transpose: &DiGraph,
        root: usize,
        visited: &mut [bool],
    ) -> Vec<usize> {
        visited[root] = true;
        self.metrics.increment("dfs_visits");
        let mut component = vec![root];
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (vertex, next) = *frame;
            if let Some(edge) = transpose.out_edges(vertex).get(next) {
                frame.1 += 1;
                self.metrics.increment("edge_explorations");
                if !visited[edge.to] {
                    visited[edge.to] = true;
                    self.metrics.increment("dfs_visits");
                    component.push(edge.to);
                    stack.push((edge.to, 0));
                }
            } else {
                stack.pop();
            }
        }

        component
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
