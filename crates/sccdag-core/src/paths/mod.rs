//! Single-source shortest and longest paths on a DAG.
//!
//! # Overview
//!
//! On an acyclic graph both problems reduce to one relaxation sweep in
//! topological order: by the time a vertex is taken, every path into it has
//! already been relaxed, so its distance is final. Negative weights are
//! fine. The same sweep with the comparison flipped yields longest paths,
//! which is what [`DagPathSolver::find_critical_path`] builds on.
//!
//! Distances are `Option<i64>`: `None` means the vertex is unreachable from
//! the source. Additions saturate at `i64::MIN`/`i64::MAX`.
//!
//! The solver sorts its graph once with [`DfsSort`] and reuses that order
//! for every later computation. A cyclic graph makes every computation
//! report `false`.

#![allow(clippy::module_name_repetitions)]

use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::DiGraph;
use crate::metrics::Metrics;
use crate::topo::{DfsSort, TopologicalSorter};

pub mod critical_path;

pub use critical_path::CriticalPath;

/// Which optimum the solver computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathMode {
    Shortest,
    Longest,
}

impl PathMode {
    /// Return `true` if `candidate` beats `current` under this mode.
    #[must_use]
    pub const fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }
}

impl fmt::Display for PathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shortest => "shortest",
            Self::Longest => "longest",
        })
    }
}

#[derive(Debug, Clone)]
struct PathState {
    source: usize,
    mode: PathMode,
    distance: Vec<Option<i64>>,
    predecessor: Vec<Option<usize>>,
}

const NOT_COMPUTED: GraphError = GraphError::IllegalState("paths have not been computed");

/// Path solver bound to one graph.
///
/// Compute with [`DagPathSolver::compute_shortest_paths`] or
/// [`DagPathSolver::compute_longest_paths`], then query. Queries fail with
/// [`GraphError::IllegalState`] when no successful computation is current.
#[derive(Debug)]
pub struct DagPathSolver<'g> {
    graph: &'g DiGraph,
    sorter: DfsSort<'g>,
    metrics: Metrics,
    state: Option<PathState>,
}

impl<'g> DagPathSolver<'g> {
    #[must_use]
    pub fn new(graph: &'g DiGraph) -> Self {
        Self {
            graph,
            sorter: DfsSort::new(graph),
            metrics: Metrics::new(),
            state: None,
        }
    }

    /// Shortest distances from `source`.
    ///
    /// Returns `Ok(false)` and clears any previous result when the graph is
    /// cyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::OutOfRange`] if `source` is not a vertex.
    pub fn compute_shortest_paths(&mut self, source: usize) -> Result<bool> {
        self.compute(source, PathMode::Shortest)
    }

    /// Longest distances from `source`.
    ///
    /// Returns `Ok(false)` and clears any previous result when the graph is
    /// cyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::OutOfRange`] if `source` is not a vertex.
    pub fn compute_longest_paths(&mut self, source: usize) -> Result<bool> {
        self.compute(source, PathMode::Longest)
    }

    #[instrument(skip(self), fields(vertices = self.graph.vertex_count()))]
    fn compute(&mut self, source: usize, mode: PathMode) -> Result<bool> {
        self.graph.check_vertex(source)?;

        self.metrics.reset();
        self.metrics.start_timer();
        if self.sorter.outcome().is_err() {
            self.sorter.sort();
        }
        let graph = self.graph;
        let outcome = self.sorter.outcome()?;

        if !outcome.is_dag {
            self.state = None;
            self.metrics.stop_timer();
            debug!(source, %mode, "graph is cyclic, no paths computed");
            return Ok(false);
        }

        let n = graph.vertex_count();
        let mut distance: Vec<Option<i64>> = vec![None; n];
        let mut predecessor: Vec<Option<usize>> = vec![None; n];
        self.metrics
            .add("initializations", u64::try_from(n).unwrap_or(u64::MAX));
        distance[source] = Some(0);

        for &vertex in &outcome.order {
            let Some(base) = distance[vertex] else {
                continue;
            };
            self.metrics.increment("vertices_processed");

            for edge in graph.out_edges(vertex) {
                self.metrics.increment("relaxations");
                let candidate = base.saturating_add(edge.weight);
                let better =
                    distance[edge.to].is_none_or(|current| mode.improves(candidate, current));
                if better {
                    distance[edge.to] = Some(candidate);
                    predecessor[edge.to] = Some(vertex);
                    self.metrics.increment("distance_updates");
                }
            }
        }

        self.metrics.stop_timer();
        debug!(
            source,
            %mode,
            reached = distance.iter().filter(|d| d.is_some()).count(),
            "paths computed"
        );

        self.state = Some(PathState {
            source,
            mode,
            distance,
            predecessor,
        });
        Ok(true)
    }

    fn state(&self) -> Result<&PathState> {
        self.state.as_ref().ok_or(NOT_COMPUTED)
    }

    /// Distance from the source to `vertex`; `None` when unreachable.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before a successful computation,
    /// [`GraphError::OutOfRange`] if `vertex` is not a vertex.
    pub fn distance(&self, vertex: usize) -> Result<Option<i64>> {
        let state = self.state()?;
        self.graph.check_vertex(vertex)?;
        Ok(state.distance[vertex])
    }

    /// All distances, indexed by vertex.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before a successful computation.
    pub fn distances(&self) -> Result<&[Option<i64>]> {
        Ok(&self.state()?.distance)
    }

    /// Vertices on the optimal path from the source to `destination`,
    /// source first. Empty when `destination` is unreachable.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before a successful computation,
    /// [`GraphError::OutOfRange`] if `destination` is not a vertex.
    pub fn path(&self, destination: usize) -> Result<Vec<usize>> {
        let state = self.state()?;
        self.graph.check_vertex(destination)?;
        if state.distance[destination].is_none() {
            return Ok(Vec::new());
        }

        let mut path = vec![destination];
        let mut current = destination;
        while let Some(previous) = state.predecessor[current] {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Ok(path)
    }

    /// [`DagPathSolver::path`] as vertex labels.
    ///
    /// # Errors
    ///
    /// Same as [`DagPathSolver::path`].
    pub fn path_labels(&self, destination: usize) -> Result<Vec<String>> {
        Ok(self
            .path(destination)?
            .into_iter()
            .map(|v| self.graph.label_of(v).to_string())
            .collect())
    }

    /// Source of the current result.
    #[must_use]
    pub fn source(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.source)
    }

    /// Mode of the current result.
    #[must_use]
    pub fn mode(&self) -> Option<PathMode> {
        self.state.as_ref().map(|s| s.mode)
    }

    /// Return `true` if the graph is acyclic. Sorts on first use.
    pub fn is_dag(&mut self) -> bool {
        if self.sorter.outcome().is_err() {
            self.sorter.sort();
        }
        self.sorter.is_dag().unwrap_or(false)
    }

    /// Counters and timing of the last computation.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Counters of the cached topological sort.
    #[must_use]
    pub fn sort_metrics(&self) -> &Metrics {
        self.sorter.metrics()
    }

    #[must_use]
    pub fn graph(&self) -> &'g DiGraph {
        self.graph
    }
}
