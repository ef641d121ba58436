//! Critical path: the heaviest path anywhere in a DAG.
//!
//! Longest paths are computed from every vertex in turn and the best
//! `(source, destination)` pair with `destination != source` wins. Ties go to
//! the pair found first, scanning sources and then destinations in
//! increasing index order. This is `O(V * (V + E))`.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::graph::DiGraph;
use crate::paths::DagPathSolver;

/// The heaviest source-to-destination path of a DAG.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CriticalPath {
    /// Vertices from source to destination. Empty when the graph has no
    /// edge-connected pair.
    pub path: Vec<usize>,
    /// Total weight along `path`.
    pub length: i64,
}

impl CriticalPath {
    /// First vertex of the path.
    #[must_use]
    pub fn source(&self) -> Option<usize> {
        self.path.first().copied()
    }

    /// Last vertex of the path.
    #[must_use]
    pub fn destination(&self) -> Option<usize> {
        self.path.last().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// The path as vertex labels of `graph`.
    #[must_use]
    pub fn labels(&self, graph: &DiGraph) -> Vec<String> {
        self.path
            .iter()
            .map(|&v| graph.label_of(v).to_string())
            .collect()
    }
}

impl DagPathSolver<'_> {
    /// Find the critical path of the graph.
    ///
    /// Returns `Ok(None)` when the graph is cyclic. On success the solver
    /// holds the longest paths from the critical source, so
    /// [`DagPathSolver::distance`] and [`DagPathSolver::path`] answer for it.
    ///
    /// # Errors
    ///
    /// Propagates any [`GraphError`](crate::GraphError) from the underlying
    /// path computations. Every source comes from the graph's own vertex
    /// range, so none is expected.
    #[instrument(skip(self), fields(vertices = self.graph.vertex_count()))]
    pub fn find_critical_path(&mut self) -> Result<Option<CriticalPath>> {
        let graph = self.graph;
        let mut best: Option<(usize, usize, i64)> = None;

        for source in graph.vertices() {
            if !self.compute_longest_paths(source)? {
                debug!("graph is cyclic, no critical path");
                return Ok(None);
            }
            for (destination, distance) in self.distances()?.iter().enumerate() {
                let Some(length) = *distance else {
                    continue;
                };
                if destination == source {
                    continue;
                }
                if best.is_none_or(|(_, _, top)| length > top) {
                    best = Some((source, destination, length));
                }
            }
        }

        let Some((source, destination, length)) = best else {
            debug!("no reachable pair, critical path is empty");
            return Ok(Some(CriticalPath::default()));
        };

        self.compute_longest_paths(source)?;
        let path = self.path(destination)?;
        debug!(source, destination, length, "critical path found");
        Ok(Some(CriticalPath { path, length }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(n: usize, edges: &[(usize, usize, i64)]) -> DiGraph {
        let mut g = DiGraph::new(n).unwrap();
        for &(a, b, w) in edges {
            g.add_edge(a, b, w).unwrap();
        }
        g
    }

    #[test]
    fn picks_heaviest_chain() {
        let g = weighted(5, &[(0, 1, 1), (1, 2, 1), (3, 4, 10)]);
        let mut solver = DagPathSolver::new(&g);
        let cp = solver.find_critical_path().unwrap().unwrap();
        assert_eq!(cp.path, [3, 4]);
        assert_eq!(cp.length, 10);
        assert_eq!(cp.source(), Some(3));
        assert_eq!(cp.destination(), Some(4));
    }

    #[test]
    fn solver_state_reflects_critical_source() {
        let g = weighted(5, &[(0, 1, 1), (1, 2, 1), (3, 4, 10)]);
        let mut solver = DagPathSolver::new(&g);
        solver.find_critical_path().unwrap().unwrap();
        assert_eq!(solver.source(), Some(3));
        assert_eq!(solver.distance(4).unwrap(), Some(10));
    }

    #[test]
    fn ties_keep_first_pair() {
        let g = weighted(4, &[(0, 1, 5), (2, 3, 5)]);
        let mut solver = DagPathSolver::new(&g);
        let cp = solver.find_critical_path().unwrap().unwrap();
        assert_eq!(cp.path, [0, 1]);
    }

    #[test]
    fn lone_vertex_gives_empty_path() {
        let g = weighted(1, &[]);
        let mut solver = DagPathSolver::new(&g);
        let cp = solver.find_critical_path().unwrap().unwrap();
        assert!(cp.is_empty());
        assert_eq!(cp.length, 0);
        assert_eq!(cp.source(), None);
    }

    #[test]
    fn negative_only_graph_still_has_a_path() {
        let g = weighted(3, &[(0, 1, -4), (1, 2, -1)]);
        let mut solver = DagPathSolver::new(&g);
        let cp = solver.find_critical_path().unwrap().unwrap();
        assert_eq!(cp.path, [1, 2]);
        assert_eq!(cp.length, -1);
    }

    #[test]
    fn cyclic_graph_has_none() {
        let g = weighted(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]);
        let mut solver = DagPathSolver::new(&g);
        assert_eq!(solver.find_critical_path().unwrap(), None);
    }

    #[test]
    fn cyclic_result_is_ok_none_and_clears_state() {
        let g = weighted(3, &[(0, 1, 1), (1, 0, 1), (1, 2, 1)]);
        let mut solver = DagPathSolver::new(&g);
        assert!(matches!(solver.find_critical_path(), Ok(None)));
        assert!(matches!(
            solver.distance(2),
            Err(crate::GraphError::IllegalState(_))
        ));
    }

    #[test]
    fn labels_use_graph_labels() {
        let mut g = weighted(2, &[(0, 1, 3)]);
        g.set_label(0, "a").unwrap();
        g.set_label(1, "b").unwrap();
        let mut solver = DagPathSolver::new(&g);
        let cp = solver.find_critical_path().unwrap().unwrap();
        assert_eq!(cp.labels(&g), ["a", "b"]);
    }
}
