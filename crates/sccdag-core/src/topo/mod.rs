//! Topological ordering with cycle detection.
//!
//! Two interchangeable strategies implement [`TopologicalSorter`]:
//!
//! - [`KahnSort`]: in-degree counting with a FIFO queue.
//! - [`DfsSort`]: reversed DFS finishing order with back-edge detection.
//!
//! Both return the full vertex order when the graph is acyclic and an empty
//! order when it is not; a partial order is never returned. When several
//! orders are valid each strategy breaks ties by vertex index under its own
//! rule, so the two may disagree while both being correct. Compare orders
//! with [`verify_order`], not by equality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::DiGraph;
use crate::metrics::Metrics;

pub mod dfs;
pub mod kahn;

pub use dfs::DfsSort;
pub use kahn::KahnSort;

/// Common contract of the sorting strategies.
///
/// [`TopologicalSorter::sort`] must run before any query; queries fail with
/// [`GraphError::IllegalState`] otherwise.
pub trait TopologicalSorter {
    /// Short strategy name for reports.
    fn name(&self) -> &'static str;

    /// The graph being sorted.
    fn graph(&self) -> &DiGraph;

    /// Compute (or recompute) the order. Empty when the graph has a cycle.
    fn sort(&mut self) -> &[usize];

    /// Result of the last [`TopologicalSorter::sort`].
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before the first sort.
    fn outcome(&self) -> Result<&SortOutcome>;

    /// Counters and timing of the last sort.
    fn metrics(&self) -> &Metrics;

    /// The computed order.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before the first sort.
    fn order(&self) -> Result<&[usize]> {
        Ok(&self.outcome()?.order)
    }

    /// Whether the last sort found the graph acyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before the first sort.
    fn is_dag(&self) -> Result<bool> {
        Ok(self.outcome()?.is_dag)
    }

    /// Re-check the computed order against every edge of the graph.
    /// `false` when the graph was found cyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before the first sort.
    fn verify_order(&self) -> Result<bool> {
        let outcome = self.outcome()?;
        Ok(outcome.is_dag && verify_order(self.graph(), &outcome.order))
    }

    /// The computed order as vertex labels.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before the first sort.
    fn order_labels(&self) -> Result<Vec<String>> {
        let graph = self.graph();
        Ok(self
            .order()?
            .iter()
            .map(|&v| graph.label_of(v).to_string())
            .collect())
    }
}

/// Order produced by one sort run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortOutcome {
    /// Every vertex in topological order, or empty when cyclic.
    pub order: Vec<usize>,
    /// `false` when a cycle was found.
    pub is_dag: bool,
}

impl SortOutcome {
    pub(crate) const fn acyclic(order: Vec<usize>) -> Self {
        Self {
            order,
            is_dag: true,
        }
    }

    pub(crate) const fn cyclic() -> Self {
        Self {
            order: Vec::new(),
            is_dag: false,
        }
    }
}

pub(crate) const NOT_SORTED: GraphError = GraphError::IllegalState("topological sort has not run");

/// Return `true` if `order` lists every vertex of `graph` exactly once and
/// every edge `u → v` has `u` strictly before `v`.
#[must_use]
pub fn verify_order(graph: &DiGraph, order: &[usize]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }

    let mut position: Vec<Option<usize>> = vec![None; n];
    for (index, &vertex) in order.iter().enumerate() {
        match position.get_mut(vertex) {
            Some(slot @ None) => *slot = Some(index),
            _ => return false,
        }
    }

    graph
        .edges()
        .all(|(from, edge)| position[from] < position[edge.to])
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

/// Which sorting strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    /// Queue-based in-degree elimination.
    Kahn,
    /// DFS post-order with back-edge detection.
    #[default]
    Dfs,
}

impl SortStrategy {
    /// Both strategies, in report order.
    pub const ALL: [Self; 2] = [Self::Kahn, Self::Dfs];

    /// Create a sorter of this strategy for `graph`.
    #[must_use]
    pub fn sorter<'g>(self, graph: &'g DiGraph) -> Box<dyn TopologicalSorter + 'g> {
        match self {
            Self::Kahn => Box::new(KahnSort::new(graph)),
            Self::Dfs => Box::new(DfsSort::new(graph)),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kahn => "kahn",
            Self::Dfs => "dfs",
        })
    }
}

impl FromStr for SortStrategy {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kahn" => Ok(Self::Kahn),
            "dfs" => Ok(Self::Dfs),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown sort strategy '{other}' (expected kahn or dfs)"
            ))),
        }
    }
}
