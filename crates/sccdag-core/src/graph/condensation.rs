//! SCC condensation: collapse each component into a single vertex.
//!
//! # Overview
//!
//! Given a graph and its [`ComponentPartition`], the condensation has one
//! vertex per component and one edge per distinct ordered pair of components
//! joined by at least one original edge. Intra-component edges are dropped,
//! so the result is a DAG.
//!
//! # Parallel cross-component edges
//!
//! Several original edges may join the same pair of components. Exactly one
//! condensation edge is emitted per pair, in first-encounter order (vertex
//! order, then adjacency order). Its weight follows a [`WeightPolicy`]; the
//! default [`WeightPolicy::FirstSeen`] keeps the weight of the first edge
//! encountered.
//!
//! # Acyclicity
//!
//! [`CondensationBuilder::is_acyclic`] does not trust the construction: it
//! runs an independent DFS cycle search over the built graph, which doubles
//! as a check on the SCC partition that produced it.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::cycles::find_cycle;
use crate::graph::scc::ComponentPartition;
use crate::graph::store::DiGraph;
use crate::metrics::Metrics;

/// Components with more members than this are labelled by size only.
const MAX_LISTED_MEMBERS: usize = 3;

// ---------------------------------------------------------------------------
// WeightPolicy
// ---------------------------------------------------------------------------

/// How to weight a condensation edge that stands for several original edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPolicy {
    /// Keep the weight of the first original edge encountered.
    #[default]
    FirstSeen,
    /// Keep the largest weight.
    Max,
    /// Keep the smallest weight.
    Min,
    /// Add all weights together.
    Sum,
}

impl WeightPolicy {
    fn merge(self, current: i64, incoming: i64) -> i64 {
        match self {
            Self::FirstSeen => current,
            Self::Max => current.max(incoming),
            Self::Min => current.min(incoming),
            Self::Sum => current.saturating_add(incoming),
        }
    }
}

impl fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstSeen => "first-seen",
            Self::Max => "max",
            Self::Min => "min",
            Self::Sum => "sum",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for WeightPolicy {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "first-seen" | "first" => Ok(Self::FirstSeen),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "sum" => Ok(Self::Sum),
            other => Err(GraphError::InvalidArgument(format!(
                "unknown weight policy '{other}' (expected first-seen, max, min or sum)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// CondensationStats
// ---------------------------------------------------------------------------

/// Size comparison between a graph and its condensation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensationStats {
    /// Vertices in the original graph.
    pub original_vertices: usize,
    /// Edges in the original graph.
    pub original_edges: usize,
    /// Vertices (components) in the condensation.
    pub condensation_vertices: usize,
    /// Edges in the condensation.
    pub condensation_edges: usize,
    /// `100 * condensation_vertices / original_vertices`.
    pub compression_ratio: f64,
    /// Result of the independent cycle check on the condensation.
    pub is_acyclic: bool,
}

impl fmt::Display for CondensationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "original_vertices: {}", self.original_vertices)?;
        writeln!(f, "original_edges: {}", self.original_edges)?;
        writeln!(f, "condensation_vertices: {}", self.condensation_vertices)?;
        writeln!(f, "condensation_edges: {}", self.condensation_edges)?;
        writeln!(f, "compression_ratio: {:.2}%", self.compression_ratio)?;
        write!(f, "is_acyclic: {}", self.is_acyclic)
    }
}

// ---------------------------------------------------------------------------
// CondensationBuilder
// ---------------------------------------------------------------------------

/// Builds the condensation DAG of a graph from its SCC partition.
#[derive(Debug)]
pub struct CondensationBuilder<'a> {
    graph: &'a DiGraph,
    partition: &'a ComponentPartition,
    policy: WeightPolicy,
    metrics: Metrics,
    condensation: Option<DiGraph>,
}

impl<'a> CondensationBuilder<'a> {
    /// Create a builder for `graph` and its partition.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidArgument`] if the partition was computed for a
    /// graph with a different vertex count.
    pub fn new(graph: &'a DiGraph, partition: &'a ComponentPartition) -> Result<Self> {
        if partition.vertex_count() != graph.vertex_count() {
            return Err(GraphError::InvalidArgument(format!(
                "partition covers {} vertices but graph has {}",
                partition.vertex_count(),
                graph.vertex_count()
            )));
        }

        Ok(Self {
            graph,
            partition,
            policy: WeightPolicy::default(),
            metrics: Metrics::new(),
            condensation: None,
        })
    }

    /// Choose how parallel cross-component edges are weighted.
    #[must_use]
    pub const fn with_policy(mut self, policy: WeightPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active weight policy.
    #[must_use]
    pub const fn policy(&self) -> WeightPolicy {
        self.policy
    }

    /// Build (or rebuild) the condensation graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidArgument`] if the partition has no components,
    /// which cannot happen for a partition of a non-empty graph.
    #[instrument(skip(self), fields(components = self.partition.component_count(), policy = %self.policy))]
    pub fn build(&mut self) -> Result<&DiGraph> {
        self.metrics.reset();
        self.metrics.start_timer();

        let mut condensation = DiGraph::new(self.partition.component_count())?;
        for (id, members) in self.partition.components().iter().enumerate() {
            condensation.set_label(id, self.component_label(id, members))?;
        }

        // First-encounter order of component pairs, plus their merged weight.
        let mut order: Vec<(usize, usize)> = Vec::new();
        let mut weights: HashMap<(usize, usize), i64> = HashMap::new();

        for (from, edge) in self.graph.edges() {
            self.metrics.increment("edge_explorations");
            let (Some(src), Some(dst)) = (
                self.partition.component_of(from),
                self.partition.component_of(edge.to),
            ) else {
                continue;
            };
            if src == dst {
                continue;
            }

            match weights.get_mut(&(src, dst)) {
                Some(weight) => {
                    *weight = self.policy.merge(*weight, edge.weight);
                    self.metrics.increment("condensation_edges_merged");
                }
                None => {
                    weights.insert((src, dst), edge.weight);
                    order.push((src, dst));
                }
            }
        }

        for pair in order {
            let weight = weights.get(&pair).copied().unwrap_or_default();
            condensation.add_edge(pair.0, pair.1, weight)?;
        }

        self.metrics.stop_timer();
        debug!(
            vertices = condensation.vertex_count(),
            edges = condensation.edge_count(),
            "condensation built"
        );

        Ok(&*self.condensation.insert(condensation))
    }

    /// The built condensation graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`CondensationBuilder::build`].
    pub fn condensation(&self) -> Result<&DiGraph> {
        self.condensation
            .as_ref()
            .ok_or(GraphError::IllegalState("condensation has not been built"))
    }

    /// Consume the builder and return the condensation graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`CondensationBuilder::build`].
    pub fn into_condensation(self) -> Result<DiGraph> {
        self.condensation
            .ok_or(GraphError::IllegalState("condensation has not been built"))
    }

    /// Run an independent DFS cycle search over the condensation.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`CondensationBuilder::build`].
    pub fn is_acyclic(&self) -> Result<bool> {
        Ok(self.cycle_witness()?.is_none())
    }

    /// A cycle in the condensation, if one exists. Always `None` for a
    /// correct partition.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`CondensationBuilder::build`].
    pub fn cycle_witness(&self) -> Result<Option<Vec<usize>>> {
        Ok(find_cycle(self.condensation()?))
    }

    /// Component (condensation vertex) of an original vertex.
    #[must_use]
    pub fn component_for_vertex(&self, vertex: usize) -> Option<usize> {
        self.partition.component_of(vertex)
    }

    /// Original vertices collapsed into component `id`.
    #[must_use]
    pub fn component_vertices(&self, id: usize) -> Option<&[usize]> {
        self.partition.members(id)
    }

    /// Size comparison between the original graph and the condensation.
    ///
    /// # Errors
    ///
    /// [`GraphError::IllegalState`] before [`CondensationBuilder::build`].
    pub fn statistics(&self) -> Result<CondensationStats> {
        let condensation = self.condensation()?;
        let original_vertices = self.graph.vertex_count();
        #[allow(clippy::cast_precision_loss)]
        let compression_ratio =
            100.0 * condensation.vertex_count() as f64 / original_vertices as f64;

        Ok(CondensationStats {
            original_vertices,
            original_edges: self.graph.edge_count(),
            condensation_vertices: condensation.vertex_count(),
            condensation_edges: condensation.edge_count(),
            compression_ratio,
            is_acyclic: self.is_acyclic()?,
        })
    }

    /// Counters and timing of the last build.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn component_label(&self, id: usize, members: &[usize]) -> String {
        if members.len() <= MAX_LISTED_MEMBERS {
            let labels: Vec<&str> = members.iter().map(|&v| self.graph.label_of(v)).collect();
            format!("C{id}[{}]", labels.join(","))
        } else {
            format!("C{id}[{} vertices]", members.len())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::scc::Kosaraju;

    fn weighted(n: usize, edges: &[(usize, usize, i64)]) -> DiGraph {
        let mut g = DiGraph::new(n).unwrap();
        for &(a, b, w) in edges {
            g.add_edge(a, b, w).unwrap();
        }
        g
    }

    fn partition_of(g: &DiGraph) -> ComponentPartition {
        Kosaraju::new(g).find_sccs().clone()
    }

    /// Two 2-cycles {0,1} and {2,3} joined by three parallel edges.
    fn joined_cycles() -> DiGraph {
        weighted(
            4,
            &[
                (0, 1, 1),
                (1, 0, 1),
                (2, 3, 1),
                (3, 2, 1),
                (0, 2, 5),
                (1, 3, 9),
                (1, 2, 2),
            ],
        )
    }

    fn single_cross_weight(policy: WeightPolicy) -> i64 {
        let g = joined_cycles();
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap().with_policy(policy);
        let c = builder.build().unwrap();
        assert_eq!(c.edge_count(), 1);
        let (_, edge) = c.edges().next().unwrap();
        edge.weight
    }

    #[test]
    fn queries_before_build_fail() {
        let g = joined_cycles();
        let p = partition_of(&g);
        let builder = CondensationBuilder::new(&g, &p).unwrap();
        assert!(matches!(
            builder.condensation(),
            Err(GraphError::IllegalState(_))
        ));
        assert!(builder.is_acyclic().is_err());
        assert!(builder.statistics().is_err());
    }

    #[test]
    fn mismatched_partition_is_rejected() {
        let small = weighted(2, &[(0, 1, 1)]);
        let big = weighted(3, &[(0, 1, 1)]);
        let p = partition_of(&small);
        assert!(matches!(
            CondensationBuilder::new(&big, &p),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn parallel_cross_edges_collapse_to_first_seen_weight() {
        assert_eq!(single_cross_weight(WeightPolicy::FirstSeen), 5);
    }

    #[test]
    fn weight_policies_aggregate() {
        assert_eq!(single_cross_weight(WeightPolicy::Max), 9);
        assert_eq!(single_cross_weight(WeightPolicy::Min), 2);
        assert_eq!(single_cross_weight(WeightPolicy::Sum), 16);
    }

    #[test]
    fn intra_component_edges_are_dropped() {
        let g = weighted(3, &[(0, 1, 1), (1, 2, 1), (2, 0, 1), (1, 1, 4)]);
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap();
        let c = builder.build().unwrap();
        assert_eq!(c.vertex_count(), 1);
        assert_eq!(c.edge_count(), 0);
        assert!(builder.is_acyclic().unwrap());
    }

    #[test]
    fn condensation_is_acyclic_and_maps_vertices() {
        let g = joined_cycles();
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap();
        builder.build().unwrap();

        assert!(builder.is_acyclic().unwrap());
        assert_eq!(builder.cycle_witness().unwrap(), None);
        assert_eq!(
            builder.component_for_vertex(0),
            builder.component_for_vertex(1)
        );
        let c23 = builder.component_for_vertex(2).unwrap();
        let mut members = builder.component_vertices(c23).unwrap().to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![2, 3]);
        assert_eq!(builder.component_vertices(99), None);
    }

    #[test]
    fn labels_list_small_components_and_count_large_ones() {
        let mut g = weighted(5, &[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]);
        g.set_label(4, "Solo").unwrap();
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap();
        let c = builder.build().unwrap();

        let big = p.component_of(0).unwrap();
        let solo = p.component_of(4).unwrap();
        assert_eq!(c.label(big).unwrap(), format!("C{big}[4 vertices]"));
        assert_eq!(c.label(solo).unwrap(), format!("C{solo}[Solo]"));
    }

    #[test]
    fn statistics_report_compression() {
        let g = joined_cycles();
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap();
        builder.build().unwrap();
        let stats = builder.statistics().unwrap();

        assert_eq!(stats.original_vertices, 4);
        assert_eq!(stats.original_edges, 7);
        assert_eq!(stats.condensation_vertices, 2);
        assert_eq!(stats.condensation_edges, 1);
        assert!((stats.compression_ratio - 50.0).abs() < f64::EPSILON);
        assert!(stats.is_acyclic);
        assert!(stats.to_string().contains("compression_ratio: 50.00%"));
    }

    #[test]
    fn merged_edges_are_counted() {
        let g = joined_cycles();
        let p = partition_of(&g);
        let mut builder = CondensationBuilder::new(&g, &p).unwrap();
        builder.build().unwrap();
        assert_eq!(builder.metrics().counter("condensation_edges_merged"), 2);
        assert_eq!(builder.metrics().counter("edge_explorations"), 7);
    }

    #[test]
    fn policy_parses_from_str() {
        assert_eq!("max".parse::<WeightPolicy>().unwrap(), WeightPolicy::Max);
        assert_eq!(
            "First-Seen".parse::<WeightPolicy>().unwrap(),
            WeightPolicy::FirstSeen
        );
        assert!("median".parse::<WeightPolicy>().is_err());
        assert_eq!(WeightPolicy::Sum.to_string(), "sum");
    }
}
