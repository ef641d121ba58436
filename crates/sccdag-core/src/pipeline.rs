//! End-to-end analysis of one dataset.
//!
//! # Overview
//!
//! ```text
//! graph → SCCs → condensation → Kahn + DFS orders → shortest paths
//!                                                  → critical path
//! ```
//!
//! Every stage after the SCC pass runs on the condensation, which is acyclic
//! for any input, so a cyclic dataset still gets a full report. The returned
//! [`AnalysisReport`] is plain data: the CLI renders it as text or JSON.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::graph::{
    CondensationBuilder, CondensationStats, DiGraph, Kosaraju, WeightPolicy, find_cycle,
};
use crate::metrics::MetricsSnapshot;
use crate::paths::DagPathSolver;
use crate::topo::SortStrategy;

/// One strongly connected component of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    pub id: usize,
    pub size: usize,
    pub cyclic: bool,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensationReport {
    pub policy: WeightPolicy,
    pub labels: Vec<String>,
    pub stats: CondensationStats,
    pub metrics: MetricsSnapshot,
}

/// Outcome of one topological sort of the condensation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortReport {
    pub strategy: SortStrategy,
    pub is_dag: bool,
    pub verified: bool,
    pub order: Vec<String>,
    pub metrics: MetricsSnapshot,
}

/// Distance and path to one reachable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathTarget {
    pub component: usize,
    pub label: String,
    pub distance: i64,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPathReport {
    pub source: usize,
    pub source_label: String,
    pub targets: Vec<PathTarget>,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalPathReport {
    pub path: Vec<String>,
    pub length: i64,
}

/// Everything [`analyze`] found out about one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub name: String,
    pub vertices: usize,
    pub edges: usize,
    /// A cycle of the input, as labels, when it has one.
    pub cycle: Option<Vec<String>>,
    pub components: Vec<ComponentReport>,
    pub scc_metrics: MetricsSnapshot,
    pub condensation: CondensationReport,
    pub sorts: Vec<SortReport>,
    pub shortest_paths: Option<ShortestPathReport>,
    pub critical_path: Option<CriticalPathReport>,
}

impl AnalysisReport {
    /// Return `true` if the input graph itself has no cycle.
    #[must_use]
    pub fn is_dag(&self) -> bool {
        self.cycle.is_none()
    }

    /// The row for the cross-dataset summary table.
    #[must_use]
    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            dataset: self.name.clone(),
            vertices: self.vertices,
            edges: self.edges,
            sccs: self.components.len(),
            is_dag: self.is_dag(),
        }
    }
}

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub dataset: String,
    pub vertices: usize,
    pub edges: usize,
    pub sccs: usize,
    pub is_dag: bool,
}

/// Run the full analysis on `graph`.
///
/// # Errors
///
/// Only internal inconsistencies surface here; any valid graph analyses
/// cleanly.
#[instrument(skip(graph, config), fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(name: &str, graph: &DiGraph, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let mut scc = Kosaraju::new(graph);
    let partition = scc.find_sccs().clone();
    let components = partition
        .components()
        .iter()
        .enumerate()
        .map(|(id, members)| ComponentReport {
            id,
            size: members.len(),
            cyclic: partition.is_cyclic(id),
            members: members
                .iter()
                .map(|&v| graph.label_of(v).to_string())
                .collect(),
        })
        .collect();

    let cycle = find_cycle(graph).map(|cycle| labels_of(graph, &cycle));

    let mut builder =
        CondensationBuilder::new(graph, &partition)?.with_policy(config.condensation.weight_policy);
    builder.build()?;
    let stats = builder.statistics()?;
    let condensation_metrics = builder.metrics().snapshot();
    let dag = builder.into_condensation()?;
    let condensation = CondensationReport {
        policy: config.condensation.weight_policy,
        labels: dag.vertices().map(|c| dag.label_of(c).to_string()).collect(),
        stats,
        metrics: condensation_metrics,
    };

    let mut sorts = Vec::with_capacity(SortStrategy::ALL.len());
    for strategy in SortStrategy::ALL {
        let mut sorter = strategy.sorter(&dag);
        sorter.sort();
        sorts.push(SortReport {
            strategy,
            is_dag: sorter.is_dag()?,
            verified: sorter.verify_order()?,
            order: sorter.order_labels()?,
            metrics: sorter.metrics().snapshot(),
        });
    }

    // The condensation is acyclic, so the solver always produces paths here.
    let (shortest_paths, critical_path) = path_reports(&dag, config)?;

    info!(
        name,
        components = partition.component_count(),
        dag = cycle.is_none(),
        "dataset analysed"
    );

    Ok(AnalysisReport {
        name: name.to_string(),
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        cycle,
        components,
        scc_metrics: scc.metrics().snapshot(),
        condensation,
        sorts,
        shortest_paths,
        critical_path,
    })
}

fn path_reports(
    dag: &DiGraph,
    config: &AnalysisConfig,
) -> Result<(Option<ShortestPathReport>, Option<CriticalPathReport>)> {
    let source = config.paths.source.min(dag.vertex_count() - 1);
    if source != config.paths.source {
        debug!(
            requested = config.paths.source,
            source, "path source clamped to last component"
        );
    }

    let mut solver = DagPathSolver::new(dag);
    let shortest = if solver.compute_shortest_paths(source)? {
        let mut targets = Vec::new();
        for (component, distance) in solver.distances()?.iter().enumerate() {
            if let Some(distance) = *distance {
                targets.push(PathTarget {
                    component,
                    label: dag.label_of(component).to_string(),
                    distance,
                    path: solver.path_labels(component)?,
                });
            }
        }
        Some(ShortestPathReport {
            source,
            source_label: dag.label_of(source).to_string(),
            targets,
            metrics: solver.metrics().snapshot(),
        })
    } else {
        None
    };

    let critical = if config.paths.critical_path {
        solver.find_critical_path()?.map(|cp| CriticalPathReport {
            path: cp.labels(dag),
            length: cp.length,
        })
    } else {
        None
    };

    Ok((shortest, critical))
}

fn labels_of(graph: &DiGraph, vertices: &[usize]) -> Vec<String> {
    vertices
        .iter()
        .map(|&v| graph.label_of(v).to_string())
        .collect()
}
