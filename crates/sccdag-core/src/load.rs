//! JSON graph documents.
//!
//! ```json
//! {
//!   "vertices": 4,
//!   "edges": [{ "from": 0, "to": 1, "weight": 3 }, { "from": 1, "to": 2 }],
//!   "labels": { "0": "TaskA", "1": "TaskB" }
//! }
//! ```
//!
//! `weight` defaults to 1 and `labels` may be omitted or partial. Vertex
//! indices are validated against `vertices` when the graph is built.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::graph::{DiGraph, Edge};

/// Largest vertex count a document may declare. Larger counts are rejected
/// before any allocation.
pub const MAX_VERTICES: usize = 10_000_000;

/// One edge of a [`GraphDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: i64,
    pub to: i64,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

const fn default_weight() -> i64 {
    Edge::DEFAULT_WEIGHT
}

/// Serialized form of a [`DiGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub vertices: i64,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<usize, String>,
}

/// A graph together with the name it was loaded under.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub graph: DiGraph,
}

impl Dataset {
    #[must_use]
    pub fn new(name: impl Into<String>, graph: DiGraph) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }
}

impl GraphDocument {
    /// Describe `graph` with every edge and every label spelled out.
    #[must_use]
    pub fn from_graph(graph: &DiGraph) -> Self {
        Self {
            vertices: i64::try_from(graph.vertex_count()).unwrap_or(i64::MAX),
            edges: graph
                .edges()
                .map(|(from, edge)| EdgeSpec {
                    from: index_to_i64(from),
                    to: index_to_i64(edge.to),
                    weight: edge.weight,
                })
                .collect(),
            labels: graph
                .vertices()
                .map(|v| (v, graph.label_of(v).to_string()))
                .collect(),
        }
    }

    /// Build the graph this document describes.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidArgument`] for a vertex count outside
    /// `1..=MAX_VERTICES` or a negative index, [`GraphError::OutOfRange`] for
    /// an index past the end.
    pub fn to_graph(&self) -> crate::Result<DiGraph> {
        let vertices = usize::try_from(self.vertices).map_err(|_| {
            GraphError::InvalidArgument(format!(
                "vertex count must be positive, got {}",
                self.vertices
            ))
        })?;
        if vertices > MAX_VERTICES {
            return Err(GraphError::InvalidArgument(format!(
                "vertex count {vertices} exceeds the limit of {MAX_VERTICES}"
            )));
        }
        let mut graph = DiGraph::new(vertices)?;

        for edge in &self.edges {
            graph.add_edge(to_index(edge.from)?, to_index(edge.to)?, edge.weight)?;
        }
        for (&vertex, label) in &self.labels {
            graph.set_label(vertex, label.as_str())?;
        }
        Ok(graph)
    }
}

fn to_index(value: i64) -> crate::Result<usize> {
    usize::try_from(value)
        .map_err(|_| GraphError::InvalidArgument(format!("vertex index must be >= 0, got {value}")))
}

fn index_to_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Parse a JSON graph document and build the graph.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or describes an invalid graph.
pub fn parse_graph(json: &str) -> Result<DiGraph> {
    let document: GraphDocument =
        serde_json::from_str(json).context("Invalid graph document")?;
    document.to_graph().context("Invalid graph")
}

/// Read and parse the graph document at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a valid
/// graph.
pub fn load_graph(path: &Path) -> Result<DiGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_graph(&content).with_context(|| format!("Failed to load {}", path.display()))
}

/// Load every `*.json` file in `dir`, sorted by file name. Each dataset is
/// named after its file stem. Files that fail to load are logged and skipped.
///
/// # Errors
///
/// Returns an error only if `dir` itself cannot be listed.
pub fn load_dir(dir: &Path) -> Result<Vec<Dataset>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?;

    let mut paths: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    paths.sort();

    let mut datasets = Vec::with_capacity(paths.len());
    for path in paths {
        match load_graph(&path) {
            Ok(graph) => {
                let name = dataset_name(&path);
                debug!(name, vertices = graph.vertex_count(), "loaded dataset");
                datasets.push(Dataset::new(name, graph));
            }
            Err(err) => warn!(path = %path.display(), "skipping dataset: {err:#}"),
        }
    }
    Ok(datasets)
}

/// Dataset name for `path`: the file stem, or the whole path when there is
/// none.
#[must_use]
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Pretty JSON for `graph`, suitable for [`parse_graph`].
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_string(graph: &DiGraph) -> Result<String> {
    serde_json::to_string_pretty(&GraphDocument::from_graph(graph))
        .context("Failed to serialize graph")
}
