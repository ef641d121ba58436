//! Weighted directed graph over dense vertex indices.
//!
//! # Overview
//!
//! [`DiGraph`] is the container every analysis stage reads from. Vertices are
//! the integers `0..n`; each vertex keeps its outgoing edges in insertion
//! order, and that order is observable in every traversal built on top of it.
//! Parallel edges and self-loops are kept as-is.
//!
//! ## Labels
//!
//! Each vertex carries a display label, defaulting to `V{index}`. Labels are
//! metadata for reports only and never affect an algorithm.
//!
//! ## Validation
//!
//! Every vertex index passed to a public method is checked against the vertex
//! count. Out-of-range indices fail with [`GraphError::OutOfRange`] at the
//! call that introduced them; nothing is clamped.

#![allow(clippy::module_name_repetitions)]

use std::fmt;
use std::ops::Range;

use crate::error::{GraphError, Result};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// An outgoing edge: destination vertex plus integer weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Destination vertex.
    pub to: usize,
    /// Edge weight; `1` for unweighted edges.
    pub weight: i64,
}

impl Edge {
    /// Weight assigned by [`DiGraph::add_unweighted_edge`].
    pub const DEFAULT_WEIGHT: i64 = 1;
}

// ---------------------------------------------------------------------------
// DiGraph
// ---------------------------------------------------------------------------

/// A directed graph with a fixed vertex set and weighted edges.
///
/// The shape is fixed at construction; edges are only appended while the
/// graph is being built. Analysis stages hold a shared borrow, so the graph
/// cannot change underneath a running analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiGraph {
    adjacency: Vec<Vec<Edge>>,
    labels: Vec<String>,
}

impl DiGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] when `vertex_count` is zero.
    pub fn new(vertex_count: usize) -> Result<Self> {
        if vertex_count == 0 {
            return Err(GraphError::InvalidArgument(
                "number of vertices must be positive".to_string(),
            ));
        }

        Ok(Self {
            adjacency: vec![Vec::new(); vertex_count],
            labels: (0..vertex_count).map(default_label).collect(),
        })
    }

    /// Append a weighted edge `from → to`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is invalid.
    pub fn add_edge(&mut self, from: usize, to: usize, weight: i64) -> Result<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        self.adjacency[from].push(Edge { to, weight });
        Ok(())
    }

    /// Append an edge `from → to` with [`Edge::DEFAULT_WEIGHT`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is invalid.
    pub fn add_unweighted_edge(&mut self, from: usize, to: usize) -> Result<()> {
        self.add_edge(from, to, Edge::DEFAULT_WEIGHT)
    }

    /// Set the display label of `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is invalid.
    pub fn set_label(&mut self, vertex: usize, label: impl Into<String>) -> Result<()> {
        self.check_vertex(vertex)?;
        self.labels[vertex] = label.into();
        Ok(())
    }

    /// Return the display label of `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is invalid.
    pub fn label(&self, vertex: usize) -> Result<&str> {
        self.check_vertex(vertex)?;
        Ok(&self.labels[vertex])
    }

    /// Return the outgoing edges of `vertex` as a fresh, independent list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is invalid.
    pub fn edges_from(&self, vertex: usize) -> Result<Vec<Edge>> {
        self.check_vertex(vertex)?;
        Ok(self.adjacency[vertex].clone())
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of edges, parallel edges and self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Iterate over all vertex indices.
    #[must_use]
    pub fn vertices(&self) -> Range<usize> {
        0..self.vertex_count()
    }

    /// Iterate over every edge as `(from, edge)`, in vertex order then
    /// insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(from, out)| out.iter().map(move |&edge| (from, edge)))
    }

    /// Build the transpose: every edge reversed, weights and labels kept.
    ///
    /// Edges are appended in source-vertex order, so the transpose's
    /// adjacency order is deterministic for a given graph.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut adjacency = vec![Vec::new(); self.vertex_count()];
        for (from, edge) in self.edges() {
            adjacency[edge.to].push(Edge {
                to: from,
                weight: edge.weight,
            });
        }

        Self {
            adjacency,
            labels: self.labels.clone(),
        }
    }

    /// Count edges ending at `vertex` by scanning every adjacency list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is invalid.
    pub fn in_degree(&self, vertex: usize) -> Result<usize> {
        self.check_vertex(vertex)?;
        Ok(self.edges().filter(|(_, edge)| edge.to == vertex).count())
    }

    /// Count edges leaving `vertex`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if `vertex` is invalid.
    pub fn out_degree(&self, vertex: usize) -> Result<usize> {
        self.check_vertex(vertex)?;
        Ok(self.adjacency[vertex].len())
    }

    /// Return `true` if at least one edge `from → to` exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] if either endpoint is invalid.
    pub fn has_edge(&self, from: usize, to: usize) -> Result<bool> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.adjacency[from].iter().any(|edge| edge.to == to))
    }

    /// Check that `vertex` names a vertex of this graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfRange`] unless `vertex < vertex_count()`.
    pub fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::OutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }

    /// Borrow the adjacency list of a vertex already known to be valid.
    ///
    /// Used by the traversal loops, which only ever follow edges stored in
    /// the graph.
    pub(crate) fn out_edges(&self, vertex: usize) -> &[Edge] {
        &self.adjacency[vertex]
    }

    /// Borrow the label of a vertex already known to be valid.
    pub(crate) fn label_of(&self, vertex: usize) -> &str {
        &self.labels[vertex]
    }
}

impl fmt::Display for DiGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "DiGraph{{vertices={}, edges={}}}",
            self.vertex_count(),
            self.edge_count()
        )?;

        for (vertex, out) in self.adjacency.iter().enumerate() {
            write!(f, "{}: ", self.labels[vertex])?;
            if out.is_empty() {
                write!(f, "∅")?;
            }
            for (i, edge) in out.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}(w={})", self.labels[edge.to], edge.weight)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn default_label(vertex: usize) -> String {
    format!("V{vertex}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
