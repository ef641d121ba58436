//! Graph store, SCC decomposition and condensation.
//!
//! # Overview
//!
//! This module holds the weighted directed graph every analysis stage reads
//! from, plus the first two stages of the pipeline:
//!
//! ## Pipeline
//!
//! ```text
//! DiGraph (may contain cycles)
//!        ↓  scc::Kosaraju::find_sccs()
//! ComponentPartition (vertex → component)
//!        ↓  condensation::CondensationBuilder::build()
//! DiGraph (one vertex per SCC, acyclic)
//!        ↓  crate::topo / crate::paths
//! topological order, distances, critical path
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use sccdag_core::graph::{CondensationBuilder, DiGraph, Kosaraju};
//!
//! let mut g = DiGraph::new(3)?;
//! g.add_edge(0, 1, 2)?;
//! g.add_edge(1, 0, 1)?;
//! g.add_edge(1, 2, 4)?;
//!
//! let mut scc = Kosaraju::new(&g);
//! let partition = scc.find_sccs().clone();
//! assert_eq!(partition.component_count(), 2);
//!
//! let mut builder = CondensationBuilder::new(&g, &partition)?;
//! let dag = builder.build()?;
//! assert_eq!(dag.edge_count(), 1);
//! assert!(builder.is_acyclic()?);
//! # Ok::<(), sccdag_core::GraphError>(())
//! ```

pub mod condensation;
pub mod cycles;
pub mod scc;
pub mod store;

// Re-export primary types at module level for convenience.
pub use condensation::{CondensationBuilder, CondensationStats, WeightPolicy};
pub use cycles::{find_cycle, has_cycle};
pub use scc::{ComponentPartition, Kosaraju};
pub use store::{DiGraph, Edge};
