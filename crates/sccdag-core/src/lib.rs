#![forbid(unsafe_code)]
//! sccdag-core library.
//!
//! Structural analysis of weighted directed graphs: strongly connected
//! components, condensation into a DAG, topological ordering and DAG
//! shortest/longest paths.
//!
//! # Conventions
//!
//! - **Errors**: Algorithms return [`Result`] with [`GraphError`]. Loading and
//!   configuration return `anyhow::Result` with file context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//! - **Two-phase objects**: analysis types borrow a graph, run once, then
//!   answer queries. Queries before the run fail with
//!   [`GraphError::IllegalState`].

pub mod config;
pub mod error;
pub mod graph;
pub mod load;
pub mod metrics;
pub mod paths;
pub mod pipeline;
pub mod samples;
pub mod topo;

pub use error::{ErrorCode, GraphError, Result};
