//! Built-in sample graphs, used when no dataset is available and as test
//! fixtures.

use crate::error::Result;
use crate::graph::DiGraph;
use crate::load::Dataset;

/// Names accepted by [`by_name`], in [`all`] order.
pub const SAMPLE_NAMES: [&str; 3] = ["simple-dag", "cyclic", "complex-dag"];

fn build(labels: &[&str], edges: &[(usize, usize, i64)]) -> Result<DiGraph> {
    let mut graph = DiGraph::new(labels.len())?;
    for (vertex, label) in labels.iter().enumerate() {
        graph.set_label(vertex, *label)?;
    }
    for &(from, to, weight) in edges {
        graph.add_edge(from, to, weight)?;
    }
    Ok(graph)
}

/// Six-task pipeline `Start → … → End` with two parallel branches.
///
/// # Errors
///
/// Never fails for the fixed data; the `Result` comes from graph building.
pub fn simple_dag() -> Result<DiGraph> {
    build(
        &["Start", "Task1", "Task2", "Task3", "Task4", "End"],
        &[(0, 1, 2), (0, 2, 3), (1, 3, 4), (2, 3, 1), (3, 4, 2), (4, 5, 3)],
    )
}

/// Four vertices where `A → B → C → A` forms a cycle and `C → D` leaves it.
///
/// # Errors
///
/// Never fails for the fixed data; the `Result` comes from graph building.
pub fn cyclic() -> Result<DiGraph> {
    build(
        &["A", "B", "C", "D"],
        &[(0, 1, 2), (1, 2, 3), (2, 0, 1), (2, 3, 2)],
    )
}

/// Ten-vertex layered DAG `N0 … N9`.
///
/// # Errors
///
/// Never fails for the fixed data; the `Result` comes from graph building.
pub fn complex_dag() -> Result<DiGraph> {
    let labels: Vec<String> = (0..10).map(|i| format!("N{i}")).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    build(
        &labels,
        &[
            (0, 1, 3),
            (0, 2, 2),
            (1, 3, 4),
            (1, 4, 5),
            (2, 4, 2),
            (2, 5, 3),
            (3, 6, 2),
            (4, 6, 1),
            (4, 7, 4),
            (5, 7, 2),
            (6, 8, 3),
            (7, 8, 2),
            (7, 9, 5),
            (8, 9, 1),
        ],
    )
}

/// The sample called `name`, or `None` for an unknown name.
///
/// # Errors
///
/// Propagates graph building errors.
pub fn by_name(name: &str) -> Result<Option<DiGraph>> {
    match name {
        "simple-dag" => simple_dag().map(Some),
        "cyclic" => cyclic().map(Some),
        "complex-dag" => complex_dag().map(Some),
        _ => Ok(None),
    }
}

/// Every sample as a named dataset.
///
/// # Errors
///
/// Propagates graph building errors.
pub fn all() -> Result<Vec<Dataset>> {
    SAMPLE_NAMES
        .iter()
        .filter_map(|&name| by_name(name).transpose().map(|g| g.map(|g| Dataset::new(name, g))))
        .collect()
}
