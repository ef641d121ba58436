//! `sccdag analyze`: run the full analysis over one or more datasets.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use sccdag_core::config::{AnalysisConfig, load_config};
use sccdag_core::graph::WeightPolicy;
use sccdag_core::load::{Dataset, dataset_name, load_dir, load_graph};
use sccdag_core::metrics::MetricsSnapshot;
use sccdag_core::pipeline::{AnalysisReport, SummaryRow, analyze};
use sccdag_core::samples;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Arguments for `sccdag analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Dataset files or directories of `*.json` files. Defaults to the
    /// configured data directory.
    pub paths: Vec<PathBuf>,

    /// Config file (default: ./sccdag.toml when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How parallel edges between two components are merged.
    #[arg(long, value_parser = parse_policy)]
    pub weight_policy: Option<WeightPolicy>,

    /// Source component for the shortest-path report.
    #[arg(long)]
    pub source: Option<usize>,

    /// Skip the critical path search.
    #[arg(long)]
    pub no_critical_path: bool,
}

fn parse_policy(value: &str) -> Result<WeightPolicy, String> {
    value.parse().map_err(|e: sccdag_core::GraphError| e.to_string())
}

impl AnalyzeArgs {
    fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(policy) = self.weight_policy {
            config.condensation.weight_policy = policy;
        }
        if let Some(source) = self.source {
            config.paths.source = source;
        }
        if self.no_critical_path {
            config.paths.critical_path = false;
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    /// `true` when no dataset loaded and the built-in samples were used.
    builtin_samples: bool,
    datasets: Vec<AnalysisReport>,
    summary: Vec<SummaryRow>,
}

/// Execute `sccdag analyze`.
pub fn run_analyze(args: &AnalyzeArgs, output: OutputMode) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    let mut datasets = collect_datasets(&args.paths, &config);
    let builtin_samples = datasets.is_empty();
    if builtin_samples {
        info!("no datasets found, using built-in samples");
        datasets = samples::all()?;
    }

    let mut reports = Vec::with_capacity(datasets.len());
    for dataset in &datasets {
        let report = analyze(&dataset.name, &dataset.graph, &config)
            .with_context(|| format!("Failed to analyse {}", dataset.name))?;
        reports.push(report);
    }

    let payload = AnalyzeOutput {
        builtin_samples,
        summary: reports.iter().map(AnalysisReport::summary_row).collect(),
        datasets: reports,
    };

    render_mode(output, &payload, render_text, render_pretty)
}

/// Load every dataset named by `paths`, or the configured data directory
/// when `paths` is empty. Anything that fails to load is logged and skipped.
fn collect_datasets(paths: &[PathBuf], config: &AnalysisConfig) -> Vec<Dataset> {
    if paths.is_empty() {
        let dir = &config.report.data_dir;
        if !dir.is_dir() {
            return Vec::new();
        }
        return load_directory(dir);
    }

    let mut datasets = Vec::new();
    for path in paths {
        if path.is_dir() {
            datasets.extend(load_directory(path));
            continue;
        }
        match load_graph(path) {
            Ok(graph) => datasets.push(Dataset::new(dataset_name(path), graph)),
            Err(err) => warn!(path = %path.display(), "skipping dataset: {err:#}"),
        }
    }
    datasets
}

fn load_directory(dir: &Path) -> Vec<Dataset> {
    load_dir(dir).unwrap_or_else(|err| {
        warn!(dir = %dir.display(), "skipping directory: {err:#}");
        Vec::new()
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn arrow_join(labels: &[String]) -> String {
    labels.join(" → ")
}

fn counter(metrics: &MetricsSnapshot, name: &str) -> u64 {
    metrics.counters.get(name).copied().unwrap_or(0)
}

fn render_summary_table(rows: &[SummaryRow], w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "{:<20} {:>10} {:>10} {:>12} {:>12}",
        "Dataset", "Vertices", "Edges", "SCCs", "DAG?"
    )?;
    pretty_rule(w)?;
    for row in rows {
        writeln!(
            w,
            "{:<20} {:>10} {:>10} {:>12} {:>12}",
            row.dataset,
            row.vertices,
            row.edges,
            row.sccs,
            yes_no(row.is_dag)
        )?;
    }
    Ok(())
}

fn render_pretty(payload: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    if payload.builtin_samples {
        writeln!(w, "No datasets found. Using built-in sample graphs.")?;
        writeln!(w)?;
    }

    for report in &payload.datasets {
        render_report_pretty(report, w)?;
        writeln!(w)?;
    }

    pretty_section(w, "Summary")?;
    render_summary_table(&payload.summary, w)
}

fn render_report_pretty(report: &AnalysisReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Dataset: {}", report.name))?;
    pretty_kv(w, "vertices", report.vertices.to_string())?;
    pretty_kv(w, "edges", report.edges.to_string())?;
    match &report.cycle {
        Some(cycle) => pretty_kv(w, "acyclic", format!("no (cycle: {})", arrow_join(cycle)))?,
        None => pretty_kv(w, "acyclic", "yes")?,
    }

    writeln!(w)?;
    writeln!(w, "Strongly connected components ({})", report.components.len())?;
    for component in &report.components {
        writeln!(
            w,
            "  SCC-{} [size={}]: {}",
            component.id,
            component.size,
            component.members.join(", ")
        )?;
    }
    writeln!(w, "  Performance: {}", report.scc_metrics.summary)?;
    writeln!(
        w,
        "  DFS visits: {} | Edge explorations: {}",
        counter(&report.scc_metrics, "dfs_visits"),
        counter(&report.scc_metrics, "edge_explorations")
    )?;

    let cond = &report.condensation;
    writeln!(w)?;
    writeln!(w, "Condensation (weight policy: {})", cond.policy)?;
    writeln!(
        w,
        "  Components: {} | Edges: {} | Acyclic: {} | Compression: {:.2}%",
        cond.stats.condensation_vertices,
        cond.stats.condensation_edges,
        yes_no(cond.stats.is_acyclic),
        cond.stats.compression_ratio
    )?;

    writeln!(w)?;
    writeln!(w, "Topological order")?;
    for sort in &report.sorts {
        if sort.is_dag {
            writeln!(w, "  {}: {}", sort.strategy, arrow_join(&sort.order))?;
            writeln!(w, "    Performance: {}", sort.metrics.summary)?;
        } else {
            writeln!(w, "  {}: CYCLE DETECTED", sort.strategy)?;
        }
    }

    if let Some(shortest) = &report.shortest_paths {
        writeln!(w)?;
        writeln!(w, "Shortest paths from {}", shortest.source_label)?;
        for target in &shortest.targets {
            writeln!(
                w,
                "  To {}: {} | Path: {}",
                target.label,
                target.distance,
                arrow_join(&target.path)
            )?;
        }
        writeln!(w, "  Performance: {}", shortest.metrics.summary)?;
    }

    if let Some(critical) = &report.critical_path {
        writeln!(w)?;
        writeln!(w, "Critical path")?;
        if critical.path.is_empty() {
            writeln!(w, "  No critical path found")?;
        } else {
            writeln!(w, "  Path: {}", arrow_join(&critical.path))?;
            writeln!(w, "  Length: {}", critical.length)?;
        }
    }

    Ok(())
}

fn render_text(payload: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    for report in &payload.datasets {
        writeln!(
            w,
            "dataset={} vertices={} edges={} sccs={} dag={}",
            report.name,
            report.vertices,
            report.edges,
            report.components.len(),
            yes_no(report.is_dag())
        )?;
        for sort in &report.sorts {
            writeln!(w, "  order.{}={}", sort.strategy, sort.order.join(","))?;
        }
        if let Some(critical) = &report.critical_path {
            writeln!(
                w,
                "  critical_path={} length={}",
                critical.path.join(","),
                critical.length
            )?;
        }
    }
    writeln!(w)?;
    render_summary_table(&payload.summary, w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = AnalyzeArgs {
            weight_policy: Some(WeightPolicy::Sum),
            source: Some(4),
            no_critical_path: true,
            ..AnalyzeArgs::default()
        };
        let mut config = AnalysisConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.condensation.weight_policy, WeightPolicy::Sum);
        assert_eq!(config.paths.source, 4);
        assert!(!config.paths.critical_path);
    }

    #[test]
    fn missing_data_dir_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AnalysisConfig::default();
        config.report.data_dir = dir.path().join("absent");
        assert!(collect_datasets(&[], &config).is_empty());
    }

    #[test]
    fn explicit_files_and_dirs_are_combined() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("more");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("one.json"), r#"{"vertices": 1}"#).unwrap();
        std::fs::write(nested.join("two.json"), r#"{"vertices": 2}"#).unwrap();
        std::fs::write(nested.join("bad.json"), "[]").unwrap();

        let datasets = collect_datasets(
            &[dir.path().join("one.json"), nested, dir.path().join("nope.json")],
            &AnalysisConfig::default(),
        );
        let names: Vec<&str> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn pretty_report_mentions_every_stage() {
        let graph = samples::cyclic().unwrap();
        let report = analyze("cyclic", &graph, &AnalysisConfig::default()).unwrap();
        let payload = AnalyzeOutput {
            builtin_samples: false,
            summary: vec![report.summary_row()],
            datasets: vec![report],
        };

        let mut buf = Vec::new();
        render_pretty(&payload, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Dataset: cyclic"));
        assert!(text.contains("no (cycle: A → B → C → A)"));
        assert!(text.contains("Compression: 50.00%"));
        assert!(text.contains("Critical path"));
        assert!(text.contains("Summary"));
    }

    #[test]
    fn pretty_report_lists_scc_traversal_counters() {
        let graph = samples::cyclic().unwrap();
        let report = analyze("cyclic", &graph, &AnalysisConfig::default()).unwrap();
        let visits = counter(&report.scc_metrics, "dfs_visits");
        let explored = counter(&report.scc_metrics, "edge_explorations");
        assert!(visits > 0);

        let mut buf = Vec::new();
        render_report_pretty(&report, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(&format!(
            "DFS visits: {visits} | Edge explorations: {explored}"
        )));
    }
}
