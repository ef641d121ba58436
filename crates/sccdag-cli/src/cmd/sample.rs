//! `sccdag sample`: print a built-in sample graph as a JSON document.

use anyhow::Context;
use clap::{Args, ValueEnum};
use sccdag_core::load::to_json_string;
use sccdag_core::samples;

/// Built-in graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleName {
    /// Six-task pipeline with two parallel branches.
    SimpleDag,
    /// Three-vertex cycle with one exit edge.
    Cyclic,
    /// Ten-vertex layered DAG.
    ComplexDag,
}

impl SampleName {
    const fn key(self) -> &'static str {
        match self {
            Self::SimpleDag => "simple-dag",
            Self::Cyclic => "cyclic",
            Self::ComplexDag => "complex-dag",
        }
    }
}

/// Arguments for `sccdag sample`.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Which sample to print.
    #[arg(value_enum)]
    pub name: SampleName,
}

/// Execute `sccdag sample`. Output is always JSON so it can be saved and
/// fed back to `sccdag analyze`.
pub fn run_sample(args: &SampleArgs) -> anyhow::Result<()> {
    let graph = samples::by_name(args.name.key())?
        .with_context(|| format!("unknown sample '{}'", args.name.key()))?;
    println!("{}", to_json_string(&graph)?);
    Ok(())
}
