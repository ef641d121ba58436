#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sccdag: strongly connected components, condensation and DAG paths",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `--json` and `SCCDAG_FORMAT`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyse graph datasets",
        long_about = "Find strongly connected components, build the condensation DAG, \
                      order it topologically and report shortest and critical paths.",
        after_help = "EXAMPLES:\n    # Analyse every *.json file under ./data (or the built-in samples)\n    sccdag analyze\n\n    # Analyse specific files, merging parallel edges by maximum weight\n    sccdag analyze graphs/a.json graphs/b.json --weight-policy max\n\n    # Emit machine-readable output\n    sccdag analyze data --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Print a built-in sample graph",
        long_about = "Print one of the built-in sample graphs as a JSON document.",
        after_help = "EXAMPLES:\n    # Save a sample and analyse it\n    sccdag sample cyclic > cyclic.json\n    sccdag analyze cyclic.json"
    )]
    Sample(cmd::sample::SampleArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sccdag=debug,sccdag_core=debug,info"
        } else {
            "sccdag=info,warn"
        })
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    debug!(?output, "output mode resolved");

    let result = match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, output),
        Commands::Sample(ref args) => cmd::sample::run_sample(args),
    };

    if let Err(err) = result {
        render_error(output, &CliError::from_anyhow(&err))?;
        std::process::exit(1);
    }
    Ok(())
}
