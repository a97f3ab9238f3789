use std::path::{Path, PathBuf};

use clap::Parser;
use twoport::analysis::SweepOptions;
use twoport::batch::{self, BatchOptions, Job};
use twoport::stats::Stats;

/// Frequency response of two-port ladder networks
#[derive(Parser)]
#[command(name = "twoport", version)]
struct Cli {
    /// Network description files (.net)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path (single input only; defaults to the input with .csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Evaluate frequency points on the calling thread
    #[arg(long)]
    sequential: bool,

    /// Write raw CSV without column alignment
    #[arg(long)]
    no_align: bool,

    /// Print performance stats to stderr
    #[arg(long)]
    stats: bool,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

fn jobs(cli: &Cli) -> Result<Vec<Job>, String> {
    if let Some(bad) = cli.inputs.iter().find(|p| !has_extension(p, "net")) {
        return Err(format!("input file must be a .net file: {}", bad.display()));
    }
    match &cli.output {
        Some(output) => {
            if cli.inputs.len() != 1 {
                return Err("--output can only be used with a single input".to_string());
            }
            if !has_extension(output, "csv") {
                return Err(format!("output file must be a .csv file: {}", output.display()));
            }
            Ok(vec![Job::new(&cli.inputs[0], output)])
        }
        None => Ok(cli.inputs.iter().map(Job::beside).collect()),
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let jobs = jobs(&cli).unwrap_or_else(|e| {
        eprintln!("Argument error: {}", e);
        std::process::exit(1);
    });

    let options = BatchOptions {
        sweep: SweepOptions {
            parallel: !cli.sequential,
        },
        align: !cli.no_align,
    };
    let mut stats = if cli.stats { Some(Stats::new()) } else { None };

    let outcomes = batch::analyze_all(&jobs, &options, stats.as_mut());

    let mut failed = false;
    for (job, outcome) in jobs.iter().zip(&outcomes) {
        if let Err(e) = outcome {
            eprintln!("Analysis error ({}): {}", job.input.display(), e);
            failed = true;
        }
    }

    if let Some(ref stats) = stats {
        stats.display();
    }

    if failed {
        std::process::exit(1);
    }
}
