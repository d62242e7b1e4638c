//! Command-line interface for the selfassess questionnaire.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "selfassess",
    version,
    about = "Personal self-assessment questionnaire with trend reports"
)]
struct Cli {
    #[command(flatten)]
    paths: PathOverrides,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the file locations in the config.
#[derive(Args, Debug, Default)]
pub struct PathOverrides {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Question catalog file
    #[arg(long, global = true)]
    questions: Option<PathBuf>,

    /// Scoring key file
    #[arg(long, global = true)]
    scoring: Option<PathBuf>,

    /// Results history file
    #[arg(long, global = true)]
    results: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportKind {
    /// Answers at or below the low-score threshold, per category
    Low,
    /// Every answer, with low ones marked `*`
    Full,
    /// Both reports
    All,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer the questionnaire and append the session to the results file
    Ask {
        /// Answer randomly instead of prompting (demo mode)
        #[arg(long)]
        random: bool,

        /// Seed for --random
        #[arg(long, requires = "random")]
        seed: Option<u64>,
    },

    /// Print text reports for every stored session
    Report {
        /// Which report to print
        #[arg(long, value_enum, default_value = "all")]
        kind: ReportKind,
    },

    /// Write SVG trend and per-session charts
    Plot {
        /// Output directory (defaults to `output_dir` from the config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print per-session category totals
    Summary,

    /// Check the catalog and results history for problems
    Validate,

    /// Create starter config, question catalog and scoring key
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("selfassess=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask { random, seed } => commands::ask::execute(&cli.paths, random, seed),
        Commands::Report { kind } => commands::report::execute(&cli.paths, kind),
        Commands::Plot { output } => commands::plot::execute(&cli.paths, output),
        Commands::Summary => commands::summary::execute(&cli.paths),
        Commands::Validate => commands::validate::execute(&cli.paths),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
