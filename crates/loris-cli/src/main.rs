#![doc = include_str!("../README.md")]

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::learn::{parse_algorithm, run_learn_command, LearnOptions};
use commands::parse_output_format;

#[derive(Parser)]
#[command(name = "loris")]
#[command(about = "Conjunctive invariant learner for Horn-clause program verification")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one learning round and persist the retained predicate sets
    Learn {
        /// File stem of the round inputs (<stem>.attributes, .data, .horn,
        /// .intervals, .status)
        stem: PathBuf,

        /// Learning algorithm: horndini | sorcar | sorcar-first |
        /// sorcar-greedy | sorcar-minimal | winnow | perceptron
        #[arg(long, default_value = "sorcar")]
        algorithm: String,

        /// Start from an empty retained set instead of reading <stem>.R
        #[arg(long, default_value_t = false)]
        reset_retained: bool,

        /// Output the maximal conjunction unreduced in the first round
        #[arg(long, default_value_t = false)]
        horndini_first: bool,

        /// Output the maximal conjunction unreduced on odd rounds
        #[arg(long, default_value_t = false)]
        alternate: bool,

        /// Classifiers only: label unclassified datapoints from a reduced
        /// retained set instead of the maximal conjunction
        #[arg(long, default_value_t = false)]
        sorcar_ice: bool,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,

        /// Optional path to write the JSON round report
        #[arg(long)]
        report_out: Option<PathBuf>,
    },

    /// Pretty-print the persisted retained sets with attribute names
    Show {
        /// File stem whose <stem>.R and <stem>.attributes to read
        stem: PathBuf,
    },

    /// Re-check the persisted retained sets against the corpus
    Check {
        /// File stem of the round inputs and <stem>.R
        stem: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Learn {
            stem,
            algorithm,
            reset_retained,
            horndini_first,
            alternate,
            sorcar_ice,
            format,
            report_out,
        } => {
            let options = LearnOptions {
                algorithm: parse_algorithm(&algorithm)?,
                reset_retained,
                horndini_first,
                alternate,
                sorcar_ice,
            };
            run_learn_command(&stem, &options, parse_output_format(&format)?, report_out)
        }
        Commands::Show { stem } => commands::show::run_show_command(&stem),
        Commands::Check { stem } => commands::check::run_check_command(&stem),
    }
}
