//! Marq Command-Line Interface
//!
//! Canonicalize circuit text, trace Pauli markers through a circuit, and grade
//! marker-placement answers.
//!
//! ```text
//! marq canon circuit.stim --rotate 2 --compact
//! marq propagate circuit.stim --marker 0 --layer 4
//! marq grade --config exercise.yaml --answer answer.stim
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use marq_grade::AnswerParseFailure;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{canon, gates, grade, propagate, version};

/// Marq - stabilizer circuit canonicalization, propagation and grading
#[derive(Parser)]
#[command(name = "marq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical text of a circuit
    Canon {
        /// Circuit file (full or compact text)
        input: String,

        /// Rotate by 45 degrees and rectify this many times first
        #[arg(short, long, default_value = "0")]
        rotate: usize,

        /// Print the compact shorthand
        #[arg(short, long, conflicts_with = "export")]
        compact: bool,

        /// Hide marker lines behind `#!pragma` for Stim
        #[arg(short, long)]
        export: bool,
    },

    /// Propagate markers and print the frame after each layer
    Propagate {
        /// Circuit file
        input: String,

        /// Marker index to follow
        #[arg(short, long, default_value = "0")]
        marker: u32,

        /// Only print this layer
        #[arg(short, long)]
        layer: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Grade an answer against an exercise configuration
    Grade {
        /// Exercise file (JSON, or YAML by extension)
        #[arg(short, long)]
        config: String,

        /// Answer circuit file (defaults to the `answer` field of the config)
        #[arg(short, long)]
        answer: Option<String>,

        /// What to do with an unparseable answer (propagate, reject)
        #[arg(long, env = "MARQ_ANSWER_PARSE", default_value = "propagate")]
        answer_parse: AnswerParseFailure,

        /// Report unparseable answers as incorrect instead of failing
        #[arg(long)]
        reject_unparseable: bool,
    },

    /// List the gate table
    Gates,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Canon {
            input,
            rotate,
            compact,
            export,
        } => canon::execute(&input, rotate, compact, export).map(|()| 0),

        Commands::Propagate {
            input,
            marker,
            layer,
            json,
        } => propagate::execute(&input, marker, layer, json).map(|()| 0),

        Commands::Grade {
            config,
            answer,
            answer_parse,
            reject_unparseable,
        } => {
            let policy = if reject_unparseable {
                AnswerParseFailure::Reject
            } else {
                answer_parse
            };
            grade::execute(&config, answer.as_deref(), policy)
        }

        Commands::Gates => {
            gates::execute();
            Ok(0)
        }

        Commands::Version => {
            version::execute();
            Ok(0)
        }
    };

    // Handle errors
    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}
