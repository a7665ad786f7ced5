//! yamlinc CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::resolve::OutputFormat;

#[derive(Parser)]
#[command(name = "yamlinc")]
#[command(version)]
#[command(about = "Resolve !include directives in YAML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a document and print the result
    Resolve {
        /// Document to resolve
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Maximum include depth
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Resolve a document and write the result to a file
    Transform {
        /// Document to resolve
        input: PathBuf,

        /// File to write (created or overwritten)
        output: PathBuf,

        /// Maximum include depth
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so resolved output can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yamlinc=info,yamlinc_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            input,
            format,
            max_depth,
        } => commands::resolve::execute(commands::resolve::ResolveArgs {
            input,
            format,
            max_depth,
        }),
        Commands::Transform {
            input,
            output,
            max_depth,
        } => commands::transform::execute(commands::transform::TransformArgs {
            input,
            output,
            max_depth,
        }),
    }
}
