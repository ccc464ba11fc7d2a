//! cypherql CLI - compile GraphQL operations to graph queries.
//!
//! A developer tool for inspecting what the compiler does with a schema:
//! compile operations, reshape captured Gremlin responses, and list the
//! descriptors the schema resolves to. It never talks to a database.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// GraphQL to openCypher/Gremlin compiler.
///
/// Compiles operations against an annotated schema and prints the
/// resulting statement and parameters.
#[derive(Parser)]
#[command(name = "cypherql")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile a GraphQL operation into an openCypher or Gremlin statement
    Compile(commands::compile::CompileArgs),

    /// Reshape a captured Gremlin response into GraphQL JSON
    Reshape(commands::reshape::ReshapeArgs),

    /// List the types and field descriptors of a schema
    Schema {
        /// Path to the annotated schema (SDL)
        schema: PathBuf,

        /// Only show this type
        #[arg(long = "type")]
        type_name: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let result = match cli.command {
        Commands::Compile(args) => commands::compile::run(&args, cli.format, cli.quiet),
        Commands::Reshape(args) => commands::reshape::run(&args, cli.format, cli.quiet),
        Commands::Schema { schema, type_name } => {
            commands::schema::run(&schema, type_name.as_deref(), cli.format, cli.quiet)
        }
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
