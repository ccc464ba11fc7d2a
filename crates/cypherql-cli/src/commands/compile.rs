//! Compile command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use comfy_table::Cell;
use cypherql_engine::{Compiler, Config};
use serde_json::{Map, Value};

use crate::OutputFormat;
use crate::output::{self, Format};

/// Arguments of `cypherql compile`.
#[derive(Args)]
pub struct CompileArgs {
    /// Path to the annotated schema (SDL)
    #[arg(short, long)]
    schema: PathBuf,

    /// The GraphQL operation text
    #[arg(conflicts_with = "file")]
    operation: Option<String>,

    /// Read the operation from a file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Operation variables as a JSON object
    #[arg(long)]
    variables: Option<String>,

    /// Name of the operation to compile when the document has several
    #[arg(long)]
    operation_name: Option<String>,

    /// Emit override fields as CALL subqueries
    #[arg(long)]
    subquery_calls: bool,

    /// Maximum selection nesting depth
    #[arg(long)]
    max_depth: Option<usize>,
}

impl CompileArgs {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if self.subquery_calls {
            config = config.with_subquery_calls();
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        config
    }

    fn source(&self) -> Result<String> {
        match (&self.operation, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("failed to read operation {}", path.display())),
            (None, None) => bail!("pass the operation text or --file"),
        }
    }

    fn variables(&self) -> Result<Map<String, Value>> {
        match &self.variables {
            None => Ok(Map::new()),
            Some(text) => match serde_json::from_str(text).context("--variables is not valid JSON")? {
                Value::Object(map) => Ok(map),
                other => bail!("--variables must be a JSON object, got {other}"),
            },
        }
    }
}

/// Run the compile command.
pub fn run(args: &CompileArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let schema = super::load_schema(&args.schema)?;
    let compiler = Compiler::new(schema, args.config())?;
    let compiled = compiler.compile_named(
        &args.source()?,
        &args.variables()?,
        args.operation_name.as_deref(),
    )?;
    tracing::info!(
        language = %compiled.language,
        parameters = compiled.parameters.len(),
        "compiled"
    );

    let fmt: Format = format.into();
    match fmt {
        Format::Json => output::print_json(&compiled, quiet)?,
        Format::Table => {
            if quiet {
                return Ok(());
            }
            output::print_key_value_table(
                &[
                    ("Language", compiled.language.to_string()),
                    ("Parameters", compiled.parameters.len().to_string()),
                ],
                quiet,
            );
            output::status(&format!("\n{}\n", compiled.query), quiet);

            if !compiled.parameters.is_empty() {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Parameter", "Value"]);
                for (name, value) in &compiled.parameters {
                    table.add_row(vec![Cell::new(name), Cell::new(value.to_string())]);
                }
                println!("{table}");
            }

            if let Some(aliases) = &compiled.fields_alias {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Stored Key", "Field"]);
                for (stored, field) in aliases {
                    table.add_row(vec![Cell::new(stored), Cell::new(field)]);
                }
                println!("{table}");
            }
        }
    }

    Ok(())
}
