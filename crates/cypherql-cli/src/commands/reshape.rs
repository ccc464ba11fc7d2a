//! Reshape command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use cypherql_engine::{MalformedElementPolicy, Reshaper};
use indexmap::IndexMap;

use crate::OutputFormat;
use crate::output;

/// Arguments of `cypherql reshape`.
#[derive(Args)]
pub struct ReshapeArgs {
    /// Path to the Gremlin response (JSON)
    response: PathBuf,

    /// Stored key to field name map, as a JSON object
    #[arg(long, conflicts_with = "schema")]
    aliases: Option<String>,

    /// Derive the alias map from this schema (requires --type)
    #[arg(long, requires = "type_name")]
    schema: Option<PathBuf>,

    /// Return type whose alias map is used
    #[arg(long = "type")]
    type_name: Option<String>,

    /// Malformed list elements: skip or fail
    #[arg(long, default_value_t = MalformedElementPolicy::Skip)]
    on_malformed: MalformedElementPolicy,
}

impl ReshapeArgs {
    fn alias_map(&self) -> Result<IndexMap<String, String>> {
        if let Some(text) = &self.aliases {
            return serde_json::from_str(text).context("--aliases must be a JSON object of strings");
        }
        match (&self.schema, &self.type_name) {
            (Some(path), Some(type_name)) => Ok(super::load_schema(path)?.field_alias_map(type_name)?),
            (None, Some(_)) => bail!("--type needs --schema"),
            _ => Ok(IndexMap::new()),
        }
    }
}

/// Run the reshape command.
///
/// The shaped value is printed as JSON whatever the output format.
pub fn run(args: &ReshapeArgs, _format: OutputFormat, quiet: bool) -> Result<()> {
    let response = super::read_json(&args.response)?;
    let aliases = args.alias_map()?;
    let shaped = Reshaper::new(args.on_malformed).reshape(&response, &aliases)?;
    output::print_json(&shaped, quiet)
}
