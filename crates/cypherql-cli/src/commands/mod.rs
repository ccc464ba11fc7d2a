//! CLI command implementations.

pub mod compile;
pub mod reshape;
pub mod schema;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cypherql_engine::SchemaIndex;

/// Reads and indexes an annotated schema file.
pub fn load_schema(path: &Path) -> Result<Arc<SchemaIndex>> {
    let sdl = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let index = SchemaIndex::parse(&sdl)
        .with_context(|| format!("invalid schema {}", path.display()))?;
    Ok(Arc::new(index))
}

/// Reads a JSON document from a file.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
