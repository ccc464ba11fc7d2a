//! Execution boundary.
//!
//! Transport, signing and retries live behind [`QueryExecutor`]. The
//! resolver compiles, executes and shapes one operation, and never fails:
//! any error becomes `{"error": [{"message": ...}]}` so the host can always
//! answer with well-formed JSON.

use crate::compile::{CompiledQuery, Compiler};
use crate::reshape::Reshaper;
use cypherql_common::QueryLanguage;
use cypherql_common::utils::error::{Error, ReshapeError, Result};
use serde_json::{Map, Value, json};

/// An execution failure reported by the collaborator. Passed through opaquely.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExecutionError {
    /// Collaborator's message.
    pub message: String,
}

impl ExecutionError {
    /// Creates an execution error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Self {
        Error::Execution(e.message)
    }
}

/// Runs a compiled statement against the graph database.
///
/// openCypher statements answer `{"results": [row, ...]}`; Gremlin
/// statements answer a GraphSON envelope.
pub trait QueryExecutor {
    /// Executes one statement.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if the database cannot be reached or
    /// rejects the statement.
    fn execute(&self, query: &CompiledQuery) -> std::result::Result<Value, ExecutionError>;
}

impl<F> QueryExecutor for F
where
    F: Fn(&CompiledQuery) -> std::result::Result<Value, ExecutionError>,
{
    fn execute(&self, query: &CompiledQuery) -> std::result::Result<Value, ExecutionError> {
        self(query)
    }
}

/// Compiles, executes and shapes GraphQL operations.
pub struct GraphResolver<E> {
    compiler: Compiler,
    executor: E,
    reshaper: Reshaper,
}

impl<E: QueryExecutor> GraphResolver<E> {
    /// Creates a resolver. The reshape policy comes from the compiler's config.
    pub fn new(compiler: Compiler, executor: E) -> Self {
        let reshaper = Reshaper::new(compiler.config().reshape_policy);
        Self {
            compiler,
            executor,
            reshaper,
        }
    }

    /// The underlying compiler.
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Resolves one operation to GraphQL-shaped JSON, or an error payload.
    pub fn resolve(&self, source: &str, variables: &Map<String, Value>) -> Value {
        match self.try_resolve(source, variables) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "resolution failed");
                json!({"error": [{"message": e.to_string()}]})
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but surfaces the error.
    ///
    /// # Errors
    ///
    /// Returns compile, execution and reshape errors.
    pub fn try_resolve(&self, source: &str, variables: &Map<String, Value>) -> Result<Value> {
        let compiled = self.compiler.compile(source, variables)?;
        let response = self.executor.execute(&compiled)?;

        match compiled.language {
            QueryLanguage::OpenCypher => first_column(&response),
            QueryLanguage::Gremlin => {
                let aliases = compiled.fields_alias.unwrap_or_default();
                self.reshaper.reshape(&response, &aliases)
            }
        }
    }
}

/// First column of the first row, or `null` when there are no rows.
fn first_column(response: &Value) -> Result<Value> {
    let Some(rows) = response.get("results").and_then(Value::as_array) else {
        return Err(ReshapeError::UnexpectedEnvelope(
            "openCypher response has no 'results' array".to_string(),
        )
        .into());
    };
    Ok(rows
        .first()
        .and_then(Value::as_object)
        .and_then(|row| row.values().next())
        .cloned()
        .unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column() {
        let response = json!({"results": [{"x": {"name": "A"}, "y": 1}]});
        assert_eq!(first_column(&response).unwrap(), json!({"name": "A"}));
        assert_eq!(first_column(&json!({"results": []})).unwrap(), Value::Null);
        assert!(first_column(&json!({"rows": []})).is_err());
    }

    #[test]
    fn test_execution_error_converts() {
        let err: Error = ExecutionError::new("timeout").into();
        assert_eq!(err, Error::Execution("timeout".to_string()));
        assert_eq!(err.to_string(), "timeout");
    }
}
