//! GraphQL to graph-query compilation.
//!
//! [`Compiler`] resolves the invoked root field and dispatches:
//!
//! - root fields with `@graphQuery`/`@cypher` go through the override path
//! - mutations go through the naming-convention templates ([`naming`])
//! - everything else goes through the read path
//!
//! Each call builds its statement in a fresh context, so one compiler can
//! serve concurrent callers.

mod builder;
mod context;
mod literal;
mod mutation;
pub mod naming;
mod query;

use crate::config::Config;
use crate::schema::SchemaIndex;
use context::{CompileContext, limit_argument};
use cypherql_adapters::query::graphql::{self, Document};
use cypherql_common::utils::error::{CompileError, Error, Result};
use cypherql_common::{OperationKind, QueryLanguage};
use indexmap::IndexMap;
use naming::MutationConvention;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A compiled statement ready for the execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    /// Statement text.
    pub query: String,
    /// Target language.
    pub language: QueryLanguage,
    /// Bound parameters, namespaced by pattern variable.
    pub parameters: IndexMap<String, Value>,
    /// Stored key to GraphQL field name, for reshaping Gremlin results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_alias: Option<IndexMap<String, String>>,
}

impl CompiledQuery {
    pub(crate) fn cypher(query: String, parameters: IndexMap<String, Value>) -> Self {
        Self {
            query,
            language: QueryLanguage::OpenCypher,
            parameters,
            fields_alias: None,
        }
    }
}

/// Compiles GraphQL operations against one schema.
#[derive(Debug, Clone)]
pub struct Compiler {
    schema: Arc<SchemaIndex>,
    config: Config,
    convention: MutationConvention,
}

impl Compiler {
    /// Creates a compiler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(schema: Arc<SchemaIndex>, config: Config) -> Result<Self> {
        config.validate().map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            schema,
            config,
            convention: MutationConvention::new()?,
        })
    }

    /// The schema this compiler resolves against.
    pub fn schema(&self) -> &SchemaIndex {
        &self.schema
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compiles the first operation of `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation does not parse, names something the
    /// schema does not declare, or has a shape no template covers.
    pub fn compile(&self, source: &str, variables: &Map<String, Value>) -> Result<CompiledQuery> {
        self.compile_named(source, variables, None)
    }

    /// Compiles the named operation of `source`.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn compile_named(
        &self,
        source: &str,
        variables: &Map<String, Value>,
        operation_name: Option<&str>,
    ) -> Result<CompiledQuery> {
        let document = graphql::parse(source, variables)?;
        self.compile_document(&document, operation_name)
    }

    /// Compiles an operation of an already parsed document.
    ///
    /// # Errors
    ///
    /// See [`compile`](Self::compile).
    pub fn compile_document(&self, document: &Document, operation_name: Option<&str>) -> Result<CompiledQuery> {
        let operation_label = operation_name.unwrap_or("<anonymous>");
        let empty = || CompileError::EmptySelection {
            operation: operation_label.to_string(),
        };
        let operation = document.operation(operation_name).ok_or_else(empty)?;
        let field = operation.root_field().ok_or_else(empty)?;

        let mut root = self.schema.resolve_root(&field.name)?;
        root.limit = limit_argument(&field.arguments);
        if root.operation_kind != operation.kind {
            tracing::warn!(
                field = %root.name,
                declared = %root.operation_kind,
                requested = %operation.kind,
                "root field used from the other operation type"
            );
        }

        let ctx = CompileContext::new(&self.schema, &self.config, &operation.fragments);
        let compiled = match (&root.override_query, root.operation_kind) {
            (Some(fragment), _) => query::synthesize_override(ctx, &root, field, fragment)?,
            (None, OperationKind::Mutation) => mutation::synthesize(ctx, &self.convention, &root, field)?,
            (None, OperationKind::Query) => query::synthesize(ctx, &root, field)?,
        };

        tracing::debug!(
            field = %root.name,
            language = %compiled.language,
            parameters = compiled.parameters.len(),
            "compiled statement"
        );
        Ok(compiled)
    }
}
