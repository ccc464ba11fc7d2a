//! Per-compile context and selection-set recursion.

use super::builder::{Closing, StatementBuilder};
use super::literal::{cypher_literal, raw_text};
use crate::config::Config;
use crate::schema::{ArgDescriptor, FieldDescriptor, FieldKind, SchemaIndex};
use cypherql_adapters::query::cypher::Fragment;
use cypherql_adapters::query::graphql::{Field, FragmentDefinition, Selection, SelectionSet};
use cypherql_adapters::query::template::substitute_placeholders;
use cypherql_common::Direction;
use cypherql_common::utils::error::{CompileError, Result, SchemaError};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;

/// Everything one compile owns or borrows. Created fresh per call.
pub(crate) struct CompileContext<'a> {
    pub(crate) schema: &'a SchemaIndex,
    pub(crate) config: &'a Config,
    fragments: &'a IndexMap<String, FragmentDefinition>,
    pub(crate) builder: StatementBuilder,
}

/// Inline pattern properties and identity conditions for one pattern variable.
#[derive(Debug, Default)]
pub(crate) struct Filter {
    /// `{k: $p, ...}` or empty.
    pub(crate) properties: String,
    /// ` WHERE ID(v) = $p` or empty.
    pub(crate) where_id: String,
}

impl<'a> CompileContext<'a> {
    pub(crate) fn new(
        schema: &'a SchemaIndex,
        config: &'a Config,
        fragments: &'a IndexMap<String, FragmentDefinition>,
    ) -> Self {
        Self {
            schema,
            config,
            fragments,
            builder: StatementBuilder::new(),
        }
    }

    /// Projects every selected field of `type_name` into `frame`, recursing
    /// into nested object fields.
    pub(crate) fn project_selection(
        &mut self,
        type_name: &str,
        path: &str,
        frame: usize,
        selection: &SelectionSet,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(CompileError::DepthExceeded {
                max_depth: self.config.max_depth,
            }
            .into());
        }

        for field in self.flatten(type_name, selection)? {
            if field.name == "__typename" {
                let name = cypher_literal(&Value::String(type_name.to_string()));
                self.builder.project(frame, field.response_key(), &name);
                continue;
            }

            let descriptor = self.schema.resolve_field(type_name, &field.name)?;
            if descriptor.is_schema_type {
                self.project_object(&descriptor, &field, path, frame, depth)?;
            } else {
                let expr = self.scalar_projection(&descriptor, &field, path, frame)?;
                self.builder.project(frame, field.response_key(), &expr);
            }
        }
        Ok(())
    }

    /// Fields of a selection set with fragment spreads and matching inline
    /// fragments expanded in place.
    ///
    /// Fields sharing a response key are merged into the first occurrence,
    /// their sub-selections concatenated.
    fn flatten(&self, type_name: &str, selection: &SelectionSet) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        self.flatten_into(type_name, selection, &mut fields)?;

        let mut merged: IndexMap<String, Field> = IndexMap::with_capacity(fields.len());
        for field in fields {
            match merged.entry(field.response_key().to_string()) {
                Entry::Occupied(mut first) => first
                    .get_mut()
                    .selection_set
                    .selections
                    .extend(field.selection_set.selections),
                Entry::Vacant(slot) => {
                    slot.insert(field);
                }
            }
        }
        Ok(merged.into_values().collect())
    }

    fn flatten_into(&self, type_name: &str, selection: &SelectionSet, out: &mut Vec<Field>) -> Result<()> {
        for item in &selection.selections {
            match item {
                Selection::Field(field) => out.push(field.clone()),
                Selection::FragmentSpread(name) => {
                    let fragment = self.fragments.get(name).ok_or_else(|| {
                        CompileError::UnknownFragment { name: name.clone() }
                    })?;
                    if fragment.type_condition == type_name {
                        self.flatten_into(type_name, &fragment.selection_set, out)?;
                    }
                }
                Selection::InlineFragment(inline) => {
                    if inline.type_condition.as_deref().is_none_or(|t| t == type_name) {
                        self.flatten_into(type_name, &inline.selection_set, out)?;
                    } else {
                        tracing::trace!(type_name, "inline fragment on another type skipped");
                    }
                }
            }
        }
        Ok(())
    }

    fn scalar_projection(
        &mut self,
        descriptor: &FieldDescriptor,
        field: &Field,
        path: &str,
        frame: usize,
    ) -> Result<String> {
        match &descriptor.kind {
            FieldKind::Identity => Ok(format!("ID({path})")),
            FieldKind::Plain | FieldKind::Relationship { .. } => {
                Ok(format!("{path}.`{}`", descriptor.alias))
            }
            FieldKind::Overridden { fragment } => {
                self.scalar_override(fragment, field, path, frame)
            }
        }
    }

    /// Inlines a scalar override fragment and returns the field's projection.
    fn scalar_override(
        &mut self,
        fragment: &str,
        field: &Field,
        path: &str,
        frame: usize,
    ) -> Result<String> {
        let prefix = format!("{path}_{}", field.response_key());
        let fragment = self.parse_fragment(fragment, field)?;
        let (body, tail) = split_return(&fragment, field)?;

        let bound = fragment.bound_variables();
        let rename = |v: &str| {
            if v == "this" {
                Some(path.to_string())
            } else if bound.iter().any(|b| b == v) {
                Some(format!("{prefix}_{v}"))
            } else {
                None
            }
        };
        let body = body.rename_variables(rename);
        let tail = tail.rename_variables(rename);

        if self.config.subquery_calls {
            let inner = if body.is_empty() {
                String::new()
            } else {
                format!("{body} ")
            };
            self.builder
                .push_match(format!("CALL {{ WITH {path} {inner}RETURN {tail} AS {prefix} }}"));
            self.builder.bind_scope(&prefix);
            self.builder.thread(&prefix, frame, None);
            return Ok(prefix);
        }

        if !body.is_empty() {
            let clause = self.optional_clause(&body);
            self.builder.push_match(clause);
        }

        if tail.is_aggregate() {
            let scope = self.builder.scope().join(", ");
            self.builder
                .push_match(format!("WITH {scope}, {tail} AS {prefix}"));
            self.builder.bind_scope(&prefix);
            self.builder.thread(&prefix, frame, None);
            return Ok(prefix);
        }

        for var in &bound {
            let renamed = format!("{prefix}_{var}");
            if tail.mentions(&renamed) {
                self.builder.bind_scope(&renamed);
                self.builder.thread(&renamed, frame, None);
            }
        }
        Ok(tail.to_string())
    }

    fn project_object(
        &mut self,
        descriptor: &FieldDescriptor,
        field: &Field,
        parent: &str,
        parent_frame: usize,
        depth: usize,
    ) -> Result<()> {
        let child = format!("{parent}_{}", field.response_key());
        let alias = self.schema.type_alias(&descriptor.graph_type)?;

        match &descriptor.kind {
            FieldKind::Relationship {
                edge_type,
                direction,
            } => {
                let filter = self.filter(
                    &child,
                    &descriptor.graph_type,
                    &descriptor.declared_args,
                    &field.arguments,
                )?;
                let edge = format!("{child}_{edge_type}");
                let node = format!("({child}:`{alias}`{})", filter.properties);
                let pattern = match direction {
                    Direction::Out => format!("({parent})-[{edge}:{edge_type}]->{node}"),
                    Direction::In => format!("({parent})<-[{edge}:{edge_type}]-{node}"),
                };
                self.builder
                    .push_match(format!("OPTIONAL MATCH {pattern}{}", filter.where_id));
            }
            FieldKind::Overridden { fragment } => {
                self.object_override(fragment, field, parent, &child)?;
            }
            FieldKind::Plain | FieldKind::Identity => {
                return Err(SchemaError::InvalidDirective {
                    directive: "relationship".to_string(),
                    location: descriptor.name.clone(),
                    message: "object-typed field needs @relationship or @graphQuery".to_string(),
                }
                .into());
            }
        }

        let closing = if descriptor.is_array {
            Closing::Array {
                limit: limit_argument(&field.arguments),
            }
        } else {
            Closing::Object
        };
        let child_frame = self.builder.open_frame(&child, closing);
        self.project_selection(
            &descriptor.graph_type,
            &child,
            child_frame,
            &field.selection_set,
            depth + 1,
        )?;
        self.builder.project(parent_frame, field.response_key(), &child);
        self.builder.thread(&child, parent_frame, Some(child_frame));
        Ok(())
    }

    /// Inlines an object override fragment whose `RETURN` names the child node.
    fn object_override(&mut self, fragment: &str, field: &Field, parent: &str, child: &str) -> Result<()> {
        let fragment = self.parse_fragment(fragment, field)?;
        let (body, tail) = split_return(&fragment, field)?;
        let Some(returned) = tail.as_variable().map(str::to_string) else {
            return Err(CompileError::InvalidFragment {
                field_name: field.name.clone(),
                message: format!("an object field must return a single node variable, not '{tail}'"),
            }
            .into());
        };

        let bound = fragment.bound_variables();
        let body = body.rename_variables(|v| {
            if v == "this" {
                Some(parent.to_string())
            } else if v == returned {
                Some(child.to_string())
            } else if bound.iter().any(|b| b == v) {
                Some(format!("{child}_{v}"))
            } else {
                None
            }
        });
        let clause = self.optional_clause(&body);
        self.builder.push_match(clause);
        Ok(())
    }

    /// Substitutes the field's arguments into a fragment and lexes it.
    pub(crate) fn parse_fragment(&self, fragment: &str, field: &Field) -> Result<Fragment> {
        let text = substitute_placeholders(fragment, |name| field.argument(name).map(raw_text));
        Fragment::parse(&text).map_err(|e| {
            CompileError::InvalidFragment {
                field_name: field.name.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn optional_clause(&self, body: &Fragment) -> String {
        match body.leading_keyword() {
            Some(kw) if self.config.optional_override_matches && kw.eq_ignore_ascii_case("MATCH") => {
                format!("OPTIONAL {body}")
            }
            _ => body.to_string(),
        }
    }

    /// Turns field arguments into pattern properties and identity conditions.
    ///
    /// `filter` input objects are flattened; `options` and `limit` are left
    /// to the caller; `null` values are ignored.
    pub(crate) fn filter(
        &mut self,
        var: &str,
        type_name: &str,
        declared: &[ArgDescriptor],
        arguments: &IndexMap<String, Value>,
    ) -> Result<Filter> {
        let identity = self.schema.identity_field(type_name).map(str::to_string);
        let mut properties = Vec::new();
        let mut ids = Vec::new();

        let mut add = |builder: &mut StatementBuilder, name: &str, arg: Option<&ArgDescriptor>, value: &Value| {
            let is_id = arg.is_some_and(|a| a.is_id) || identity.as_deref() == Some(name);
            let param = builder.bind_param(&format!("{var}_{name}"), value.clone());
            if is_id {
                ids.push(format!("ID({var}) = ${param}"));
            } else {
                let key = arg.map_or(name, ArgDescriptor::property);
                properties.push(format!("{key}: ${param}"));
            }
        };

        for (name, value) in arguments {
            if value.is_null() || name == "options" || name == "limit" {
                continue;
            }
            let declared_arg = declared.iter().find(|a| &a.name == name);
            match value {
                Value::Object(input) if name == "filter" => {
                    let input_args = match declared_arg {
                        Some(a) => self.schema.resolve_input_args(&a.graph_type)?,
                        None => Vec::new(),
                    };
                    for (k, v) in input {
                        if v.is_null() {
                            continue;
                        }
                        let arg = input_args.iter().find(|a| &a.name == k);
                        add(&mut self.builder, k, arg, v);
                    }
                }
                _ => add(&mut self.builder, name, declared_arg, value),
            }
        }

        Ok(Filter {
            properties: if properties.is_empty() {
                String::new()
            } else {
                format!("{{{}}}", properties.join(", "))
            },
            where_id: if ids.is_empty() {
                String::new()
            } else {
                format!(" WHERE {}", ids.join(" AND "))
            },
        })
    }
}

fn split_return(fragment: &Fragment, field: &Field) -> Result<(Fragment, Fragment)> {
    fragment.split_return().ok_or_else(|| {
        CompileError::InvalidFragment {
            field_name: field.name.clone(),
            message: "fragment has no top-level RETURN".to_string(),
        }
        .into()
    })
}

/// `options.limit`, else a top-level `limit` argument.
pub(crate) fn limit_argument(arguments: &IndexMap<String, Value>) -> Option<u64> {
    arguments
        .get("options")
        .and_then(|o| o.get("limit"))
        .or_else(|| arguments.get("limit"))
        .and_then(Value::as_u64)
}
