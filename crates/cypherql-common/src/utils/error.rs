//! Error types for cypherql.
//!
//! [`Error`] is the crate-wide error; each stage of the pipeline has its own
//! error enum carrying the details a caller needs to act on.

use thiserror::Error;

/// Result type alias for cypherql operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for cypherql.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A schema lookup failed.
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// The operation could not be compiled.
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// A Gremlin response could not be reshaped.
    #[error("{0}")]
    Reshape(#[from] ReshapeError),

    /// A document could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The execution collaborator failed. The message is passed through opaquely.
    #[error("{0}")]
    Execution(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violated.
    #[error("internal error: {0}")]
    Internal(String),
}

fn hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". {}", super::strings::format_suggestion(s)),
        None => String::new(),
    }
}

/// Schema lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The type has no field with this name.
    #[error("field '{field_name}' not found on type '{type_name}'{}", hint(.suggestion))]
    FieldNotFound {
        /// Type that was searched.
        type_name: String,
        /// Field that was requested.
        field_name: String,
        /// Closest known field name, if any.
        suggestion: Option<String>,
    },

    /// Neither `Query` nor `Mutation` declares this field.
    #[error("root field '{field_name}' not found on Query or Mutation{}", hint(.suggestion))]
    RootFieldNotFound {
        /// Field that was requested.
        field_name: String,
        /// Closest known root field name, if any.
        suggestion: Option<String>,
    },

    /// No object or input type with this name.
    #[error("type '{type_name}' not found{}", hint(.suggestion))]
    TypeNotFound {
        /// Type that was requested.
        type_name: String,
        /// Closest known type name, if any.
        suggestion: Option<String>,
    },

    /// More than one field of a type carries `@id`.
    #[error("type '{type_name}' marks both '{first}' and '{second}' with @id")]
    DuplicateIdField {
        /// Offending type.
        type_name: String,
        /// First field carrying the marker.
        first: String,
        /// Second field carrying the marker.
        second: String,
    },

    /// A directive is missing a required argument or has the wrong shape.
    #[error("invalid @{directive} on {location}: {message}")]
    InvalidDirective {
        /// Directive name without the `@`.
        directive: String,
        /// `Type.field` the directive is attached to.
        location: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Compilation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A mutation matches no naming convention and has no override query.
    #[error("mutation '{field_name}' has an unsupported shape: {reason}")]
    UnsupportedMutationShape {
        /// Root mutation field name.
        field_name: String,
        /// Why it could not be compiled.
        reason: String,
    },

    /// A required argument was not supplied.
    #[error("field '{field_name}' is missing required argument '{argument}'")]
    MissingArgument {
        /// Field being compiled.
        field_name: String,
        /// Missing argument name.
        argument: String,
    },

    /// A descriptor came back without a resolvable type.
    #[error("type of '{type_name}' could not be resolved")]
    UnresolvedType {
        /// Name that failed to resolve.
        type_name: String,
    },

    /// The operation selects no root field.
    #[error("operation '{operation}' selects no root field")]
    EmptySelection {
        /// Operation name, or `<anonymous>`.
        operation: String,
    },

    /// A fragment spread names an undefined fragment.
    #[error("unknown fragment '{name}'")]
    UnknownFragment {
        /// Fragment name.
        name: String,
    },

    /// An override query fragment could not be used.
    #[error("invalid query fragment on '{field_name}': {message}")]
    InvalidFragment {
        /// Field carrying the fragment.
        field_name: String,
        /// What is wrong with it.
        message: String,
    },

    /// Selection nesting exceeds the configured maximum.
    #[error("selection depth exceeds the configured maximum of {max_depth}")]
    DepthExceeded {
        /// Configured limit.
        max_depth: usize,
    },
}

/// Result reshaping errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReshapeError {
    /// The response envelope does not have the expected shape.
    #[error("unexpected Gremlin response envelope: {0}")]
    UnexpectedEnvelope(String),

    /// An element inside a list result is not a map.
    #[error("malformed element at index {index}: {message}")]
    MalformedElement {
        /// Position in the list result.
        index: usize,
        /// What is wrong with it.
        message: String,
    },

    /// A map key is neither a string nor a `g:T` token.
    #[error("invalid map key: {0}")]
    InvalidKey(String),
}

/// What kind of document a [`ParseError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// Annotated schema SDL.
    Schema,
    /// Executable GraphQL operation.
    Operation,
    /// An override query fragment.
    Fragment,
    /// A database response body.
    Response,
}

impl std::fmt::Display for ParseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema => write!(f, "schema"),
            Self::Operation => write!(f, "operation"),
            Self::Fragment => write!(f, "query fragment"),
            Self::Response => write!(f, "response"),
        }
    }
}

/// A document failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse {kind}: {message}")]
pub struct ParseError {
    /// Document kind.
    pub kind: ParseKind,
    /// Parser message.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_not_found_message_with_hint() {
        let err = SchemaError::FieldNotFound {
            type_name: "Person".to_string(),
            field_name: "nmae".to_string(),
            suggestion: Some("name".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "field 'nmae' not found on type 'Person'. Did you mean 'name'?"
        );
    }

    #[test]
    fn test_root_not_found_without_hint() {
        let err = SchemaError::RootFieldNotFound {
            field_name: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "root field 'zzz' not found on Query or Mutation");
    }

    #[test]
    fn test_error_wraps_transparently() {
        let err: Error = CompileError::DepthExceeded { max_depth: 4 }.into();
        assert_eq!(
            err.to_string(),
            "selection depth exceeds the configured maximum of 4"
        );
        let err: Error = ParseError::new(ParseKind::Schema, "unexpected token").into();
        assert_eq!(err.to_string(), "failed to parse schema: unexpected token");
    }
}
