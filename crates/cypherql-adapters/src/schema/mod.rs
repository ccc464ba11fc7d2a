//! Annotated schema documents.
//!
//! The schema is plain SDL extended with compiler directives (`@alias`,
//! `@id`, `@relationship`, `@graphQuery`/`@cypher`). This module parses it
//! once into an owned [`SchemaDocument`]; interpretation of the directives
//! belongs to the engine.

mod document;
mod sdl;

pub use document::{
    Directive, FieldDefinition, InputValueDefinition, SchemaDocument, TypeDefinition, TypeKind,
    TypeRef,
};
pub use sdl::parse;
