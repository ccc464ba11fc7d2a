//! openCypher fragment handling.
//!
//! Fragments embedded in schema directives are lexed rather than matched
//! with regular expressions, so renaming a variable never touches a string
//! literal, a label or a property key that happens to share its spelling.

mod fragment;
pub mod lexer;

pub use fragment::Fragment;
