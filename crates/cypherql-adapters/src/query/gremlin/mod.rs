//! Gremlin response decoding.

mod graphson;

pub use graphson::{GraphsonValue, decode};
