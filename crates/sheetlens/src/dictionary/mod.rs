//! Data dictionary parsing.

mod parser;
mod types;

pub use parser::{DictionaryColumns, DictionaryParser};
pub use types::{Catalogue, ValueDefinition, VariableDefinition};
