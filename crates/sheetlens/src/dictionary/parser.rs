//! Structure inference for hand-authored data dictionary sheets.
//!
//! Dictionaries mix "variable -> description" rows with blocks of
//! "code -> meaning" rows, introduced by a row whose name mentions a code
//! header ("Code", "Codes", "Código"). The parser walks the rows once with a
//! two-state machine and never fails: the worst case is an empty or partial
//! catalogue.

use serde::Serialize;
use tracing::debug;

use crate::input::Row;

use super::types::{Catalogue, ValueDefinition, VariableDefinition};

/// Column name fragments that mark the variable-name column, in priority order.
const NAME_PATTERNS: &[&str] = &["name", "variable", "var", "field"];

/// Column name fragments that mark the description column, in priority order.
const DESCRIPTION_PATTERNS: &[&str] = &["desc", "definition", "meaning"];

/// Fragment that marks the start of a values block.
const VALUES_MARKER: &str = "cod";

/// Columns the parser reads names and descriptions from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryColumns {
    /// Column holding variable names and codes.
    pub name: String,
    /// Column holding descriptions and code meanings.
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Collecting variable definitions.
    Idle,
    /// Collecting codes for the variables of the current section.
    InValuesSection,
}

/// Parses dictionary sheet rows into a [`Catalogue`].
#[derive(Debug, Clone, Default)]
pub struct DictionaryParser;

impl DictionaryParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Infer the name and description columns from the first row's fields.
    ///
    /// Falls back to the first field for names and the second (or first)
    /// field for descriptions. Returns `None` when the first row has no fields.
    pub fn infer_columns(&self, rows: &[Row]) -> Option<DictionaryColumns> {
        let columns: Vec<&str> = rows.first()?.fields().collect();
        let first = *columns.first()?;

        let name = find_column(&columns, NAME_PATTERNS).unwrap_or(first);
        let description = find_column(&columns, DESCRIPTION_PATTERNS)
            .or_else(|| columns.get(1).copied())
            .unwrap_or(first);

        Some(DictionaryColumns {
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    /// Parse dictionary rows.
    pub fn parse(&self, rows: &[Row]) -> Catalogue {
        let mut catalogue = Catalogue::new();
        let Some(columns) = self.infer_columns(rows) else {
            return catalogue;
        };

        let mut state = State::Idle;
        // Indices into the catalogue of the variables sharing the current values block
        let mut section: Vec<usize> = Vec::new();

        for row in rows {
            let name = cell_text(row, &columns.name);
            if name.is_empty() {
                continue;
            }
            let description = cell_text(row, &columns.description);

            if is_values_marker(&name) {
                state = State::InValuesSection;
                continue;
            }

            if is_variable_name(&name, state) {
                if state == State::InValuesSection {
                    state = State::Idle;
                    section.clear();
                }
                section.push(catalogue.push(VariableDefinition::new(name, description)));
            } else if state == State::InValuesSection && !section.is_empty() {
                let value = ValueDefinition {
                    value: name,
                    description,
                };
                for &index in &section {
                    if let Some(variable) = catalogue.get_mut(index) {
                        variable.values.push(value.clone());
                    }
                }
            }
        }

        debug!(
            name_column = %columns.name,
            description_column = %columns.description,
            variables = catalogue.len(),
            "Parsed dictionary"
        );

        catalogue
    }
}

fn find_column<'a>(columns: &[&'a str], patterns: &[&str]) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        columns
            .iter()
            .find(|col| col.to_lowercase().contains(pattern))
            .copied()
    })
}

fn cell_text(row: &Row, column: &str) -> String {
    row.get(column)
        .map(|v| v.to_string().trim().to_string())
        .unwrap_or_default()
}

fn is_values_marker(name: &str) -> bool {
    fold_accents(&name.to_lowercase()).contains(VALUES_MARKER)
}

/// A new variable starts with three uppercase letters; inside a values block
/// it must also be at least four characters long, so short codes that look
/// like acronyms stay codes.
fn is_variable_name(name: &str, state: State) -> bool {
    let mut chars = name.chars();
    let leading_upper = (0..3).all(|_| chars.next().is_some_and(|c| c.is_ascii_uppercase()));
    leading_upper && (state == State::Idle || name.chars().count() >= 4)
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            other => other,
        })
        .collect()
}
