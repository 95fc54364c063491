//! Variable catalogue types.

use serde::{Deserialize, Serialize};

/// One admissible code of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDefinition {
    /// The code as written in the data.
    pub value: String,
    /// What the code means.
    pub description: String,
}

/// A documented variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Variable code, e.g. `AGE`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Enumerated values, empty unless the dictionary listed codes for it.
    #[serde(default)]
    pub values: Vec<ValueDefinition>,
}

impl VariableDefinition {
    /// Create a variable without enumerated values.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            values: Vec::new(),
        }
    }

    /// Find the description of one of this variable's codes.
    pub fn value_description(&self, value: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.description.as_str())
    }
}

/// Parsed data dictionary. An empty catalogue means "no dictionary available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    variables: Vec<VariableDefinition>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a list of definitions.
    pub fn from_variables(variables: Vec<VariableDefinition>) -> Self {
        Self { variables }
    }

    /// All definitions in dictionary order.
    pub fn variables(&self) -> &[VariableDefinition] {
        &self.variables
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether no definitions were found.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Find a variable by exact name. The first definition wins.
    pub fn variable(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Description of a variable, if documented.
    pub fn description_of(&self, name: &str) -> Option<&str> {
        self.variable(name).map(|v| v.description.as_str())
    }

    /// Description of one code of a variable, if documented.
    pub fn value_description(&self, name: &str, value: &str) -> Option<&str> {
        self.variable(name)?.value_description(value)
    }

    pub(crate) fn push(&mut self, variable: VariableDefinition) -> usize {
        self.variables.push(variable);
        self.variables.len() - 1
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut VariableDefinition> {
        self.variables.get_mut(index)
    }
}

impl IntoIterator for Catalogue {
    type Item = VariableDefinition;
    type IntoIter = std::vec::IntoIter<VariableDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}
