//! Catalogue annotations shown alongside a group.

use serde::Serialize;

use crate::aggregation::Group;
use crate::dictionary::Catalogue;

/// An observed field as shown in a group's tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldLabel {
    pub field: String,
    pub value: f64,
    /// Most common non-numeric value, when the field had only those.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_frequent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A reference value whose code is documented in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceLabel {
    pub field: String,
    pub value: String,
    pub description: String,
}

/// Tooltip annotation for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLabels {
    pub name: String,
    pub entry_count: usize,
    pub fields: Vec<FieldLabel>,
    /// Only reference values with a documented code appear here.
    pub references: Vec<ReferenceLabel>,
}

impl GroupLabels {
    /// Annotate a group from the catalogue.
    pub fn for_group(group: &Group, catalogue: &Catalogue) -> Self {
        let fields = group
            .observed
            .iter()
            .map(|(field, stat)| FieldLabel {
                field: field.clone(),
                value: stat.value,
                most_frequent: stat.most_frequent.as_ref().map(|m| m.value.clone()),
                description: catalogue
                    .description_of(field)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            })
            .collect();

        let references = group
            .references
            .iter()
            .filter_map(|(field, value)| {
                let description = catalogue.value_description(field, value)?;
                Some(ReferenceLabel {
                    field: field.clone(),
                    value: value.clone(),
                    description: description.to_string(),
                })
            })
            .collect();

        Self {
            name: group.name.clone(),
            entry_count: group.entry_count,
            fields,
            references,
        }
    }
}
