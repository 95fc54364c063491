//! Scratch state folded during aggregation and discarded at finalization.

use indexmap::IndexMap;

use crate::input::CellValue;

use super::group::{Group, MostFrequent, ObservedStat, ValueBasis};
use super::mode::CalculationMode;
use super::numeric::parse_leading_number;

/// Running state of one observed field within one group.
#[derive(Debug, Clone)]
pub(super) struct FieldAccumulator {
    sum: f64,
    min: f64,
    max: f64,
    values: Vec<f64>,
    non_numeric: IndexMap<String, usize>,
}

impl FieldAccumulator {
    fn new() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: Vec::new(),
            non_numeric: IndexMap::new(),
        }
    }

    /// Fold one raw value. Negative numbers are sentinels and are dropped;
    /// values that do not read as numbers are tallied.
    fn fold(&mut self, value: Option<&CellValue>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };

        match parse_leading_number(value) {
            Some(n) if n >= 0.0 => {
                self.sum += n;
                self.min = self.min.min(n);
                self.max = self.max.max(n);
                self.values.push(n);
            }
            Some(_) => {}
            None => {
                *self.non_numeric.entry(value.to_string()).or_insert(0) += 1;
            }
        }
    }

    fn finish(mut self, mode: CalculationMode) -> ObservedStat {
        let numeric_count = self.values.len();

        if numeric_count > 0 {
            let value = match mode {
                CalculationMode::Average => self.sum / numeric_count as f64,
                CalculationMode::Sum => self.sum,
                CalculationMode::Count => numeric_count as f64,
                CalculationMode::Min => self.min,
                CalculationMode::Max => self.max,
                CalculationMode::Median => median(&mut self.values),
            };
            return ObservedStat {
                value,
                basis: ValueBasis::Numeric,
                numeric_count,
                non_numeric: self.non_numeric,
                most_frequent: None,
            };
        }

        if self.non_numeric.is_empty() {
            return ObservedStat {
                value: 0.0,
                basis: ValueBasis::Empty,
                numeric_count: 0,
                non_numeric: self.non_numeric,
                most_frequent: None,
            };
        }

        let total: usize = self.non_numeric.values().sum();
        // First maximum in insertion order wins ties
        let most_frequent = self
            .non_numeric
            .iter()
            .fold(None::<(&String, usize)>, |best, (value, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((value, count)),
            })
            .map(|(value, count)| MostFrequent {
                value: value.clone(),
                count,
            });

        ObservedStat {
            value: total as f64,
            basis: ValueBasis::NonNumeric,
            numeric_count: 0,
            non_numeric: self.non_numeric,
            most_frequent,
        }
    }
}

/// Middle element for odd lengths, mean of the two middle elements otherwise.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Running state of one group.
#[derive(Debug, Clone)]
pub(super) struct GroupAccumulator {
    parts: Vec<String>,
    references: IndexMap<String, String>,
    entry_count: usize,
    fields: IndexMap<String, FieldAccumulator>,
}

impl GroupAccumulator {
    pub(super) fn new(
        parts: Vec<String>,
        reference_fields: &[String],
        observed_fields: &[String],
    ) -> Self {
        let references = reference_fields
            .iter()
            .cloned()
            .zip(parts.iter().cloned())
            .collect();
        let fields = observed_fields
            .iter()
            .map(|f| (f.clone(), FieldAccumulator::new()))
            .collect();

        Self {
            parts,
            references,
            entry_count: 0,
            fields,
        }
    }

    /// Fold one source row into the group.
    pub(super) fn fold(&mut self, row: &crate::input::Row) {
        for (field, acc) in &mut self.fields {
            acc.fold(row.get(field));
        }
        self.entry_count += 1;
    }

    pub(super) fn finish(self, mode: CalculationMode) -> Group {
        Group {
            name: self.parts.join(", "),
            key: self.parts.join("/"),
            entry_count: self.entry_count,
            references: self.references,
            observed: self
                .fields
                .into_iter()
                .map(|(field, acc)| (field, acc.finish(mode)))
                .collect(),
        }
    }
}
