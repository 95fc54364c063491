//! Property-based tests for Sheetlens.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p sheetlens --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p sheetlens --test property_tests
//! ```

use proptest::prelude::*;

use sheetlens::{
    AggregationEngine, AggregationRequest, CalculationMode, CellValue, DictionaryParser, Row,
};

// =============================================================================
// Test Strategies
// =============================================================================

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        (-100.0f64..1000.0).prop_map(CellValue::Number),
        "[a-c]{1,3}".prop_map(CellValue::Text),
        "[0-9]{1,3}( kg)?".prop_map(CellValue::Text),
    ]
}

fn data_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (cell_value(), cell_value(), cell_value()).prop_map(|(a, b, v)| {
            [("a", a), ("b", b), ("v", v)].into_iter().collect::<Row>()
        }),
        0..60,
    )
}

/// Reference values drawn from a tiny alphabet that includes the key separator.
fn slashed_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        ("[xy/]{1,3}", "[xy/]{1,3}", cell_value()).prop_map(|(a, b, v)| {
            [("a", CellValue::from(a)), ("b", CellValue::from(b)), ("v", v)]
                .into_iter()
                .collect::<Row>()
        }),
        0..60,
    )
}

fn calculation_mode() -> impl Strategy<Value = CalculationMode> {
    prop::sample::select(CalculationMode::ALL.to_vec())
}

fn dictionary_rows() -> impl Strategy<Value = Vec<Row>> {
    let name = prop_oneof![
        "[A-Z]{2,8}",
        "[A-Za-z ]{0,12}",
        Just("Codes".to_string()),
        Just("Código".to_string()),
        "[0-9]{1,2}",
    ];
    prop::collection::vec(
        (name, "[A-Za-z ]{0,20}").prop_map(|(n, d)| {
            [("Variable", CellValue::from(n)), ("Description", CellValue::from(d))]
                .into_iter()
                .collect::<Row>()
        }),
        0..40,
    )
}

// =============================================================================
// Aggregation Properties
// =============================================================================

proptest! {
    /// Every row lands in exactly one group.
    #[test]
    fn groups_partition_rows(rows in data_rows(), mode in calculation_mode()) {
        let engine = AggregationEngine::new();
        let request = AggregationRequest::new(["a", "b"], ["v"], mode);
        let result = engine.aggregate(&rows, &request);

        if rows.is_empty() {
            prop_assert!(result.groups.is_empty());
        } else {
            let total: usize = result.groups.iter().map(|g| g.entry_count).sum();
            prop_assert_eq!(total, rows.len());
        }
    }

    /// Aggregating twice gives the same result.
    #[test]
    fn aggregation_is_idempotent(rows in data_rows(), mode in calculation_mode()) {
        let engine = AggregationEngine::new();
        let request = AggregationRequest::new(["a"], ["v", "b"], mode);
        prop_assert_eq!(engine.aggregate(&rows, &request), engine.aggregate(&rows, &request));
    }

    /// Group keys are unique.
    #[test]
    fn group_keys_unique(rows in slashed_rows()) {
        let request = AggregationRequest::new(["a", "b"], ["v"], CalculationMode::Count);
        let result = AggregationEngine::new().aggregate(&rows, &request);
        let mut keys: Vec<&str> = result.groups.iter().map(|g| g.key.as_str()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before);
    }

    /// Numeric aggregates never include negative values.
    #[test]
    fn numeric_values_non_negative(rows in data_rows(), mode in calculation_mode()) {
        let request = AggregationRequest::new(["a"], ["v"], mode);
        let result = AggregationEngine::new().aggregate(&rows, &request);
        for group in &result.groups {
            prop_assert!(group.value("v").unwrap() >= 0.0);
        }
    }
}

// =============================================================================
// Dictionary Parser Properties
// =============================================================================

proptest! {
    /// The dictionary parser never panics and never invents names.
    #[test]
    fn dictionary_parser_never_panics(rows in dictionary_rows()) {
        let catalogue = DictionaryParser::new().parse(&rows);
        for variable in catalogue.variables() {
            prop_assert!(variable.name.chars().take(3).all(|c| c.is_ascii_uppercase()));
        }
    }

    /// Parsing is deterministic.
    #[test]
    fn dictionary_parser_deterministic(rows in dictionary_rows()) {
        let parser = DictionaryParser::new();
        prop_assert_eq!(parser.parse(&rows), parser.parse(&rows));
    }
}
