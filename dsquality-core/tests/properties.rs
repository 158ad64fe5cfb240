#![allow(clippy::unwrap_used)]
//! Property-based tests for the quality engine.
//!
//! Uses proptest to check score bounds, flag consistency and determinism
//! across random summaries and random tables.

use proptest::prelude::*;

use dsquality_core::{
    Column, ColumnKind, Table, estimate_from_summary, inspect_table,
    quality::count_duplicate_rows,
};

/// Numeric cells drawn from a small domain so zeros, repeats and gaps occur.
fn numeric_cell() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        2 => Just(Some(0.0)),
        5 => (-3i32..4).prop_map(|v| Some(f64::from(v))),
    ]
}

fn categorical_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        5 => "[a-d]".prop_map(Some),
    ]
}

/// Random table with 1-40 rows and 1-6 columns of mixed kinds.
fn table_strategy() -> impl Strategy<Value = Table> {
    (1usize..40, prop::collection::vec(any::<bool>(), 1..6)).prop_flat_map(|(rows, kinds)| {
        let columns: Vec<BoxedStrategy<Column>> = kinds
            .into_iter()
            .enumerate()
            .map(|(index, is_numeric)| {
                let name = format!("c{index}");
                if is_numeric {
                    prop::collection::vec(numeric_cell(), rows)
                        .prop_map(move |values| Column::numeric(name.clone(), values))
                        .boxed()
                } else {
                    prop::collection::vec(categorical_cell(), rows)
                        .prop_map(move |values| Column::categorical(name.clone(), values))
                        .boxed()
                }
            })
            .collect();
        columns.prop_map(|columns| Table::new(columns).unwrap())
    })
}

proptest! {
    /// Property: summary score stays in [0, 1] and hard flags block training
    #[test]
    fn prop_summary_score_bounded(
        rows in 0u64..5000,
        cols in 0u64..300,
        share in -0.5f64..1.5,
        numeric in 0u64..150,
        categorical in 0u64..150,
    ) {
        let result = estimate_from_summary(rows, cols, share, numeric, categorical);

        prop_assert!((0.0..=1.0).contains(&result.quality_score));
        let hard = result.flags.too_few_rows
            || result.flags.too_many_columns
            || result.flags.too_many_missing;
        prop_assert_eq!(result.ok_for_model, !hard);
    }

    /// Property: repeated summary calls give identical results
    #[test]
    fn prop_summary_idempotent(
        rows in 0u64..5000,
        share in 0.0f64..1.0,
        numeric in 0u64..20,
    ) {
        let first = estimate_from_summary(rows, 20, share, numeric, 20 - numeric);
        let second = estimate_from_summary(rows, 20, share, numeric, 20 - numeric);
        prop_assert_eq!(first, second);
    }

    /// Property: table score stays in [0, 100] and zero shares cover numeric columns
    #[test]
    fn prop_table_invariants(table in table_strategy()) {
        let result = inspect_table(&table).unwrap();

        prop_assert!((0.0..=100.0).contains(&result.quality_score));
        prop_assert_eq!(result.ok_for_model, result.quality_score >= 70.0);

        let numeric: Vec<&str> = table
            .columns()
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .map(|c| c.name.as_str())
            .collect();
        let keys: Vec<&str> = result.flags.zero_shares.keys().map(String::as_str).collect();
        prop_assert_eq!(keys, numeric);
        for share in result.flags.zero_shares.values() {
            prop_assert!((0.0..=1.0).contains(share));
        }

        prop_assert_eq!(result.flags.has_duplicates, result.flags.duplicate_count > 0);
        prop_assert!(result.flags.duplicate_count < table.n_rows() as u64);
    }

    /// Property: inspection is deterministic down to the serialized bytes
    #[test]
    fn prop_table_idempotent(table in table_strategy()) {
        let first = serde_json::to_vec(&inspect_table(&table).unwrap()).unwrap();
        let second = serde_json::to_vec(&inspect_table(&table).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: tables with a unique id column never report duplicates
    #[test]
    fn prop_unique_rows_have_no_duplicates(rows in 1usize..60) {
        let ids: Vec<f64> = (0..rows).map(|i| i as f64).collect();
        let table = Table::new(vec![
            Column::from_f64s("id", &ids),
            Column::from_strs("tag", &vec!["same"; rows]),
        ]).unwrap();

        prop_assert_eq!(count_duplicate_rows(&table), 0);
        let result = inspect_table(&table).unwrap();
        prop_assert!(!result.flags.has_duplicates);
        prop_assert_eq!(result.flags.duplicate_count, 0);
    }
}
