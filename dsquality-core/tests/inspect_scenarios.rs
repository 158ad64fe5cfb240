//! End-to-end quality evaluation scenarios.
//!
//! This test suite covers:
//! - Clean tables scoring full marks
//! - Constant, duplicate and zero-heavy tables
//! - Empty dataset rejection
//! - Summary estimates on reference inputs
//! - Inspection of tables loaded from CSV text

#![allow(clippy::unwrap_used)]

use dsquality_core::{
    Column, LoadOptions, QualityConfig, QualityEngine, QualityError, Result, SummaryInput, Table,
    estimate_from_summary, inspect_table,
    quality::{DatasetOverview, TableConfig, problematic_columns},
    table::read_csv,
};

/// Builds a 15 x 7 table without any quality defect.
fn clean_table() -> Table {
    let rows = 15;
    let seq = |offset: f64| -> Vec<f64> { (0..rows).map(|i| i as f64 + offset).collect() };
    let labels = |choices: &[&str]| -> Vec<Option<String>> {
        (0..rows)
            .map(|i| Some(choices[i % choices.len()].to_string()))
            .collect()
    };

    Table::new(vec![
        Column::from_f64s("id", &seq(1.0)),
        Column::from_f64s("age", &seq(20.0)),
        Column::from_f64s("income", &seq(1000.5)),
        Column::from_f64s("balance", &seq(-3.0)),
        Column::categorical("segment", labels(&["retail", "business", "private"])),
        Column::categorical("region", labels(&["north", "south"])),
        Column::categorical("channel", labels(&["web", "app", "branch", "phone"])),
    ])
    .unwrap()
}

// =============================================================================
// Table inspection
// =============================================================================

#[test]
fn test_clean_table_is_ready_for_training() -> Result<()> {
    let table = clean_table();
    let result = inspect_table(&table)?;

    assert_eq!(result.dataset_shape.n_rows, 15);
    assert_eq!(result.dataset_shape.n_cols, 7);
    assert_eq!(result.quality_score, 100.0);
    assert!(result.ok_for_model);
    assert!(result.flags.is_clean());
    assert_eq!(result.flags.duplicate_count, 0);
    assert_eq!(result.flags.zero_shares.len(), 4);
    // balance crosses zero exactly once
    assert!((result.flags.zero_shares["balance"] - 1.0 / 15.0).abs() < 1e-12);
    Ok(())
}

#[test]
fn test_constant_column_is_reported() -> Result<()> {
    let table = Table::new(vec![
        Column::from_f64s("id", &[1.0, 2.0, 3.0, 4.0]),
        Column::from_strs("currency", &["EUR", "EUR", "EUR", "EUR"]),
    ])?;

    let result = inspect_table(&table)?;
    assert!(result.flags.has_constant_columns);
    assert!(result.flags.constant_columns.contains(&"currency".to_string()));
    assert!(!result.flags.constant_columns.contains(&"id".to_string()));
    Ok(())
}

#[test]
fn test_two_identical_rows_count_once() -> Result<()> {
    let table = Table::new(vec![
        Column::from_f64s("id", &[1.0, 2.0, 2.0, 3.0, 4.0]),
        Column::from_strs("name", &["ann", "bob", "bob", "cid", "dee"]),
    ])?;

    let result = inspect_table(&table)?;
    assert_eq!(result.flags.duplicate_count, 1);
    assert!(result.flags.has_duplicates);
    assert_eq!(result.quality_score, 85.0);
    assert!(result.ok_for_model);
    Ok(())
}

#[test]
fn test_zero_row_table_fails() {
    let table = Table::new(vec![
        Column::from_f64s("id", &[]),
        Column::from_strs("name", &[]),
    ])
    .unwrap();

    let err = inspect_table(&table).unwrap_err();
    assert!(matches!(err, QualityError::EmptyDataset { n_rows: 0, n_cols: 2 }));
    assert_eq!(err.to_string(), "Dataset is empty: 0 rows x 2 columns");
}

#[test]
fn test_many_defects_fail_training() -> Result<()> {
    let table = Table::new(vec![
        Column::numeric("clicks", vec![Some(0.0), Some(0.0), Some(0.0), None]),
        Column::numeric("spend", vec![None, None, Some(4.0), None]),
        Column::from_strs("source", &["ads", "ads", "ads", "ads"]),
    ])?;

    let result = inspect_table(&table)?;
    assert!(result.flags.has_high_missing);
    assert_eq!(result.flags.high_missing_columns, vec!["spend"]);
    assert!(result.flags.has_many_zero_values);
    assert_eq!(result.flags.high_zero_columns, vec!["clicks"]);
    // clicks, spend and source each hold a single distinct value
    assert_eq!(result.flags.constant_columns, vec!["clicks", "spend", "source"]);
    assert!(result.flags.has_duplicates);
    assert_eq!(result.quality_score, 50.0);
    assert!(!result.ok_for_model);
    Ok(())
}

#[test]
fn test_custom_table_config() -> Result<()> {
    let engine = QualityEngine::new(
        QualityConfig::new().with_table(TableConfig::default().with_pass_score(95.0)),
    );
    let table = Table::new(vec![
        Column::from_f64s("id", &[1.0, 2.0, 3.0]),
        Column::from_f64s("flat", &[5.0, 5.0, 5.0]),
    ])?;

    let result = engine.inspect_table(&table)?;
    assert_eq!(result.quality_score, 90.0);
    assert!(!result.ok_for_model);
    Ok(())
}

// =============================================================================
// Summary estimates
// =============================================================================

#[test]
fn test_reference_summary_estimate() {
    let result = estimate_from_summary(2000, 15, 0.2, 8, 7);

    assert!(!result.flags.too_few_rows);
    assert!(!result.flags.too_many_columns);
    assert!(!result.flags.too_many_missing);
    assert!(!result.flags.no_numeric_columns);
    assert!(!result.flags.no_categorical_columns);
    assert!((result.quality_score - 0.8).abs() < 1e-12);
    assert!(result.quality_score > 0.0 && result.quality_score < 1.0);
    assert!(result.ok_for_model);
}

#[test]
fn test_summary_and_table_use_independent_scales() -> Result<()> {
    let engine = QualityEngine::with_defaults();
    let summary = engine.estimate_from_summary(&SummaryInput::new(2000, 7, 0.0, 4, 3));
    let inspected = engine.inspect_table(&clean_table())?;

    assert_eq!(summary.quality_score, 1.0);
    assert_eq!(inspected.quality_score, 100.0);
    Ok(())
}

// =============================================================================
// Loader integration
// =============================================================================

#[test]
fn test_inspect_loaded_csv() -> Result<()> {
    let csv = "\
user_id,country,purchases,revenue
1,FR,3,120.5
2,DE,0,
3,FR,5,88
4,,0,
5,ES,1,15
";
    let table = read_csv(csv.as_bytes(), &LoadOptions::default())?;
    let result = inspect_table(&table)?;

    assert_eq!(result.dataset_shape.n_rows, 5);
    assert_eq!(result.flags.zero_shares.keys().collect::<Vec<_>>(), vec![
        "user_id",
        "purchases",
        "revenue"
    ]);
    assert_eq!(result.flags.zero_shares["purchases"], 0.4);
    assert_eq!(result.flags.high_missing_columns, vec!["revenue"]);
    assert_eq!(result.quality_score, 80.0);

    let overview = DatasetOverview::from_table(&table);
    assert_eq!(overview.missing.total_missing, 3);
    assert_eq!(overview.categorical["country"].top_values[0].value, "FR");

    let problems = problematic_columns(&table, 0.1);
    assert_eq!(problems[0].column, "revenue");
    assert_eq!(problems[0].missing_share, 0.4);
    assert_eq!(problems[1].column, "country");
    Ok(())
}
