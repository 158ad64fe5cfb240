//! Per-column profiling for table inspection.
//!
//! One pass over each column collects missing, distinct and zero counts.
//! Profiles come back in table column order so that every list derived from
//! them is deterministic.

use std::collections::HashSet;

use crate::table::{CellKey, Column, ColumnValues, Table};

use super::models::ColumnProfile;

/// Profiles every column of the table.
pub fn profile_columns(table: &Table) -> Vec<ColumnProfile> {
    table.columns().iter().map(profile_column).collect()
}

/// Profiles a single column.
///
/// Missing cells are excluded from the distinct count, so a column whose
/// cells are all missing has zero distinct values and counts as constant.
pub fn profile_column(column: &Column) -> ColumnProfile {
    let mut distinct: HashSet<CellKey<'_>> = HashSet::new();
    let mut missing_count: u64 = 0;

    for row in 0..column.len() {
        match column.cell_key(row) {
            CellKey::Missing => missing_count += 1,
            key => {
                distinct.insert(key);
            }
        }
    }

    let zero_count = match &column.values {
        ColumnValues::Numeric(values) => {
            Some(values.iter().filter(|v| **v == Some(0.0)).count() as u64)
        }
        ColumnValues::Categorical(_) => None,
    };

    let distinct_count = distinct.len() as u64;

    ColumnProfile {
        name: column.name.clone(),
        kind: column.kind(),
        missing_count,
        distinct_count,
        zero_count,
        is_constant: distinct_count <= 1,
    }
}
