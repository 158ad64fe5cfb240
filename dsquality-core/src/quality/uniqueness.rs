//! Row-level duplicate detection.
//!
//! Two rows are duplicates when every cell matches: missing equals missing,
//! `-0.0` equals `0.0`, and text compares byte for byte.

use std::collections::HashSet;

use crate::table::{CellKey, Table};

/// Counts rows that exactly repeat an earlier row.
///
/// The first occurrence of each distinct row is not counted, so three
/// identical rows yield a count of 2.
pub fn count_duplicate_rows(table: &Table) -> u64 {
    let columns = table.columns();
    let mut seen_rows: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.n_rows());
    let mut duplicates: u64 = 0;

    for row in 0..table.n_rows() {
        let key: Vec<CellKey<'_>> = columns.iter().map(|c| c.cell_key(row)).collect();
        if !seen_rows.insert(key) {
            duplicates += 1;
        }
    }

    tracing::trace!(
        rows = table.n_rows(),
        duplicates,
        "Duplicate row scan complete"
    );
    duplicates
}
