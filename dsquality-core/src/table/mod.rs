//! In-memory tabular data model.
//!
//! A [`Table`] is an ordered list of named, typed columns of equal length.
//! It is built once (usually by the CSV loader) and never mutated by the
//! quality engine.

mod loader;

pub use loader::{LoadOptions, load_csv, read_csv, write_csv};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{QualityError, Result};

/// Declared kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Numeric values (integers or floats)
    Numeric,
    /// Text / categorical values
    Categorical,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Cell storage for a single column. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ColumnValues {
    /// Floats, with integers widened on load
    Numeric(Vec<Option<f64>>),
    /// Raw text cells
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    /// Number of cells, missing ones included.
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Categorical(values) => values.len(),
        }
    }

    /// Returns true if the column holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared kind of the stored values.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnValues::Numeric(_) => ColumnKind::Numeric,
            ColumnValues::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Cells at the given positions, in the given order.
    fn pick(&self, rows: &[usize]) -> Self {
        match self {
            ColumnValues::Numeric(values) => {
                ColumnValues::Numeric(rows.iter().map(|&r| values[r]).collect())
            }
            ColumnValues::Categorical(values) => {
                ColumnValues::Categorical(rows.iter().map(|&r| values[r].clone()).collect())
            }
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a table
    pub name: String,
    /// Typed cell storage
    pub values: ColumnValues,
}

impl Column {
    /// Creates a numeric column. `NaN` cells are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            values: ColumnValues::Numeric(values),
        }
    }

    /// Creates a categorical column.
    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values: ColumnValues::Categorical(values),
        }
    }

    /// Creates a categorical column from string slices, without missing values.
    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::categorical(name, values.iter().map(|v| Some((*v).to_string())).collect())
    }

    /// Creates a numeric column from plain numbers, without missing values.
    pub fn from_f64s(name: impl Into<String>, values: &[f64]) -> Self {
        Self::numeric(name, values.iter().copied().map(Some).collect())
    }

    /// Declared kind of this column.
    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    /// Number of cells, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column holds no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text form of the cell at `row`; missing cells render as an empty string.
    pub fn display_cell(&self, row: usize) -> String {
        match &self.values {
            ColumnValues::Numeric(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            ColumnValues::Categorical(values) => values
                .get(row)
                .cloned()
                .flatten()
                .unwrap_or_default(),
        }
    }

    /// Returns a hashable key for the cell at `row`.
    ///
    /// Numeric cells compare by bit pattern with `-0.0` folded into `0.0`.
    pub(crate) fn cell_key(&self, row: usize) -> CellKey<'_> {
        match &self.values {
            ColumnValues::Numeric(values) => match values.get(row).copied().flatten() {
                Some(v) => CellKey::Number(normalized_bits(v)),
                None => CellKey::Missing,
            },
            ColumnValues::Categorical(values) => match values.get(row).and_then(Option::as_deref)
            {
                Some(s) => CellKey::Text(s),
                None => CellKey::Missing,
            },
        }
    }
}

/// Comparable representation of one cell, used for distinct and duplicate counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

/// Bit pattern of a float with both zeros mapped to the same key.
pub(crate) fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0_f64.to_bits() } else { value.to_bits() }
}

/// An immutable, rectangular table of named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Builds a table from columns.
    ///
    /// Fails with [`QualityError::InvalidInput`] when columns differ in length
    /// or two columns share a name. An empty column list yields a 0 x 0 table.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.len() != n_rows {
                return Err(QualityError::invalid_input(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    n_rows
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(QualityError::invalid_input(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Columns in table order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns true if the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    /// Builds a new table from the given row positions, in the given order.
    ///
    /// Positions past the last row are skipped. Repeated positions repeat
    /// the row.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let rows: Vec<usize> = rows.iter().copied().filter(|&r| r < self.n_rows).collect();
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                values: column.values.pick(&rows),
            })
            .collect();

        Self {
            columns,
            n_rows: rows.len(),
        }
    }

    /// The first `n` rows (all of them if the table is shorter).
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.take_rows(&rows)
    }

    /// `n` distinct rows drawn uniformly at random (all rows if the table is
    /// shorter), in draw order.
    ///
    /// The same seed always selects the same rows.
    pub fn sample(&self, n: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows = rand::seq::index::sample(&mut rng, self.n_rows, n.min(self.n_rows)).into_vec();
        tracing::trace!(seed, drawn = rows.len(), "Sampled rows");
        self.take_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let table = Table::new(vec![
            Column::from_f64s("a", &[1.0, 2.0, 3.0]),
            Column::from_strs("b", &["x", "y", "z"]),
        ])
        .unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column("b").unwrap().kind(), ColumnKind::Categorical);
        assert!(table.column("c").is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::from_f64s("a", &[1.0, 2.0, 3.0]),
            Column::from_strs("b", &["x", "y"]),
        ]);

        assert!(matches!(result, Err(QualityError::InvalidInput { .. })));
    }

    #[test]
    fn test_table_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::from_f64s("a", &[1.0]),
            Column::from_f64s("a", &[2.0]),
        ]);

        assert!(matches!(result, Err(QualityError::InvalidInput { .. })));
    }

    #[test]
    fn test_empty_tables() {
        let no_columns = Table::new(vec![]).unwrap();
        assert_eq!(no_columns.n_rows(), 0);
        assert!(no_columns.is_empty());

        let no_rows = Table::new(vec![Column::from_f64s("a", &[])]).unwrap();
        assert_eq!(no_rows.n_cols(), 1);
        assert!(no_rows.is_empty());
    }

    #[test]
    fn test_nan_stored_as_missing() {
        let column = Column::numeric("v", vec![Some(f64::NAN), Some(1.0), None]);
        assert_eq!(
            column.values,
            ColumnValues::Numeric(vec![None, Some(1.0), None])
        );
    }

    #[test]
    fn test_cell_keys_fold_signed_zero() {
        let column = Column::from_f64s("v", &[0.0, -0.0, 1.5]);
        assert_eq!(column.cell_key(0), column.cell_key(1));
        assert_ne!(column.cell_key(0), column.cell_key(2));
        assert_eq!(column.cell_key(99), CellKey::Missing);
    }

    fn letters() -> Table {
        Table::new(vec![
            Column::numeric("n", vec![Some(1.0), None, Some(3.0), Some(4.5), Some(5.0)]),
            Column::from_strs("s", &["a", "b", "c", "d", "e"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_head_keeps_leading_rows() {
        let table = letters();

        let head = table.head(2);
        assert_eq!(head.n_rows(), 2);
        assert_eq!(head.n_cols(), 2);
        assert_eq!(
            head.column("n").unwrap().values,
            ColumnValues::Numeric(vec![Some(1.0), None])
        );

        assert_eq!(table.head(50), table);
        assert_eq!(table.head(0).n_rows(), 0);
    }

    #[test]
    fn test_take_rows_skips_out_of_range() {
        let picked = letters().take_rows(&[4, 0, 9, 0]);
        assert_eq!(picked.n_rows(), 3);
        assert_eq!(
            picked.column("s").unwrap().values,
            ColumnValues::Categorical(vec![
                Some("e".to_string()),
                Some("a".to_string()),
                Some("a".to_string()),
            ])
        );
    }

    #[test]
    fn test_sample_is_reproducible() {
        let table = letters();

        let first = table.sample(3, 42);
        assert_eq!(first.n_rows(), 3);
        assert_eq!(first, table.sample(3, 42));

        // Rows are drawn without replacement
        let mut labels: Vec<String> = (0..first.n_rows())
            .map(|row| first.column("s").unwrap().display_cell(row))
            .collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 3);

        assert_eq!(table.sample(10, 7).n_rows(), 5);
    }

    #[test]
    fn test_display_cell() {
        let table = letters();
        let numbers = table.column("n").unwrap();
        assert_eq!(numbers.display_cell(0), "1");
        assert_eq!(numbers.display_cell(1), "");
        assert_eq!(numbers.display_cell(3), "4.5");
        assert_eq!(table.column("s").unwrap().display_cell(4), "e");
        assert_eq!(numbers.display_cell(99), "");
    }

    #[test]
    fn test_column_kind_serde() {
        let json = serde_json::to_string(&ColumnKind::Categorical).unwrap();
        assert_eq!(json, "\"categorical\"");
    }
}
