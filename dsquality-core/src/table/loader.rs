//! Delimited-text loader that builds a [`Table`].
//!
//! Column kinds are inferred once at load time: a column is numeric when
//! every non-missing cell parses as a float, categorical otherwise. The
//! quality engine only ever sees the declared kind.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Column, Table};
use crate::error::{QualityError, Result};

/// Cell values treated as missing when no custom list is given.
pub const DEFAULT_MISSING_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// Options controlling how delimited text is turned into a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Cell values that mark a missing entry (compared after trimming)
    pub missing_values: Vec<String>,
    /// Trim surrounding whitespace from headers and cells
    pub trim: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_values: DEFAULT_MISSING_VALUES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            trim: true,
        }
    }
}

impl LoadOptions {
    /// Creates load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method to replace the missing-value sentinels.
    pub fn with_missing_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to enable/disable whitespace trimming.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.missing_values.iter().any(|m| m == cell)
    }
}

/// Loads a delimited text file from disk.
///
/// Fails with [`QualityError::Io`] if the file cannot be opened and with
/// [`QualityError::Csv`] if its contents are malformed.
pub fn load_csv(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| QualityError::io(format!("Failed to open {}", path.display()), e))?;

    let table = read_csv(file, options)?;
    tracing::debug!(
        path = %path.display(),
        n_rows = table.n_rows(),
        n_cols = table.n_cols(),
        "Loaded table"
    );
    Ok(table)
}

/// Reads delimited text with a header row from any reader.
pub fn read_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| QualityError::csv("Failed to read header row", e))?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let headers = dedupe_headers(headers);

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            QualityError::csv(format!("Failed to read data row {}", index + 1), e)
        })?;
        for (column, cell) in cells.iter_mut().zip(record.iter()) {
            column.push(if options.is_missing(cell) {
                None
            } else {
                Some(cell.to_string())
            });
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw))
        .collect();

    Table::new(columns)
}

/// Writes a table as delimited text with a header row.
///
/// Missing cells are written as empty fields. Numbers use their shortest
/// round-trip form, so `3.0` is written as `3`.
pub fn write_csv<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    writer
        .write_record(table.column_names())
        .map_err(|e| QualityError::csv("Failed to write header row", e))?;

    for row in 0..table.n_rows() {
        let record = table.columns().iter().map(|column| column.display_cell(row));
        writer
            .write_record(record)
            .map_err(|e| QualityError::csv(format!("Failed to write data row {}", row + 1), e))?;
    }

    writer
        .flush()
        .map_err(|e| QualityError::io("Failed to flush delimited output", e))
}

/// Builds a numeric column if every present cell parses, categorical otherwise.
fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.parse::<f64>().ok().map(Some),
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(name, raw),
    }
}

/// Renames repeated headers to `name.1`, `name.2`, ... in order of appearance.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut result = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.clone();
        let mut suffix = 1_u32;
        while seen.contains(&name) {
            name = format!("{}.{}", header, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        result.push(name);
    }

    result
}
