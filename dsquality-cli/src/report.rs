//! Markdown and JSON reports for the `report` subcommand.
//!
//! Both are built from one inspection result plus the descriptive overview
//! of the same table, so the verdict and the statistics always agree.

use dsquality_core::{
    QualityResult, TableFlags,
    quality::{DatasetOverview, NumericSummary, ProblematicColumn},
};
use serde::Serialize;

/// Verdict sentence shown next to a score.
pub fn verdict_message(ok_for_model: bool) -> &'static str {
    if ok_for_model {
        "Data quality is sufficient for model training under the current thresholds."
    } else {
        "Data quality is insufficient; clean the dataset before training."
    }
}

/// Report settings echoed into the Markdown output.
#[derive(Debug, Clone)]
pub struct ReportSettings<'a> {
    /// Report heading
    pub title: &'a str,
    /// Path of the described file
    pub file: &'a str,
    /// Threshold used to select problematic columns
    pub min_missing_share: f64,
    /// Most frequent values listed per categorical column
    pub top_k: usize,
}

/// Compact machine-readable companion of the Markdown report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSummary {
    /// Number of rows
    pub n_rows: u64,
    /// Number of columns
    pub n_cols: u64,
    /// Inspection score (0-100)
    pub quality_score: f64,
    /// Inspection verdict
    pub ok_for_model: bool,
    /// Verdict in words
    pub message: String,
    /// Missing cells over the whole table
    pub total_missing: u64,
    /// Columns at or above the requested missing share
    pub problematic_columns: Vec<String>,
    /// At least one row repeats an earlier one
    pub has_duplicates: bool,
    /// Rows identical to an earlier row
    pub duplicate_count: u64,
    /// At least one column holds a single distinct value
    pub has_constant_columns: bool,
    /// Constant columns, in table order
    pub constant_columns: Vec<String>,
    /// At least one categorical column is nearly unique per row
    pub has_high_cardinality: bool,
    /// High-cardinality categorical columns, in table order
    pub high_cardinality_columns: Vec<String>,
}

impl JsonSummary {
    /// Collects the summary fields from an inspection and an overview.
    pub fn new(
        result: &QualityResult<TableFlags>,
        overview: &DatasetOverview,
        problematic: &[ProblematicColumn],
    ) -> Self {
        let flags = &result.flags;
        Self {
            n_rows: overview.n_rows,
            n_cols: overview.n_cols,
            quality_score: result.quality_score,
            ok_for_model: result.ok_for_model,
            message: verdict_message(result.ok_for_model).to_string(),
            total_missing: overview.missing.total_missing,
            problematic_columns: problematic.iter().map(|p| p.column.clone()).collect(),
            has_duplicates: flags.has_duplicates,
            duplicate_count: flags.duplicate_count,
            has_constant_columns: flags.has_constant_columns,
            constant_columns: flags.constant_columns.clone(),
            has_high_cardinality: flags.has_high_cardinality_categoricals,
            high_cardinality_columns: flags.high_cardinality_columns.clone(),
        }
    }
}

/// Renders the full Markdown report.
pub fn render_markdown(
    settings: &ReportSettings<'_>,
    result: &QualityResult<TableFlags>,
    overview: &DatasetOverview,
    problematic: &[ProblematicColumn],
) -> String {
    let mut lines = Vec::new();

    lines.push(format!("# {}", settings.title));
    lines.push(String::new());
    lines.push(format!("File: `{}`", settings.file));
    lines.push(String::new());

    lines.push("## Dataset".to_string());
    lines.push(format!("- Rows: {}", overview.n_rows));
    lines.push(format!("- Columns: {}", overview.n_cols));
    lines.push(String::new());

    push_quality_section(&mut lines, result);

    lines.push("### Analysis parameters".to_string());
    lines.push(format!(
        "- Missing share threshold: {}",
        settings.min_missing_share
    ));
    lines.push(format!("- Top-K categories: {}", settings.top_k));
    lines.push(String::new());

    if !problematic.is_empty() {
        lines.push("### Problematic columns (missing values)".to_string());
        for column in problematic {
            lines.push(format!(
                "- `{}`: {:.1}% missing ({})",
                column.column,
                column.missing_share * 100.0,
                column.missing_count
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Missing values".to_string());
    lines.push(format!("- Total missing: {}", overview.missing.total_missing));
    lines.push(format!(
        "- Columns with missing values: {}",
        overview.missing.columns_with_missing
    ));
    lines.push(String::new());

    push_numeric_section(&mut lines, overview);
    push_categorical_section(&mut lines, overview, settings.top_k);

    lines.join("\n")
}

fn push_quality_section(lines: &mut Vec<String>, result: &QualityResult<TableFlags>) {
    let flags = &result.flags;

    lines.push("## Data quality".to_string());
    lines.push(format!(
        "**Quality score:** {:.0}/100",
        result.quality_score
    ));
    lines.push(String::new());
    lines.push(verdict_message(result.ok_for_model).to_string());
    lines.push(String::new());
    lines.push(format!(
        "- Duplicate rows: {} ({})",
        yes_no(flags.has_duplicates),
        flags.duplicate_count
    ));
    push_flag(lines, "High missing share", flags.has_high_missing, &flags.high_missing_columns);
    push_flag(lines, "Constant columns", flags.has_constant_columns, &flags.constant_columns);
    push_flag(
        lines,
        "High-cardinality categoricals",
        flags.has_high_cardinality_categoricals,
        &flags.high_cardinality_columns,
    );
    push_flag(lines, "Many zero values", flags.has_many_zero_values, &flags.high_zero_columns);
    lines.push(String::new());
}

fn push_flag(lines: &mut Vec<String>, label: &str, set: bool, columns: &[String]) {
    let columns = if columns.is_empty() {
        "-".to_string()
    } else {
        columns.join(", ")
    };
    lines.push(format!("- {}: {} ({})", label, yes_no(set), columns));
}

fn push_numeric_section(lines: &mut Vec<String>, overview: &DatasetOverview) {
    lines.push("## Numeric columns".to_string());
    if overview.numeric.is_empty() {
        lines.push("No numeric columns.".to_string());
        lines.push(String::new());
        return;
    }

    lines.push("| column | count | mean | std | min | max |".to_string());
    lines.push("| --- | --- | --- | --- | --- | --- |".to_string());
    for (name, summary) in &overview.numeric {
        lines.push(numeric_row(name, summary));
    }
    lines.push(String::new());
}

fn numeric_row(name: &str, summary: &NumericSummary) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} |",
        name,
        summary.count,
        stat(summary.mean),
        stat(summary.std),
        stat(summary.min),
        stat(summary.max)
    )
}

fn push_categorical_section(lines: &mut Vec<String>, overview: &DatasetOverview, top_k: usize) {
    lines.push("## Categorical columns".to_string());
    if overview.categorical.is_empty() {
        lines.push("No categorical columns.".to_string());
        lines.push(String::new());
        return;
    }

    for (name, summary) in &overview.categorical {
        let top = summary
            .top_values
            .iter()
            .map(|v| format!("{} ({})", v.value, v.count))
            .collect::<Vec<_>>()
            .join(", ");

        lines.push(format!("### {name}"));
        lines.push(format!("- Unique: {}", summary.unique_count));
        lines.push(format!("- Missing: {}", summary.null_count));
        lines.push(format!("- Top-{top_k}: {top}"));
        lines.push(String::new());
    }
}

fn stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn yes_no(set: bool) -> &'static str {
    if set { "yes" } else { "no" }
}
