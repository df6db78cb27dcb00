//! FILENAME: csv-export/src/export.rs
//! Export orchestration - questionnaire document in, CSV/TSV text out.
//!
//! One grid is created per questionnaire and reused across its forms: the
//! registered columns stay the same, only the recorded cells are cleared
//! between forms. For each form the subject identifiers and timestamps land
//! on row 0, the answer tree is laid out by `layout-engine`, and the
//! materialized rows are written out with the form's name prefixed as the
//! identifier column.

use layout_engine::Grid;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::build_tree;
use crate::schema::{derive_columns, ColumnSet};
use crate::{ExportError, CREATED_PROP, DATA_PROP, LAST_MODIFIED_PROP, NAME_PROP, UUID_PROP};

/// The field separator of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
}

impl OutputFormat {
    fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Csv => b',',
            OutputFormat::Tsv => b'\t',
        }
    }
}

/// Options controlling the exported text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Comma- or tab-separated output.
    pub format: OutputFormat,

    /// Whether to emit the human-readable header row.
    pub label_header: bool,

    /// Whether to emit the raw machine-name header row, for round-tripping
    /// exports back into the system.
    pub raw_header: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            format: OutputFormat::Csv,
            label_header: true,
            raw_header: false,
        }
    }
}

/// Exports a questionnaire document, with all its forms under `@data`, as
/// CSV/TSV text.
pub fn export_questionnaire(
    questionnaire: &Value,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    let columns = derive_columns(questionnaire)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.format.delimiter())
        .from_writer(Vec::new());

    if options.label_header {
        writer.write_record(&columns.labels)?;
    }
    if options.raw_header {
        writer.write_record(&columns.raw_names)?;
    }

    let mut grid = Grid::new(columns.keys.clone());
    if let Some(forms) = questionnaire.get(DATA_PROP).and_then(Value::as_array) {
        for form in forms {
            export_form(form, &columns, &mut grid, &mut writer)?;
            grid.clear_rows();
        }
    }

    let buffer = writer
        .into_inner()
        .map_err(|error| ExportError::Csv(error.into_error().into()))?;
    Ok(String::from_utf8(buffer)?)
}

/// Exports one form as one or more rows.
fn export_form(
    form: &Value,
    columns: &ColumnSet,
    grid: &mut Grid,
    writer: &mut csv::Writer<Vec<u8>>,
) -> Result<(), ExportError> {
    let form_object = form
        .as_object()
        .ok_or_else(|| ExportError::InvalidDocument("form is not a JSON object".to_string()))?;
    let identifier = form_object
        .get(NAME_PROP)
        .and_then(Value::as_str)
        .ok_or_else(|| ExportError::InvalidDocument("form has no @name".to_string()))?;

    // Form-level columns all live on the first row of the form's band
    if let Some(subject) = form_object.get("subject") {
        record_subjects(subject, grid);
    }
    for property in [CREATED_PROP, LAST_MODIFIED_PROP] {
        if let Some(timestamp) = form_object.get(property).and_then(Value::as_str) {
            grid.record(property, 0, timestamp.to_string());
        }
    }

    let mut tree = build_tree(form);
    tree.layout_into(grid);

    debug_assert_eq!(columns.keys.len() + 1, columns.labels.len());
    for row in grid.rows() {
        writer.write_record(std::iter::once(identifier).chain(row.iter().map(String::as_str)))?;
    }
    Ok(())
}

/// Records the identifiers of the form's subject and all its ancestors,
/// each in its own subject-type column.
fn record_subjects(subject: &Value, grid: &mut Grid) {
    let mut current = subject.as_object();
    while let Some(subject) = current {
        let type_uuid = subject
            .get("type")
            .and_then(Value::as_object)
            .and_then(|t| t.get(UUID_PROP))
            .and_then(Value::as_str);
        let identifier = subject.get("identifier").and_then(Value::as_str);
        if let (Some(type_uuid), Some(identifier)) = (type_uuid, identifier) {
            if grid.has_column(type_uuid) {
                grid.record(type_uuid, 0, identifier.to_string());
            }
        }
        current = subject.get("parents").and_then(Value::as_object);
    }
}
