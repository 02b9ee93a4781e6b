//! Tabular row sources for catalog ingestion.
//!
//! Every yearly list, supplement and web-resource addendum is read through
//! the same [`RowSource`] trait. A source only surfaces rows in the common
//! `{name, url, short_description}` shape; all reconciliation happens
//! downstream in the pipeline.

mod delimited;
mod memory;
mod spreadsheet;
mod window;

use std::path::Path;

use tracing::{debug, warn};

use biocatalog_shared::{CatalogError, ColumnMap, Result, SourceKind, SourceRow};

pub use delimited::DelimitedSource;
pub use memory::MemorySource;
pub use spreadsheet::SpreadsheetSource;
pub use window::RowWindow;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Rows read from one source, plus what could not be found in it.
#[derive(Debug, Clone, Default)]
pub struct SourceRows {
    pub rows: Vec<SourceRow>,
    /// Configured columns absent from the header. Their fields read as `""`.
    pub missing_columns: Vec<String>,
    /// 1-based data-row number of `rows[0]`.
    pub first_row: usize,
}

/// A tabular release that can surface catalog rows.
pub trait RowSource {
    /// Release kind, which decides the resource type of ingested entries.
    fn kind(&self) -> SourceKind;

    /// Human-readable label for logs and reports.
    fn label(&self) -> String;

    /// Read every row in the configured window.
    fn read_rows(&self) -> Result<SourceRows>;
}

/// Per-source reading options.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub columns: ColumnMap,
    /// Worksheet name; spreadsheet sources read the first sheet when unset.
    pub sheet: Option<String>,
    pub window: Option<RowWindow>,
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Open a file-backed source, picking the reader by file extension.
pub fn open_source(
    path: &Path,
    kind: SourceKind,
    options: SourceOptions,
) -> Result<Box<dyn RowSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let source: Box<dyn RowSource> = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => {
            Box::new(SpreadsheetSource::new(path, kind, options))
        }
        "csv" => Box::new(DelimitedSource::new(path, kind, b',', options)),
        "tsv" | "tab" => Box::new(DelimitedSource::new(path, kind, b'\t', options)),
        other => {
            return Err(CatalogError::row_source(
                path,
                format!("unsupported file type '{other}': expected xlsx, xls, xlsb, ods, csv, or tsv"),
            ));
        }
    };

    debug!(path = %path.display(), %kind, "opened row source");
    Ok(source)
}

// ---------------------------------------------------------------------------
// Table → rows
// ---------------------------------------------------------------------------

/// A header row plus data records, as read by a file-backed source.
#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// Map table columns onto source rows, honoring the row window.
pub(crate) fn extract_rows(
    table: Table,
    columns: &ColumnMap,
    window: Option<&RowWindow>,
    label: &str,
) -> SourceRows {
    let mut missing_columns = Vec::new();
    let mut locate = |wanted: &str| -> Option<usize> {
        let found = table
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted.trim()));
        if found.is_none() {
            warn!(source = label, column = wanted, "column not found, using empty values");
            missing_columns.push(wanted.to_string());
        }
        found
    };

    let name_col = locate(&columns.name);
    let url_col = locate(&columns.url);
    let description_col = locate(&columns.short_description);

    let range = match window {
        Some(w) => w.bounds(table.records.len(), label),
        None => 0..table.records.len(),
    };
    let first_row = range.start + 1;

    let cell = |record: &[String], col: Option<usize>| -> String {
        col.and_then(|i| record.get(i)).cloned().unwrap_or_default()
    };

    let rows = table.records[range]
        .iter()
        .map(|record| SourceRow {
            name: cell(record, name_col),
            url: cell(record, url_col),
            short_description: cell(record, description_col),
        })
        .collect();

    SourceRows {
        rows,
        missing_columns,
        first_row,
    }
}

/// Label used for file-backed sources.
pub(crate) fn path_label(path: &Path, sheet: Option<&str>) -> String {
    match sheet {
        Some(s) => format!("{}[{s}]", path.display()),
        None => path.display().to_string(),
    }
}
