//! Workbook sources (xlsx, xlsm, xls, xlsb, ods) read with calamine.

use std::path::{Path, PathBuf};

use calamine::{Data, ExcelDateTime, Reader, Sheets, open_workbook_auto};
use chrono::Timelike;
use tracing::{debug, instrument};

use biocatalog_shared::{CatalogError, Result, SourceKind};

use crate::{RowSource, SourceOptions, SourceRows, Table, extract_rows, path_label};

/// One worksheet of a workbook. The first row is the header.
#[derive(Debug, Clone)]
pub struct SpreadsheetSource {
    path: PathBuf,
    kind: SourceKind,
    options: SourceOptions,
}

impl SpreadsheetSource {
    pub fn new(path: &Path, kind: SourceKind, options: SourceOptions) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            options,
        }
    }

    fn read_table(&self) -> Result<Table> {
        let mut workbook: Sheets<_> = open_workbook_auto(&self.path)
            .map_err(|e| CatalogError::row_source(&self.path, format!("cannot open workbook: {e}")))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let sheet = match &self.options.sheet {
            Some(wanted) => sheet_names
                .iter()
                .find(|name| *name == wanted)
                .cloned()
                .ok_or_else(|| {
                    CatalogError::row_source(
                        &self.path,
                        format!(
                            "sheet '{wanted}' not found (available: {})",
                            sheet_names.join(", ")
                        ),
                    )
                })?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| CatalogError::row_source(&self.path, "workbook contains no sheets"))?,
        };

        let range = workbook.worksheet_range(&sheet).map_err(|e| {
            CatalogError::row_source(&self.path, format!("cannot read sheet '{sheet}': {e}"))
        })?;

        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| header.iter().map(render_cell).collect())
            .unwrap_or_default();
        let records: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        debug!(sheet = %sheet, records = records.len(), "read worksheet");
        Ok(Table { headers, records })
    }
}

impl RowSource for SpreadsheetSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn label(&self) -> String {
        path_label(&self.path, self.options.sheet.as_deref())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read_rows(&self) -> Result<SourceRows> {
        let table = self.read_table()?;
        Ok(extract_rows(
            table,
            &self.options.columns,
            self.options.window.as_ref(),
            &self.label(),
        ))
    }
}

/// Render a cell as the text a reader of the sheet would see.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integral floats print without a decimal point.
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => n.to_string(),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => render_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Dates print as `YYYY-MM-DD`, with a time part only when one is set.
fn render_datetime(dt: &ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(value) if value.num_seconds_from_midnight() == 0 => value.format("%Y-%m-%d").to_string(),
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}
