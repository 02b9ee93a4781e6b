//! CSV and TSV sources.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use biocatalog_shared::{CatalogError, Result, SourceKind};

use crate::{RowSource, SourceOptions, SourceRows, Table, extract_rows, path_label};

const UTF8_BOM: char = '\u{feff}';

/// A delimited text export. The first record is the header.
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    kind: SourceKind,
    delimiter: u8,
    options: SourceOptions,
}

impl DelimitedSource {
    pub fn new(path: &Path, kind: SourceKind, delimiter: u8, options: SourceOptions) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
            delimiter,
            options,
        }
    }

    fn read_table(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| CatalogError::row_source(&self.path, format!("cannot open file: {e}")))?;

        let mut records = Vec::new();
        for (index, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| {
                CatalogError::row_source(&self.path, format!("malformed record {}: {e}", index + 1))
            })?;
            records.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect::<Vec<String>>(),
            );
        }

        let mut records = records.into_iter();
        let headers: Vec<String> = records
            .next()
            .unwrap_or_default()
            .iter()
            .map(|h| h.trim_start_matches(UTF8_BOM).trim().to_string())
            .collect();
        let records: Vec<Vec<String>> = records.collect();

        debug!(records = records.len(), "read delimited file");
        Ok(Table { headers, records })
    }
}

impl RowSource for DelimitedSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn label(&self) -> String {
        path_label(&self.path, None)
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
