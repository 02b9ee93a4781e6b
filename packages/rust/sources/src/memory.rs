use biocatalog_shared::{Result, SourceKind, SourceRow};

use crate::{RowSource, RowWindow, SourceRows};

/// Rows held in memory. Used by tests and by callers that build rows
/// themselves.
#[derive(Debug, Clone)]
pub struct MemorySource {
    kind: SourceKind,
    label: String,
    rows: Vec<SourceRow>,
    window: Option<RowWindow>,
}

impl MemorySource {
    pub fn new(kind: SourceKind, label: impl Into<String>, rows: Vec<SourceRow>) -> Self {
        Self {
            kind,
            label: label.into(),
            rows,
            window: None,
        }
    }

    pub fn with_window(mut self, window: RowWindow) -> Self {
        self.window = Some(window);
        self
    }
}

impl RowSource for MemorySource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn read_rows(&self) -> Result<SourceRows> {
        let range = match &self.window {
            Some(w) => w.bounds(self.rows.len(), &self.label),
            None => 0..self.rows.len(),
        };
        Ok(SourceRows {
            first_row: range.start + 1,
            rows: self.rows[range].to_vec(),
            missing_columns: Vec::new(),
        })
    }
}
