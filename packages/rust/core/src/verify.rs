//! Source ↔ catalog reconciliation by normalized name.

use std::collections::HashSet;

use tracing::{info, instrument};

use biocatalog_rules::split_title;
use biocatalog_sources::SourceRows;
use biocatalog_storage::Catalog;

/// A source row whose name is not cataloged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncatalogedRow {
    /// 1-based data-row number in the source.
    pub row: usize,
    pub name: String,
}

/// A catalog entry the source does not list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlistedEntry {
    pub id: u64,
    pub name: String,
}

/// Result of comparing one source with the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Non-blank source rows compared.
    pub compared: usize,
    /// Source rows already in the catalog.
    pub matched: usize,
    pub missing_from_catalog: Vec<UncatalogedRow>,
    /// Entries with `id >= since_id` absent from the source. Empty without `since_id`.
    pub missing_from_source: Vec<UnlistedEntry>,
}

impl VerifyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_catalog.is_empty() && self.missing_from_source.is_empty()
    }
}

/// Compare the normalized names of `rows` against `catalog`.
#[instrument(skip_all, fields(rows = rows.rows.len(), since_id = ?since_id))]
pub fn verify(catalog: &Catalog, rows: &SourceRows, since_id: Option<u64>) -> VerifyReport {
    let cataloged: HashSet<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();

    let mut report = VerifyReport::default();
    let mut listed: HashSet<String> = HashSet::new();

    for (offset, row) in rows.rows.iter().enumerate() {
        if row.name.trim().is_empty() {
            continue;
        }
        let name = split_title(&row.name).name;
        report.compared += 1;

        if cataloged.contains(name.as_str()) {
            report.matched += 1;
        } else {
            report.missing_from_catalog.push(UncatalogedRow {
                row: rows.first_row + offset,
                name: name.clone(),
            });
        }
        listed.insert(name);
    }

    if let Some(since) = since_id {
        report.missing_from_source = catalog
            .entries()
            .iter()
            .filter(|e| e.id >= since && !listed.contains(&e.name))
            .map(|e| UnlistedEntry {
                id: e.id,
                name: e.name.clone(),
            })
            .collect();
    }

    info!(
        compared = report.compared,
        matched = report.matched,
        missing_from_catalog = report.missing_from_catalog.len(),
        missing_from_source = report.missing_from_source.len(),
        "verification complete"
    );

    report
}
