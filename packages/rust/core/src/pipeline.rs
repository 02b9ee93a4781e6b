//! End-to-end ingestion: catalog load → rows → normalize → merge → save.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use biocatalog_rules::{RuleSet, split_title};
use biocatalog_shared::{Access, CatalogEntry, CategoryId, Result, SourceKind, SourceRow};
use biocatalog_sources::{RowSource, SourceRows};
use biocatalog_storage::{Catalog, CatalogStore, SaveReport};

use crate::merge::{MergeOutcome, merge};
use crate::stats::CategoryStats;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each source row is handled.
    fn row_processed(&self, name: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &IngestReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn row_processed(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &IngestReport) {}
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A row appended to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedEntry {
    pub id: u64,
    pub name: String,
    pub category: CategoryId,
}

/// A row whose name was already cataloged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 1-based data-row number in the source.
    pub row: usize,
    pub name: String,
    pub existing_id: u64,
}

/// Per-row results of one pass over a source.
#[derive(Debug, Clone, Default)]
pub struct RowsSummary {
    pub added: Vec<AddedEntry>,
    pub skipped: Vec<SkippedEntry>,
    /// Rows with a blank title.
    pub blank_rows: usize,
}

/// Options for [`ingest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Run everything except the final save.
    pub dry_run: bool,
}

/// Result of an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: String,
    pub kind: SourceKind,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub rows_read: usize,
    pub summary: RowsSummary,
    /// Configured columns the source header lacked.
    pub missing_columns: Vec<String>,
    pub catalog_entries: usize,
    pub stats: CategoryStats,
    pub dry_run: bool,
    /// `None` for dry runs.
    pub saved: Option<SaveReport>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn one source row into a catalog candidate (id unassigned).
///
/// Returns `None` for rows whose title is blank.
pub fn build_candidate(row: &SourceRow, kind: SourceKind, rules: &RuleSet) -> Option<CatalogEntry> {
    if row.name.trim().is_empty() {
        return None;
    }

    let split = split_title(&row.name);
    let description = if split.description.is_empty() {
        row.short_description.trim().to_string()
    } else {
        split.description
    };

    let classification = rules.categorizer().classify(&split.name, &description);
    let category = classification.category;
    debug!(
        name = %split.name,
        %category,
        keyword = classification.keyword.unwrap_or("-"),
        "classified row"
    );

    Some(CatalogEntry {
        id: 0,
        name: split.name,
        url: row.url.trim().to_string(),
        short_description: description.clone(),
        short_description_zh: rules.translator().translate(&description),
        description,
        category,
        category_name: rules.label(category).to_string(),
        access: Access::Free,
        resource_type: kind.resource_type(),
        last_update: String::new(),
        extra: serde_json::Map::new(),
    })
}

/// Normalize and merge every row into `catalog`, in source order.
pub fn ingest_rows(
    catalog: &mut Catalog,
    rows: &SourceRows,
    kind: SourceKind,
    rules: &RuleSet,
    progress: &dyn ProgressReporter,
) -> RowsSummary {
    let mut summary = RowsSummary::default();
    let total = rows.rows.len();

    for (offset, row) in rows.rows.iter().enumerate() {
        let row_number = rows.first_row + offset;

        match build_candidate(row, kind, rules) {
            None => {
                debug!(row = row_number, "skipping blank title");
                summary.blank_rows += 1;
            }
            Some(candidate) => {
                let name = candidate.name.clone();
                let category = candidate.category;
                match merge(catalog, candidate) {
                    MergeOutcome::Added { id } => {
                        summary.added.push(AddedEntry { id, name, category });
                    }
                    MergeOutcome::Skipped { existing_id } => {
                        info!(row = row_number, %name, existing_id, "already cataloged, skipping");
                        summary.skipped.push(SkippedEntry {
                            row: row_number,
                            name,
                            existing_id,
                        });
                    }
                }
            }
        }

        progress.row_processed(row.name.trim(), offset + 1, total);
    }

    summary
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run one ingestion pass of `source` into the catalog at `store`.
///
/// 1. Load the catalog (fatal if unreadable)
/// 2. Read the source rows
/// 3. Normalize and merge each row
/// 4. Rewrite the catalog once, unless dry-running
#[instrument(skip_all, fields(source = %source.label(), kind = %source.kind()))]
pub fn ingest(
    store: &CatalogStore,
    source: &dyn RowSource,
    rules: &RuleSet,
    options: IngestOptions,
    progress: &dyn ProgressReporter,
) -> Result<IngestReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    let kind = source.kind();

    info!(catalog = %store.path().display(), dry_run = options.dry_run, "starting ingestion");

    progress.phase("Loading catalog");
    let mut catalog = store.load()?;

    progress.phase("Reading source");
    let rows = source.read_rows()?;
    info!(rows = rows.rows.len(), first_row = rows.first_row, "read source rows");

    progress.phase("Merging rows");
    let summary = ingest_rows(&mut catalog, &rows, kind, rules, progress);

    let saved = if options.dry_run {
        info!("dry run, catalog not written");
        None
    } else {
        progress.phase("Saving catalog");
        Some(store.save(&catalog)?)
    };

    let report = IngestReport {
        source: source.label(),
        kind,
        started_at,
        elapsed: start.elapsed(),
        rows_read: rows.rows.len(),
        missing_columns: rows.missing_columns,
        catalog_entries: catalog.len(),
        stats: CategoryStats::collect(catalog.entries(), rules),
        dry_run: options.dry_run,
        saved,
        summary,
    };

    info!(
        added = report.summary.added.len(),
        skipped = report.summary.skipped.len(),
        blank = report.summary.blank_rows,
        entries = report.catalog_entries,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "ingestion complete"
    );

    progress.done(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use biocatalog_shared::ResourceType;
    use biocatalog_sources::{MemorySource, SourceOptions, open_source};

    fn rules() -> RuleSet {
        RuleSet::embedded().expect("embedded rules")
    }

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bc-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn gwas_source() -> MemorySource {
        MemorySource::new(
            SourceKind::YearlyDatabase,
            "nar2024",
            vec![SourceRow::new(
                "GWAS Catalog: Repository of genome-wide association study results",
                "http://example.org",
                "",
            )],
        )
    }

    #[test]
    fn candidate_takes_description_from_title() {
        let row = SourceRow::new(
            "GWAS Catalog: Repository of genome-wide association study results",
            " http://example.org ",
            "ignored when the title has one",
        );
        let entry = build_candidate(&row, SourceKind::YearlyDatabase, &rules()).unwrap();

        assert_eq!(entry.name, "GWAS Catalog");
        assert_eq!(entry.url, "http://example.org");
        assert_eq!(entry.description, "Repository of genome-wide association study results");
        assert_eq!(entry.short_description, entry.description);
        assert_eq!(entry.category, CategoryId::Genomics);
        assert_eq!(entry.category_name, "基因组学");
        assert_eq!(entry.resource_type, ResourceType::Database);
        assert_eq!(entry.access, Access::Free);
        assert_eq!(entry.last_update, "");
    }

    #[test]
    fn candidate_falls_back_to_short_description() {
        let row = SourceRow::new("RNAcentral", "https://rnacentral.org", "Non-coding RNA sequence database");
        let entry = build_candidate(&row, SourceKind::WebResource, &rules()).unwrap();

        assert_eq!(entry.name, "RNAcentral");
        assert_eq!(entry.description, "Non-coding RNA sequence database");
        assert_eq!(entry.resource_type, ResourceType::Web);
        assert_ne!(entry.short_description_zh, entry.short_description);
    }

    #[test]
    fn candidate_without_description_keeps_empty_gloss() {
        let row = SourceRow::new("NoColonHere", "", "");
        let entry = build_candidate(&row, SourceKind::Supplement, &rules()).unwrap();
        assert_eq!(entry.name, "NoColonHere");
        assert_eq!(entry.short_description_zh, "");
        assert_eq!(entry.category, CategoryId::Tools);
    }

    #[test]
    fn blank_titles_are_not_candidates() {
        let row = SourceRow::new("   ", "http://example.org", "orphan");
        assert!(build_candidate(&row, SourceKind::YearlyDatabase, &rules()).is_none());
    }

    #[test]
    fn gwas_end_to_end_and_rerun() {
        let dir = temp_dir();
        let store = CatalogStore::new(dir.join("databases_processed.json"));
        let rules = rules();

        let first = ingest(&store, &gwas_source(), &rules, IngestOptions::default(), &SilentProgress).unwrap();
        assert_eq!(
            first.summary.added,
            vec![AddedEntry {
                id: 1,
                name: "GWAS Catalog".into(),
                category: CategoryId::Genomics,
            }]
        );
        assert!(first.saved.is_some());

        let second = ingest(&store, &gwas_source(), &rules, IngestOptions::default(), &SilentProgress).unwrap();
        assert!(second.summary.added.is_empty());
        assert_eq!(second.summary.skipped.len(), 1);
        assert_eq!(second.summary.skipped[0].existing_id, 1);
        assert_eq!(second.summary.skipped[0].row, 1);
        assert!(second.saved.is_some());

        let catalog = store.load().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].description, "Repository of genome-wide association study results");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn duplicate_names_within_one_source_are_skipped() {
        let mut catalog = Catalog::new();
        let rows = SourceRows {
            rows: vec![
                SourceRow::new("PDB: Protein Data Bank", "", ""),
                SourceRow::new("", "", ""),
                SourceRow::new("PDB: Protein Data Bank mirror", "", ""),
            ],
            missing_columns: Vec::new(),
            first_row: 10,
        };

        let summary = ingest_rows(&mut catalog, &rows, SourceKind::Supplement, &rules(), &SilentProgress);

        assert_eq!(summary.added.len(), 1);
        assert_eq!(summary.blank_rows, 1);
        assert_eq!(
            summary.skipped,
            vec![SkippedEntry {
                row: 12,
                name: "PDB".into(),
                existing_id: 1,
            }]
        );
    }

    #[test]
    fn padded_legacy_name_is_skipped_not_duplicated() {
        let mut catalog = Catalog::new();
        let legacy = build_candidate(&SourceRow::new("Foo ", "", ""), SourceKind::Supplement, &rules()).unwrap();
        assert_eq!(legacy.name, "Foo ");
        catalog.append(legacy);

        let rows = SourceRows {
            rows: vec![SourceRow::new("Foo ", "", "")],
            missing_columns: Vec::new(),
            first_row: 1,
        };
        let summary = ingest_rows(&mut catalog, &rows, SourceKind::Supplement, &rules(), &SilentProgress);

        assert!(summary.added.is_empty());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].existing_id, 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn run_that_adds_nothing_still_writes_catalog() {
        let dir = temp_dir();
        let path = dir.join("catalog.json");
        let store = CatalogStore::new(&path);
        let blank = MemorySource::new(SourceKind::WebResource, "empty", vec![SourceRow::new("", "", "")]);

        let report = ingest(&store, &blank, &rules(), IngestOptions::default(), &SilentProgress).unwrap();

        assert!(report.summary.added.is_empty());
        assert_eq!(report.saved.as_ref().map(|s| s.entries), Some(0));
        assert!(path.exists());
        assert!(store.load().unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn dry_run_leaves_catalog_untouched() {
        let dir = temp_dir();
        let path = dir.join("catalog.json");
        let store = CatalogStore::new(&path);

        let report = ingest(
            &store,
            &gwas_source(),
            &rules(),
            IngestOptions { dry_run: true },
            &SilentProgress,
        )
        .unwrap();

        assert_eq!(report.summary.added.len(), 1);
        assert_eq!(report.catalog_entries, 1);
        assert!(report.saved.is_none());
        assert!(!path.exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn ingesting_fixture_twice_is_idempotent() {
        let dir = temp_dir();
        let store = CatalogStore::new(dir.join("catalog.json"));
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures");
        std::fs::copy(fixtures.join("json/catalog.fixture.json"), store.path()).unwrap();

        let source = open_source(
            &fixtures.join("csv/web_resources.fixture.csv"),
            SourceKind::WebResource,
            SourceOptions::default(),
        )
        .unwrap();
        let rules = rules();

        let first = ingest(&store, &*source, &rules, IngestOptions::default(), &SilentProgress).unwrap();
        // Galaxy is already in the fixture catalog.
        assert_eq!(first.summary.skipped.len(), 1);
        assert_eq!(first.summary.skipped[0].existing_id, 3);
        assert_eq!(first.summary.added.len(), 3);
        assert_eq!(first.summary.added[0].id, 4);
        assert_eq!(first.catalog_entries, 6);

        let second = ingest(&store, &*source, &rules, IngestOptions::default(), &SilentProgress).unwrap();
        assert!(second.summary.added.is_empty());
        assert_eq!(second.catalog_entries, 6);

        let catalog = store.load().unwrap();
        let mut names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
        assert!(
            catalog
                .entries()
                .windows(2)
                .all(|pair| pair[0].id < pair[1].id)
        );
        assert_eq!(
            catalog.find_by_name("PDB").and_then(|e| e.extra.get("data_type")),
            Some(&serde_json::json!("structure"))
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_catalog_aborts_before_reading_source() {
        let dir = temp_dir();
        let path = dir.join("catalog.json");
        std::fs::write(&path, "not json").unwrap();
        let store = CatalogStore::new(&path);

        let err = ingest(&store, &gwas_source(), &rules(), IngestOptions::default(), &SilentProgress).unwrap_err();
        assert!(matches!(err, biocatalog_shared::CatalogError::CatalogLoad { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");

        std::fs::remove_dir_all(&dir).ok();
    }
}
