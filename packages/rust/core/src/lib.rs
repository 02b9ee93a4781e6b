//! Catalog ingestion and reporting workflows for biocatalog.
//!
//! This crate ties together row sources, rule tables and catalog storage
//! into end-to-end workflows (e.g., [`pipeline::ingest`]).

pub mod merge;
pub mod pipeline;
pub mod stats;
pub mod verify;

pub use merge::{MergeOutcome, merge};
pub use pipeline::{
    AddedEntry, IngestOptions, IngestReport, ProgressReporter, RowsSummary, SilentProgress,
    SkippedEntry, build_candidate, ingest, ingest_rows,
};
pub use stats::{CategoryCount, CategoryStats};
pub use verify::{UncatalogedRow, UnlistedEntry, VerifyReport, verify};
