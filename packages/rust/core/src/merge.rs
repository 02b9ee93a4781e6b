//! Name-keyed deduplication into the catalog.

use tracing::debug;

use biocatalog_shared::CatalogEntry;
use biocatalog_storage::Catalog;

/// What happened to one candidate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Appended under a newly allocated id.
    Added { id: u64 },
    /// An entry with the same name already exists; nothing was written.
    Skipped { existing_id: u64 },
}

/// Append `candidate` unless an entry with the same name exists.
///
/// Names compare exactly (case-sensitive). URLs are never compared, so the
/// same resource listed under two spellings lands twice.
pub fn merge(catalog: &mut Catalog, candidate: CatalogEntry) -> MergeOutcome {
    if let Some(existing) = catalog.find_by_name(&candidate.name) {
        debug!(name = %candidate.name, existing_id = existing.id, "already in catalog");
        return MergeOutcome::Skipped {
            existing_id: existing.id,
        };
    }

    let name = candidate.name.clone();
    let id = catalog.append(candidate);
    debug!(%name, id, "appended to catalog");
    MergeOutcome::Added { id }
}
