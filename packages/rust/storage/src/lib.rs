//! Durable JSON catalog storage.
//!
//! The catalog is one UTF-8 JSON array of [`CatalogEntry`] records. It is
//! loaded in full by [`CatalogStore::load`], mutated in memory, and written
//! back in full by [`CatalogStore::save`].
//!
//! **Write rules:**
//! - A save is a complete rewrite to `.<file>.tmp`, flushed, then renamed
//!   over the target. A failed save leaves the previous file untouched.
//! - Concurrent writers are not coordinated (last writer wins).

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use biocatalog_shared::{CatalogEntry, CatalogError, Result};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered, append-only list of catalog entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from existing entries, checking that ids are
    /// positive, strictly increasing and below `u64::MAX`.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut previous = 0u64;
        for (index, entry) in entries.iter().enumerate() {
            if entry.id == 0 {
                return Err(CatalogError::validation(format!(
                    "entry {index} ('{}') has id 0; ids start at 1",
                    entry.name
                )));
            }
            if entry.id == u64::MAX {
                return Err(CatalogError::validation(format!(
                    "entry {index} ('{}') has id {}; no id is left for the next entry",
                    entry.name, entry.id
                )));
            }
            if entry.id <= previous {
                return Err(CatalogError::validation(format!(
                    "entry {index} ('{}') has id {} after id {previous}; ids must be unique and increasing",
                    entry.name, entry.id
                )));
            }
            previous = entry.id;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose name equals `name` exactly (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn max_id(&self) -> u64 {
        self.entries.iter().map(|e| e.id).max().unwrap_or(0)
    }

    /// Id the next appended entry receives.
    ///
    /// Loaded ids stay below `u64::MAX`, so this cannot overflow.
    pub fn next_id(&self) -> u64 {
        self.max_id() + 1
    }

    /// Append `entry` under a freshly allocated id and return that id.
    pub fn append(&mut self, mut entry: CatalogEntry) -> u64 {
        let id = self.next_id();
        entry.id = id;
        self.entries.push(entry);
        id
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub entries: usize,
    pub bytes: usize,
    pub sha256: String,
}

/// File location of a catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole catalog. A missing file is an empty catalog.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Catalog> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("catalog file not found, starting empty");
                return Ok(Catalog::new());
            }
            Err(e) => return Err(CatalogError::catalog_load(&self.path, e.to_string())),
        };

        let entries: Vec<CatalogEntry> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::catalog_load(&self.path, format!("invalid JSON: {e}")))?;

        let catalog = Catalog::from_entries(entries).map_err(|e| match e {
            CatalogError::Validation { message } => CatalogError::catalog_load(&self.path, message),
            other => other,
        })?;

        info!(entries = catalog.len(), max_id = catalog.max_id(), "loaded catalog");
        Ok(catalog)
    }

    /// Replace the catalog file with `catalog`.
    #[instrument(skip_all, fields(path = %self.path.display(), entries = catalog.len()))]
    pub fn save(&self, catalog: &Catalog) -> Result<SaveReport> {
        let json = serde_json::to_string_pretty(catalog.entries())
            .map_err(|e| CatalogError::catalog_save(&self.path, format!("serialization failed: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::catalog_save(&self.path, format!("{}: {e}", parent.display())))?;
        }

        let temp = self.temp_path()?;
        if let Err(e) = write_synced(&temp, json.as_bytes()) {
            let _ = std::fs::remove_file(&temp);
            return Err(CatalogError::catalog_save(
                &self.path,
                format!("writing {}: {e}", temp.display()),
            ));
        }
        debug!(temp = %temp.display(), bytes = json.len(), "wrote temporary catalog");

        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(CatalogError::catalog_save(&self.path, format!("replacing file: {e}")));
        }

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        let sha256 = format!("{:x}", hasher.finalize());

        info!(bytes = json.len(), sha256 = %sha256, "catalog saved");

        Ok(SaveReport {
            path: self.path.clone(),
            entries: catalog.len(),
            bytes: json.len(),
            sha256,
        })
    }

    /// Sibling temp file: `.<file>.tmp`.
    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CatalogError::catalog_save(&self.path, "catalog path has no file name"))?;
        Ok(self.path.with_file_name(format!(".{file_name}.tmp")))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
