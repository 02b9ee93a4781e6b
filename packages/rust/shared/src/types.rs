//! Core domain types for the catalog.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CategoryId
// ---------------------------------------------------------------------------

/// Subject-matter tag assigned to every catalog entry.
///
/// The declaration order is the classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Protein,
    Genomics,
    Plant,
    Medical,
    Microbiology,
    Evolution,
    Omics,
    Tools,
}

impl CategoryId {
    /// Every category, in classification priority order.
    pub const ALL: [CategoryId; 8] = [
        CategoryId::Protein,
        CategoryId::Genomics,
        CategoryId::Plant,
        CategoryId::Medical,
        CategoryId::Microbiology,
        CategoryId::Evolution,
        CategoryId::Omics,
        CategoryId::Tools,
    ];

    /// Catch-all category used when no keyword matches.
    pub const FALLBACK: CategoryId = CategoryId::Tools;

    /// Stable identifier as written to the catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protein => "protein",
            Self::Genomics => "genomics",
            Self::Plant => "plant",
            Self::Medical => "medical",
            Self::Microbiology => "microbiology",
            Self::Evolution => "evolution",
            Self::Omics => "omics",
            Self::Tools => "tools",
        }
    }

    /// Position in the priority order.
    pub fn priority(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category id '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// ResourceType / Access / SourceKind
// ---------------------------------------------------------------------------

/// Distinguishes database listings from web-tool listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Database,
    Web,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database => f.write_str("database"),
            Self::Web => f.write_str("web"),
        }
    }
}

/// Access policy of a resource. Only `Free` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Access {
    #[default]
    Free,
}

/// The kind of tabular release a source row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Yearly main database list.
    #[default]
    YearlyDatabase,
    /// Supplementary database list.
    Supplement,
    /// "Web resource" addendum listing web tools.
    WebResource,
}

impl SourceKind {
    /// The resource type recorded for entries ingested from this kind of source.
    pub fn resource_type(self) -> ResourceType {
        match self {
            Self::YearlyDatabase | Self::Supplement => ResourceType::Database,
            Self::WebResource => ResourceType::Web,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::YearlyDatabase => "yearly-database",
            Self::Supplement => "supplement",
            Self::WebResource => "web-resource",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "yearly-database" | "database" => Ok(Self::YearlyDatabase),
            "supplement" => Ok(Self::Supplement),
            "web-resource" | "web" => Ok(Self::WebResource),
            other => Err(format!(
                "unknown source kind '{other}': expected 'yearly-database', 'supplement', or 'web-resource'"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceRow
// ---------------------------------------------------------------------------

/// One raw row surfaced by a tabular source. Consumed once per ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    /// Raw title cell, possibly `Name: Description`.
    pub name: String,
    pub url: String,
    pub short_description: String,
}

impl SourceRow {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        short_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            short_description: short_description.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogEntry
// ---------------------------------------------------------------------------

/// One canonical, persisted catalog record.
///
/// Keys not listed here (left by older tooling) are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique, positive, increasing in catalog order.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub short_description: String,
    /// Currently always equal to `short_description`.
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    /// Display label of `category`.
    pub category_name: String,
    /// Phrase-glossed rendering of `short_description`.
    #[serde(default)]
    pub short_description_zh: String,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub resource_type: ResourceType,
    /// Reserved, never populated.
    #[serde(default)]
    pub last_update: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
