//! Category and translation rules for catalog entries.
//!
//! The rule tables are declarative TOML, loaded once per process into an
//! immutable [`RuleSet`]. The crate also holds the three pure
//! transformations applied to every source row:
//! - [`split_title`]: `Name: Description` title cells
//! - [`Categorizer`]: keyword category inference
//! - [`Translator`]: longest-first phrase glossing

mod categorizer;
mod splitter;
mod translator;

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use biocatalog_shared::{CatalogError, CategoryId, Result};

pub use categorizer::{Categorizer, CategoryRule, Classification};
pub use splitter::{SplitTitle, split_title};
pub use translator::{TranslationRule, Translator};

/// Rule document format understood by this build.
pub const RULES_VERSION: u32 = 1;

/// The rule table shipped with the binary.
pub const DEFAULT_RULES: &str = include_str!("../data/default_rules.toml");

// ---------------------------------------------------------------------------
// TOML document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RulesDocument {
    version: u32,
    categories: Vec<CategoryDoc>,
    #[serde(default)]
    translations: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct CategoryDoc {
    id: CategoryId,
    label: String,
    #[serde(default)]
    keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Validated, compiled rule tables.
#[derive(Debug, Clone)]
pub struct RuleSet {
    categorizer: Categorizer,
    translator: Translator,
    translations: Vec<TranslationRule>,
}

impl RuleSet {
    /// Build a rule set from in-memory tables.
    pub fn new(categories: Vec<CategoryRule>, translations: Vec<TranslationRule>) -> Result<Self> {
        let categorizer = Categorizer::new(categories)?;
        let translator = Translator::new(&translations)?;

        Ok(Self {
            categorizer,
            translator,
            translations,
        })
    }

    /// The embedded default table.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES)
    }

    /// Parse and validate a TOML rule document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let doc: RulesDocument = toml::from_str(content)
            .map_err(|e| CatalogError::rules(format!("invalid rule document: {e}")))?;

        if doc.version != RULES_VERSION {
            return Err(CatalogError::rules(format!(
                "unsupported rules version: {} (expected {RULES_VERSION})",
                doc.version
            )));
        }

        let categories = doc
            .categories
            .into_iter()
            .map(|c| CategoryRule {
                id: c.id,
                label: c.label,
                keywords: c.keywords,
            })
            .collect();

        let translations = doc
            .translations
            .into_iter()
            .map(|(phrase, gloss)| TranslationRule { phrase, gloss })
            .collect();

        Self::new(categories, translations)
    }

    /// Load a rule document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let rules = Self::from_toml_str(&content).map_err(|e| match e {
            CatalogError::Rules { message } => {
                CatalogError::rules(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            phrases = rules.translator.len(),
            "loaded rule table"
        );
        Ok(rules)
    }

    /// Load `path` when given, otherwise the embedded table.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                debug!("using embedded rule table");
                Self::embedded()
            }
        }
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Translation rules in declaration order.
    pub fn translations(&self) -> &[TranslationRule] {
        &self.translations
    }

    /// Display label of a category.
    pub fn label(&self, id: CategoryId) -> &str {
        self.categorizer.label(id)
    }
}
