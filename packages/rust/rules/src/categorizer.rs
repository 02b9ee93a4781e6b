//! Keyword-based category inference.
//!
//! Classification walks the categories in their fixed priority order and
//! each category's keywords in declared order. The first keyword found as a
//! substring of `lowercase(name + " " + description)` decides the category;
//! with no hit the entry lands in [`CategoryId::FALLBACK`].

use biocatalog_shared::{CatalogError, CategoryId, Result};

/// One category definition: id, display label, ordered keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub id: CategoryId,
    pub label: String,
    /// Lowercase, non-empty, tested in this order.
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(id: CategoryId, label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            id,
            label: label.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }
}

/// Outcome of classifying one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub category: CategoryId,
    /// The keyword that decided it, `None` when the fallback applied.
    pub keyword: Option<&'a str>,
}

/// Immutable category table, one rule per [`CategoryId`] in priority order.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Build a categorizer from rules given in any order.
    ///
    /// Every category id must appear exactly once with a non-empty label.
    /// Keywords are trimmed and lowercased; blank keywords are rejected.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut slots: Vec<Option<CategoryRule>> = vec![None; CategoryId::ALL.len()];

        for mut rule in rules {
            let slot = &mut slots[rule.id.priority()];
            if slot.is_some() {
                return Err(CatalogError::rules(format!(
                    "category '{}' is defined more than once",
                    rule.id
                )));
            }

            if rule.label.trim().is_empty() {
                return Err(CatalogError::rules(format!(
                    "category '{}' has an empty label",
                    rule.id
                )));
            }

            for keyword in &mut rule.keywords {
                let normalized = keyword.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(CatalogError::rules(format!(
                        "category '{}' has an empty keyword",
                        rule.id
                    )));
                }
                *keyword = normalized;
            }

            *slot = Some(rule);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (id, slot) in CategoryId::ALL.into_iter().zip(slots) {
            match slot {
                Some(rule) => ordered.push(rule),
                None => {
                    return Err(CatalogError::rules(format!("category '{id}' is not defined")));
                }
            }
        }

        Ok(Self { rules: ordered })
    }

    /// Classify an entry and report the deciding keyword.
    pub fn classify(&self, name: &str, description: &str) -> Classification<'_> {
        let text = format!("{name} {description}").to_lowercase();

        for rule in &self.rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| text.contains(k.as_str())) {
                return Classification {
                    category: rule.id,
                    keyword: Some(keyword.as_str()),
                };
            }
        }

        Classification {
            category: CategoryId::FALLBACK,
            keyword: None,
        }
    }

    /// Category id for an entry.
    pub fn categorize(&self, name: &str, description: &str) -> CategoryId {
        self.classify(name, description).category
    }

    /// Display label of a category.
    pub fn label(&self, id: CategoryId) -> &str {
        &self.rules[id.priority()].label
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rules() -> Vec<CategoryRule> {
        vec![
            // Deliberately out of priority order.
            CategoryRule::new(CategoryId::Tools, "Tools", &["tool", "web"]),
            CategoryRule::new(CategoryId::Protein, "Protein", &["protein", "structure"]),
            CategoryRule::new(CategoryId::Genomics, "Genomics", &["genome", "gene"]),
            CategoryRule::new(CategoryId::Plant, "Plant", &["plant", "rice"]),
            CategoryRule::new(CategoryId::Medical, "Medical", &["human", "disease"]),
            CategoryRule::new(CategoryId::Microbiology, "Micro", &["bacteria", "virus"]),
            CategoryRule::new(CategoryId::Evolution, "Evolution", &["phylogen", "tree"]),
            CategoryRule::new(CategoryId::Omics, "Omics", &["omics", "RNA-seq"]),
        ]
    }

    fn categorizer() -> Categorizer {
        Categorizer::new(sample_rules()).expect("valid rules")
    }

    #[test]
    fn rules_are_reordered_by_priority() {
        let c = categorizer();
        let ids: Vec<CategoryId> = c.rules().iter().map(|r| r.id).collect();
        assert_eq!(ids, CategoryId::ALL);
        assert_eq!(c.label(CategoryId::Microbiology), "Micro");
    }

    #[test]
    fn keywords_are_lowercased() {
        let c = categorizer();
        assert_eq!(c.rules()[CategoryId::Omics.priority()].keywords[1], "rna-seq");
        assert_eq!(c.categorize("X", "bulk RNA-SEQ atlas"), CategoryId::Omics);
    }

    #[test]
    fn priority_beats_position_in_text() {
        // "tree" (evolution) appears before "protein" in the text, but protein wins.
        let c = categorizer();
        let result = c.classify("TreeFam", "tree of protein families");
        assert_eq!(result.category, CategoryId::Protein);
        assert_eq!(result.keyword, Some("protein"));
    }

    #[test]
    fn genomics_beats_medical_and_tools() {
        let c = categorizer();
        assert_eq!(
            c.categorize("GWAS Catalog", "Repository of human genome-wide association web tool"),
            CategoryId::Genomics
        );
    }

    #[test]
    fn substring_matching_inside_words() {
        let c = categorizer();
        // "phylogen" matches inside "phylogeny".
        assert_eq!(c.categorize("PhyloDB", "phylogeny placements"), CategoryId::Evolution);
        // ...and "gene" inside "phylogenetic", which outranks evolution.
        assert_eq!(c.categorize("PhyloDB", "phylogenetic placements"), CategoryId::Genomics);
    }

    #[test]
    fn name_participates_in_matching() {
        let c = categorizer();
        assert_eq!(c.categorize("RiceVarMap", ""), CategoryId::Plant);
    }

    #[test]
    fn fallback_is_tools() {
        let c = categorizer();
        let result = c.classify("Zenodo", "Open archive for research outputs");
        assert_eq!(result.category, CategoryId::Tools);
        assert_eq!(result.keyword, None);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = categorizer();
        let a = c.categorize("ViralZone", "virus structure portal");
        let b = c.categorize("ViralZone", "virus structure portal");
        assert_eq!(a, b);
        assert_eq!(a, CategoryId::Protein);
    }

    #[test]
    fn missing_category_rejected() {
        let mut rules = sample_rules();
        rules.retain(|r| r.id != CategoryId::Omics);
        let err = Categorizer::new(rules).unwrap_err();
        assert!(err.to_string().contains("'omics' is not defined"));
    }

    #[test]
    fn duplicate_category_rejected() {
        let mut rules = sample_rules();
        rules.push(CategoryRule::new(CategoryId::Plant, "Plant again", &["crop"]));
        let err = Categorizer::new(rules).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn blank_keyword_rejected() {
        let mut rules = sample_rules();
        rules[0].keywords.push("  ".into());
        assert!(Categorizer::new(rules).is_err());
    }
}
