//! Per-category counts over a catalog.

use biocatalog_rules::RuleSet;
use biocatalog_shared::{CatalogEntry, CategoryId, ResourceType};

/// Counts for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: CategoryId,
    pub label: String,
    pub databases: usize,
    pub web: usize,
}

impl CategoryCount {
    pub fn total(&self) -> usize {
        self.databases + self.web
    }
}

/// Category counts split by resource type, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub categories: Vec<CategoryCount>,
}

impl CategoryStats {
    /// Count `entries`. Every category is listed, including empty ones.
    pub fn collect(entries: &[CatalogEntry], rules: &RuleSet) -> Self {
        let mut categories: Vec<CategoryCount> = CategoryId::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                label: rules.label(category).to_string(),
                databases: 0,
                web: 0,
            })
            .collect();

        for entry in entries {
            let count = &mut categories[entry.category.priority()];
            match entry.resource_type {
                ResourceType::Database => count.databases += 1,
                ResourceType::Web => count.web += 1,
            }
        }

        Self { categories }
    }

    pub fn total_databases(&self) -> usize {
        self.categories.iter().map(|c| c.databases).sum()
    }

    pub fn total_web(&self) -> usize {
        self.categories.iter().map(|c| c.web).sum()
    }

    pub fn total(&self) -> usize {
        self.total_databases() + self.total_web()
    }
}
