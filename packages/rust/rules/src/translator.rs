//! Phrase-gloss annotation of English descriptions.
//!
//! Not a translation engine: known phrases are replaced in place by their
//! gloss and everything else is left alone, so mixed output is normal.

use std::collections::HashSet;

use regex::{NoExpand, Regex, RegexBuilder};

use biocatalog_shared::{CatalogError, Result};

/// Textual forms a reader produces for a missing cell.
const MISSING_MARKERS: [&str; 3] = ["nan", "NaN", "None"];

/// An English phrase and the gloss that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRule {
    pub phrase: String,
    pub gloss: String,
}

impl TranslationRule {
    pub fn new(phrase: impl Into<String>, gloss: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            gloss: gloss.into(),
        }
    }
}

/// A rule with its whole-word, case-insensitive pattern.
#[derive(Debug, Clone)]
struct CompiledPhrase {
    /// Lowercased phrase, used to pre-screen the original text.
    needle: String,
    pattern: Regex,
    gloss: String,
}

/// Applies translation rules longest phrase first.
#[derive(Debug, Clone)]
pub struct Translator {
    phrases: Vec<CompiledPhrase>,
}

impl Translator {
    /// Compile rules. Phrases must be non-empty and unique ignoring case;
    /// glosses must be non-empty.
    pub fn new(rules: &[TranslationRule]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        let mut phrases = Vec::with_capacity(rules.len());

        for rule in rules {
            let phrase = rule.phrase.trim();
            if phrase.is_empty() {
                return Err(CatalogError::rules("translation phrase is empty"));
            }
            if rule.gloss.is_empty() {
                return Err(CatalogError::rules(format!(
                    "translation of '{phrase}' has an empty gloss"
                )));
            }

            let needle = phrase.to_lowercase();
            if !seen.insert(needle.clone()) {
                return Err(CatalogError::rules(format!(
                    "duplicate translation phrase '{phrase}'"
                )));
            }

            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
                .case_insensitive(true)
                .build()
                .map_err(|e| CatalogError::rules(format!("phrase '{phrase}': {e}")))?;

            phrases.push(CompiledPhrase {
                needle,
                pattern,
                gloss: rule.gloss.clone(),
            });
        }

        // Stable: equal lengths keep declaration order.
        phrases.sort_by(|a, b| b.needle.chars().count().cmp(&a.needle.chars().count()));

        Ok(Self { phrases })
    }

    /// Whether a description is a placeholder for a missing value.
    pub fn is_missing(description: &str) -> bool {
        description.is_empty() || MISSING_MARKERS.contains(&description)
    }

    /// Gloss every known phrase in `description`.
    ///
    /// A phrase is only tried when it occurs in the original text, so a gloss
    /// inserted earlier never triggers another substitution.
    pub fn translate(&self, description: &str) -> String {
        if Self::is_missing(description) {
            return description.to_string();
        }

        let original_lower = description.to_lowercase();
        let mut translated = description.to_string();

        for phrase in &self.phrases {
            if !original_lower.contains(&phrase.needle) {
                continue;
            }
            translated = phrase
                .pattern
                .replace_all(&translated, NoExpand(&phrase.gloss))
                .into_owned();
        }

        translated
    }

    /// Number of compiled phrases.
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator(rules: &[(&str, &str)]) -> Translator {
        let rules: Vec<TranslationRule> = rules
            .iter()
            .map(|(p, g)| TranslationRule::new(*p, *g))
            .collect();
        Translator::new(&rules).expect("valid rules")
    }

    #[test]
    fn longest_phrase_wins() {
        let t = translator(&[("gene", "基因"), ("gene expression", "基因表达")]);
        assert_eq!(t.translate("gene expression study"), "基因表达 study");
    }

    #[test]
    fn longest_phrase_wins_regardless_of_declaration_order() {
        let t = translator(&[("gene expression", "基因表达"), ("gene", "基因")]);
        assert_eq!(
            t.translate("gene expression and gene regulation"),
            "基因表达 and 基因 regulation"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = translator(&[("database", "数据库")]);
        assert_eq!(t.translate("A DataBase of Databases"), "A 数据库 of Databases");
    }

    #[test]
    fn whole_words_only() {
        let t = translator(&[("gene", "基因"), ("tree", "进化树")]);
        assert_eq!(t.translate("genetic street gene"), "genetic street 基因");
    }

    #[test]
    fn cjk_characters_are_word_characters() {
        let t = translator(&[("gene", "基因")]);
        assert_eq!(t.translate("基因gene"), "基因gene");
        assert_eq!(t.translate("gene数据"), "gene数据");
        assert_eq!(t.translate("基因 gene"), "基因 基因");
    }

    #[test]
    fn hyphen_is_a_word_boundary() {
        let t = translator(&[("genome", "基因组"), ("RNA-seq", "RNA测序")]);
        assert_eq!(
            t.translate("genome-wide rna-seq atlas"),
            "基因组-wide RNA测序 atlas"
        );
    }

    #[test]
    fn unmatched_text_is_returned_unchanged() {
        let t = translator(&[("protein", "蛋白质")]);
        let input = "Catalogue of small molecules";
        assert_eq!(t.translate(input), input);
    }

    #[test]
    fn missing_markers_pass_through() {
        let t = translator(&[("nan", "纳米")]);
        assert_eq!(t.translate(""), "");
        assert_eq!(t.translate("nan"), "nan");
        assert_eq!(t.translate("NaN"), "NaN");
        assert_eq!(t.translate("None"), "None");
        assert!(Translator::is_missing("None"));
        assert!(!Translator::is_missing("none of the above"));
    }

    #[test]
    fn gloss_is_inserted_literally() {
        let t = translator(&[("price", "$1 each")]);
        assert_eq!(t.translate("price list"), "$1 each list");
    }

    #[test]
    fn glosses_do_not_retrigger_shorter_phrases() {
        // The gloss contains "api" but the original text does not.
        let t = translator(&[("interface", "api interface"), ("api", "API接口")]);
        assert_eq!(t.translate("web interface"), "web api interface");
    }

    #[test]
    fn rewritten_output_is_stable() {
        let t = translator(&[("gene", "基因"), ("gene expression", "基因表达")]);
        let once = t.translate("gene expression study");
        assert_eq!(t.translate(&once), once);
    }

    #[test]
    fn duplicate_phrase_rejected() {
        let rules = vec![
            TranslationRule::new("Gene", "基因"),
            TranslationRule::new("gene", "基因"),
        ];
        let err = Translator::new(&rules).unwrap_err();
        assert!(err.to_string().contains("duplicate translation phrase"));
    }

    #[test]
    fn empty_gloss_rejected() {
        let rules = vec![TranslationRule::new("gene", "")];
        assert!(Translator::new(&rules).is_err());
    }
}
