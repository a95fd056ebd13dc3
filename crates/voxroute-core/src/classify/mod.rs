//! Agent classification.
//!
//! Maps an utterance to at most one [`AgentCategory`] by testing its lemmas
//! against an ordered [`KeywordTable`]. Rules are evaluated in table order and
//! the first rule with any matching lemma wins, so a word listed under several
//! categories always resolves to the earliest one ("how" is both small talk
//! and FAQ; small talk is checked first).
//!
//! Classification is pure: no IO, no state between calls, safe to share
//! across concurrent requests behind an `Arc`.

use std::collections::HashSet;

use voxroute_types::agent::AgentCategory;
use voxroute_types::config::KeywordTable;

use crate::nlp::Lemmatizer;

/// A compiled routing rule with O(1) keyword lookup.
#[derive(Debug, Clone)]
struct CompiledRule {
    category: AgentCategory,
    keywords: HashSet<String>,
}

/// Priority-ordered keyword classifier.
pub struct AgentClassifier<L: Lemmatizer> {
    lemmatizer: L,
    rules: Vec<CompiledRule>,
}

impl<L: Lemmatizer> AgentClassifier<L> {
    /// Build a classifier from a lemmatizer and a routing table.
    ///
    /// Keywords are normalized to lowercase; table order is priority order.
    pub fn new(lemmatizer: L, table: KeywordTable) -> Self {
        let rules = table
            .normalized()
            .rules
            .into_iter()
            .map(|rule| CompiledRule {
                category: rule.category,
                keywords: rule.keywords.into_iter().collect(),
            })
            .collect();

        Self { lemmatizer, rules }
    }

    /// Classifier with the built-in routing table.
    pub fn with_default_table(lemmatizer: L) -> Self {
        Self::new(lemmatizer, KeywordTable::default())
    }

    /// Access the lemmatizer (used by the CLI to show lemmas).
    pub fn lemmatizer(&self) -> &L {
        &self.lemmatizer
    }

    /// Classify raw text. Empty or unrecognized input yields `None`.
    pub fn classify(&self, utterance: &str) -> Option<AgentCategory> {
        let lemmas = self.lemmatizer.lemmatize(&utterance.to_lowercase());
        self.classify_lemmas(&lemmas)
    }

    /// Classify an already-lemmatized utterance.
    pub fn classify_lemmas(&self, lemmas: &[String]) -> Option<AgentCategory> {
        self.rules
            .iter()
            .find(|rule| lemmas.iter().any(|lemma| rule.keywords.contains(lemma)))
            .map(|rule| rule.category)
    }
}
