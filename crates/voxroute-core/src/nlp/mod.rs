//! Lemma extraction.
//!
//! The classifier only needs a normalized sequence of base word forms; any
//! analyzer that can produce one implements [`Lemmatizer`].

pub mod rule;

pub use rule::RuleLemmatizer;

/// Turns raw text into lowercased base forms, in input order.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, text: &str) -> Vec<String>;
}
