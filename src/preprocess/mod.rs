// Text preprocessing for the topic pipeline.
//
// Two cleanup levels. `clean` strips symbols and stopwords while preserving
// casing, matching what gets shown or cached downstream. `normalize` goes
// further (lowercasing, short-token filtering, stemming) and feeds the
// minimum-content gate in front of vectorization.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// Text normalizer with an explicitly constructed stopword set.
///
/// Built once and shared. Holds no mutable state, so concurrent extractions
/// can use the same instance.
pub struct Preprocessor {
    stopwords: HashSet<String>,
    stemmer: Stemmer,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(get(LANGUAGE::English))
    }
}

impl Preprocessor {
    pub fn new(stopwords: Vec<String>) -> Self {
        Self {
            stopwords: stopwords.into_iter().map(|w| w.to_lowercase()).collect(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Remove non-alphanumeric characters, collapse whitespace, and drop
    /// stopwords (matched case-insensitively). Casing of surviving tokens is
    /// preserved. Idempotent: cleaning already-clean text is a no-op.
    pub fn clean(&self, text: &str) -> String {
        let stripped: String = text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();
        stripped
            .split_whitespace()
            .filter(|token| !self.stopwords.contains(&token.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Aggressive variant used to decide whether a corpus is worth modeling:
    /// letters only, lowercased, tokens shorter than 3 characters dropped,
    /// survivors reduced to their stem.
    pub fn normalize(&self, text: &str) -> String {
        let stripped: String = text
            .chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    c.to_ascii_lowercase()
                } else {
                    ' '
                }
            })
            .collect();
        stripped
            .split_whitespace()
            .filter(|token| token.len() > 2 && !self.stopwords.contains(*token))
            .map(|token| self.stemmer.stem(token).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_symbols_and_stopwords() {
        let pre = Preprocessor::default();
        let out = pre.clean("Hello, world! The quick (brown) fox...");
        assert!(!out.contains(','));
        assert!(!out.contains('('));
        // "The" is a stopword regardless of case
        assert!(!out.split(' ').any(|t| t.eq_ignore_ascii_case("the")));
        assert!(out.contains("quick"));
    }

    #[test]
    fn clean_is_idempotent() {
        let pre = Preprocessor::default();
        let inputs = [
            "Contract review: Q3 renewal!",
            "   spaced    out\ttext\n",
            "",
            "already clean text",
        ];
        for input in inputs {
            let once = pre.clean(input);
            assert_eq!(pre.clean(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn clean_output_is_ascii_alphanumeric_and_spaces() {
        let pre = Preprocessor::default();
        let out = pre.clean("emails: a@b.com, prices €40 & $50 — okay?");
        assert!(
            out.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '),
            "unexpected char in {out:?}"
        );
    }

    #[test]
    fn clean_empty_yields_empty() {
        let pre = Preprocessor::default();
        assert_eq!(pre.clean(""), "");
        assert_eq!(pre.clean("!!! ... ???"), "");
    }

    #[test]
    fn normalize_lowercases_filters_and_stems() {
        let pre = Preprocessor::default();
        let out = pre.normalize("Running contracts at #42 speed");
        // digits gone, short tokens gone, stems applied
        assert!(!out.contains("42"));
        assert!(out.contains("run"));
        assert!(out.contains("contract"));
        assert!(!out.contains("Running"));
    }
}
